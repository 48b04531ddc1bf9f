//! Favorite quota enforcement.
//!
//! The quota is a store query run in the same operation as the write. It is
//! not a lock: two requests racing past the count can both succeed and leave
//! the store above the limit.

use crate::error::{ContactError, ContactResult};
use crate::models::Contact;
use crate::repositories::ContactRepository;
use std::sync::Arc;

/// Default number of contacts that may be favorites at once.
pub const DEFAULT_FAVORITE_LIMIT: usize = 5;

/// Caps the number of favorited contacts.
#[derive(Clone)]
pub struct FavoriteLimiter {
    repo: Arc<dyn ContactRepository>,
    limit: usize,
}

impl FavoriteLimiter {
    pub fn new(repo: Arc<dyn ContactRepository>, limit: usize) -> Self {
        Self { repo, limit }
    }

    /// Check that `current` (None for a contact being created) may end up
    /// with `is_favorite = wants_favorite`.
    ///
    /// Only a transition from not-favorite to favorite consults the store.
    ///
    /// # Errors
    ///
    /// Returns `ContactError::FavoriteLimit` when the quota is already full.
    pub async fn check(
        &self,
        current: Option<&Contact>,
        wants_favorite: bool,
    ) -> ContactResult<()> {
        if !wants_favorite || current.is_some_and(|c| c.is_favorite) {
            return Ok(());
        }

        let favorites = self
            .repo
            .count_favorites(current.map(|c| &c.id))
            .await?;

        if favorites >= self.limit {
            tracing::debug!(favorites, limit = self.limit, "Favorite quota reached");
            return Err(ContactError::FavoriteLimit { limit: self.limit });
        }
        Ok(())
    }
}
