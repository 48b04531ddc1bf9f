//! Contact service layer.
//!
//! Business logic for single-contact CRUD, favorite toggling and sync.

use crate::domain::{normalize_phone, validate_contact_fields, ContactId, ValidationMode};
use crate::error::{ContactError, ContactResult, UniqueField};
use crate::metrics::Metrics;
use crate::models::{Contact, ContactInput, DeletedContact, FavoriteStatus, NewContact};
use crate::repositories::ContactRepository;
use crate::services::favorites::FavoriteLimiter;
use crate::services::sync_engine::{SyncEngine, SyncSummary};
use async_trait::async_trait;
use serde_json::Value;
use std::sync::Arc;

/// Contact service trait for business operations.
///
/// Payloads arrive as raw JSON and are read, sanitized and validated here so
/// that every caller gets the same rules.
#[async_trait]
pub trait ContactService: Send + Sync {
    /// List all contacts sorted by name.
    async fn list_contacts(&self) -> ContactResult<Vec<Contact>>;

    /// Get one contact by its identifier.
    async fn get_contact(&self, id: &str) -> ContactResult<Contact>;

    /// Create a contact from a full payload.
    async fn create_contact(&self, payload: Value) -> ContactResult<Contact>;

    /// Apply a partial update; only supplied fields change.
    async fn update_contact(&self, id: &str, payload: Value) -> ContactResult<Contact>;

    /// Delete a contact permanently.
    async fn delete_contact(&self, id: &str) -> ContactResult<DeletedContact>;

    /// Flip a contact's favorite flag, subject to the favorite quota.
    async fn toggle_favorite(&self, id: &str) -> ContactResult<FavoriteStatus>;

    /// Reconcile a batch of external contacts against the store.
    async fn sync_contacts(&self, payload: Value) -> ContactResult<SyncSummary>;

    /// Number of stored contacts.
    async fn contact_count(&self) -> ContactResult<usize>;
}

/// Default implementation of ContactService.
pub struct ContactServiceImpl {
    repo: Arc<dyn ContactRepository>,
    favorites: FavoriteLimiter,
    sync: SyncEngine,
    metrics: Metrics,
}

impl ContactServiceImpl {
    /// Create a new contact service.
    pub fn new(
        repo: Arc<dyn ContactRepository>,
        favorite_limit: usize,
        max_sync_batch: usize,
        metrics: Metrics,
    ) -> Self {
        Self {
            favorites: FavoriteLimiter::new(repo.clone(), favorite_limit),
            sync: SyncEngine::new(repo.clone(), max_sync_batch),
            repo,
            metrics,
        }
    }

    fn parse_id(id: &str) -> ContactResult<ContactId> {
        ContactId::new(id).map_err(|_| ContactError::InvalidId(id.to_string()))
    }

    /// Read, sanitize and validate a payload.
    fn read_input(payload: &Value, mode: ValidationMode) -> ContactResult<ContactInput> {
        let input = ContactInput::from_json(payload)
            .map_err(ContactError::Validation)?
            .sanitized();

        let errors = validate_contact_fields(&input, mode);
        if !errors.is_empty() {
            return Err(ContactError::Validation(errors));
        }
        Ok(input)
    }

    /// Reject a phone or email already held by a contact other than `owner`.
    async fn ensure_unique(
        &self,
        phone: Option<&str>,
        email: Option<&str>,
        owner: Option<&ContactId>,
    ) -> ContactResult<()> {
        if let Some(phone) = phone {
            if let Some(holder) = self.repo.find_by_phone(phone).await? {
                if Some(&holder.id) != owner {
                    return Err(ContactError::Duplicate {
                        field: UniqueField::Phone,
                        value: phone.to_string(),
                    });
                }
            }
        }

        if let Some(email) = email.filter(|e| !e.is_empty()) {
            if let Some(holder) = self.repo.find_by_email(email).await? {
                if Some(&holder.id) != owner {
                    return Err(ContactError::Duplicate {
                        field: UniqueField::Email,
                        value: email.to_string(),
                    });
                }
            }
        }
        Ok(())
    }

    async fn check_favorite(&self, current: Option<&Contact>, wants: bool) -> ContactResult<()> {
        let result = self.favorites.check(current, wants).await;
        if result.is_err() {
            self.metrics.record_favorite_rejection();
        }
        result
    }
}

#[async_trait]
impl ContactService for ContactServiceImpl {
    async fn list_contacts(&self) -> ContactResult<Vec<Contact>> {
        Ok(self.repo.list().await?)
    }

    async fn get_contact(&self, id: &str) -> ContactResult<Contact> {
        let id = Self::parse_id(id)?;
        Ok(self.repo.get(&id).await?)
    }

    async fn create_contact(&self, payload: Value) -> ContactResult<Contact> {
        let input = Self::read_input(&payload, ValidationMode::Full)?;
        let contact = NewContact::from_input(input);

        self.ensure_unique(Some(&contact.phone), Some(&contact.email), None)
            .await?;
        self.check_favorite(None, contact.is_favorite).await?;

        let created = self.repo.create(contact).await?;
        self.metrics.record_contact_created();
        tracing::info!(id = %created.id, "Contact created");
        Ok(created)
    }

    async fn update_contact(&self, id: &str, payload: Value) -> ContactResult<Contact> {
        let id = Self::parse_id(id)?;
        let existing = self.repo.get(&id).await?;
        let input = Self::read_input(&payload, ValidationMode::Partial)?;

        let mut updated = existing.clone();
        updated.apply(&input);

        let phone = input.phone.as_deref().map(normalize_phone);
        let email = input.email.as_ref().map(|_| updated.email.as_str());
        self.ensure_unique(phone.as_deref(), email, Some(&id)).await?;
        self.check_favorite(Some(&existing), updated.is_favorite).await?;

        let stored = self.repo.update(&updated).await?;
        self.metrics.record_contact_updated();
        tracing::info!(id = %stored.id, "Contact updated");
        Ok(stored)
    }

    async fn delete_contact(&self, id: &str) -> ContactResult<DeletedContact> {
        let id = Self::parse_id(id)?;
        let removed = self.repo.delete(&id).await?;
        self.metrics.record_contact_deleted();
        tracing::info!(id = %removed.id, "Contact deleted");
        Ok(DeletedContact {
            id: removed.id,
            name: removed.name,
        })
    }

    async fn toggle_favorite(&self, id: &str) -> ContactResult<FavoriteStatus> {
        let id = Self::parse_id(id)?;
        let mut contact = self.repo.get(&id).await?;
        let is_favorite = !contact.is_favorite;

        self.check_favorite(Some(&contact), is_favorite).await?;

        contact.is_favorite = is_favorite;
        let stored = self.repo.update(&contact).await?;
        tracing::info!(id = %stored.id, is_favorite, "Favorite toggled");
        Ok(FavoriteStatus {
            id: stored.id,
            is_favorite: stored.is_favorite,
        })
    }

    async fn sync_contacts(&self, payload: Value) -> ContactResult<SyncSummary> {
        let items = SyncEngine::parse_batch(payload)?;
        let summary = self.sync.run(items).await?;
        self.metrics.record_sync_batch(summary.added, summary.skipped);
        Ok(summary)
    }

    async fn contact_count(&self) -> ContactResult<usize> {
        Ok(self.repo.count().await?)
    }
}
