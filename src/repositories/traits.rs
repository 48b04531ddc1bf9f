use crate::domain::ContactId;
use crate::error::StoreResult;
use crate::models::{Contact, NewContact};
use async_trait::async_trait;

/// Repository for managing contacts.
///
/// Provides abstraction over contact storage and retrieval, enabling
/// different implementations (in-memory, database-backed, test doubles).
/// Implementations must enforce uniqueness of `phone` and of non-empty
/// `email` on every write and report violations as
/// [`StoreError::Duplicate`](crate::error::StoreError::Duplicate).
#[async_trait]
pub trait ContactRepository: Send + Sync {
    /// Retrieve a single contact by ID.
    async fn get(&self, id: &ContactId) -> StoreResult<Contact>;

    /// Retrieve all contacts, sorted by name ascending.
    async fn list(&self) -> StoreResult<Vec<Contact>>;

    /// Find the contact holding a normalized phone number.
    async fn find_by_phone(&self, phone: &str) -> StoreResult<Option<Contact>>;

    /// Find the contact holding a (lowercase) email address.
    async fn find_by_email(&self, email: &str) -> StoreResult<Option<Contact>>;

    /// Count favorited contacts, optionally ignoring one contact.
    async fn count_favorites(&self, excluding: Option<&ContactId>) -> StoreResult<usize>;

    /// Store a new contact, assigning its ID and timestamps.
    async fn create(&self, contact: NewContact) -> StoreResult<Contact>;

    /// Replace an existing contact, refreshing `updated_at`.
    async fn update(&self, contact: &Contact) -> StoreResult<Contact>;

    /// Delete a contact permanently, returning the removed record.
    async fn delete(&self, id: &ContactId) -> StoreResult<Contact>;

    /// Number of stored contacts.
    async fn count(&self) -> StoreResult<usize>;
}
