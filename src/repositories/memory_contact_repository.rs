use async_trait::async_trait;
use chrono::Utc;
use std::collections::HashMap;
use tokio::sync::RwLock;

use crate::domain::ContactId;
use crate::error::{StoreError, StoreResult, UniqueField};
use crate::models::{Contact, NewContact};
use crate::repositories::traits::ContactRepository;

/// Contact repository kept in process memory.
///
/// Unique indexes on phone and non-empty email are maintained next to the
/// records and checked inside the write lock, so concurrent writers cannot
/// both claim the same phone or email.
#[derive(Default)]
pub struct InMemoryContactRepository {
    inner: RwLock<Inner>,
}

#[derive(Default)]
struct Inner {
    contacts: HashMap<ContactId, Contact>,
    by_phone: HashMap<String, ContactId>,
    by_email: HashMap<String, ContactId>,
}

impl Inner {
    /// Check the unique indexes for a write by `owner` (None for inserts).
    fn check_unique(
        &self,
        phone: &str,
        email: &str,
        owner: Option<&ContactId>,
    ) -> StoreResult<()> {
        let taken = |index: &HashMap<String, ContactId>, key: &str| {
            index
                .get(key)
                .is_some_and(|holder| Some(holder) != owner)
        };

        if taken(&self.by_phone, phone) {
            return Err(StoreError::Duplicate {
                field: UniqueField::Phone,
                value: phone.to_string(),
            });
        }
        if !email.is_empty() && taken(&self.by_email, email) {
            return Err(StoreError::Duplicate {
                field: UniqueField::Email,
                value: email.to_string(),
            });
        }
        Ok(())
    }

    fn index(&mut self, contact: &Contact) {
        self.by_phone.insert(contact.phone.clone(), contact.id.clone());
        if !contact.email.is_empty() {
            self.by_email.insert(contact.email.clone(), contact.id.clone());
        }
    }

    fn unindex(&mut self, contact: &Contact) {
        self.by_phone.remove(&contact.phone);
        if !contact.email.is_empty() {
            self.by_email.remove(&contact.email);
        }
    }

    fn lookup(&self, index: &HashMap<String, ContactId>, key: &str) -> Option<Contact> {
        index
            .get(key)
            .and_then(|id| self.contacts.get(id))
            .cloned()
    }
}

impl InMemoryContactRepository {
    /// Create an empty repository.
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ContactRepository for InMemoryContactRepository {
    async fn get(&self, id: &ContactId) -> StoreResult<Contact> {
        let inner = self.inner.read().await;
        inner
            .contacts
            .get(id)
            .cloned()
            .ok_or_else(|| StoreError::NotFound(id.to_string()))
    }

    async fn list(&self) -> StoreResult<Vec<Contact>> {
        let inner = self.inner.read().await;
        let mut contacts: Vec<Contact> = inner.contacts.values().cloned().collect();
        contacts.sort_by(|a, b| a.name.cmp(&b.name).then_with(|| a.id.cmp(&b.id)));
        Ok(contacts)
    }

    async fn find_by_phone(&self, phone: &str) -> StoreResult<Option<Contact>> {
        let inner = self.inner.read().await;
        Ok(inner.lookup(&inner.by_phone, phone))
    }

    async fn find_by_email(&self, email: &str) -> StoreResult<Option<Contact>> {
        if email.is_empty() {
            return Ok(None);
        }
        let inner = self.inner.read().await;
        Ok(inner.lookup(&inner.by_email, email))
    }

    async fn count_favorites(&self, excluding: Option<&ContactId>) -> StoreResult<usize> {
        let inner = self.inner.read().await;
        Ok(inner
            .contacts
            .values()
            .filter(|c| c.is_favorite && Some(&c.id) != excluding)
            .count())
    }

    async fn create(&self, contact: NewContact) -> StoreResult<Contact> {
        let mut inner = self.inner.write().await;
        inner.check_unique(&contact.phone, &contact.email, None)?;

        let mut id = ContactId::generate();
        while inner.contacts.contains_key(&id) {
            id = ContactId::generate();
        }

        let stored = contact.into_contact(id, Utc::now());
        inner.index(&stored);
        inner.contacts.insert(stored.id.clone(), stored.clone());
        Ok(stored)
    }

    async fn update(&self, contact: &Contact) -> StoreResult<Contact> {
        let mut inner = self.inner.write().await;
        let previous = inner
            .contacts
            .get(&contact.id)
            .cloned()
            .ok_or_else(|| StoreError::NotFound(contact.id.to_string()))?;
        inner.check_unique(&contact.phone, &contact.email, Some(&contact.id))?;

        let mut stored = contact.clone();
        stored.created_at = previous.created_at;
        stored.updated_at = Utc::now();

        inner.unindex(&previous);
        inner.index(&stored);
        inner.contacts.insert(stored.id.clone(), stored.clone());
        Ok(stored)
    }

    async fn delete(&self, id: &ContactId) -> StoreResult<Contact> {
        let mut inner = self.inner.write().await;
        let removed = inner
            .contacts
            .remove(id)
            .ok_or_else(|| StoreError::NotFound(id.to_string()))?;
        inner.unindex(&removed);
        Ok(removed)
    }

    async fn count(&self) -> StoreResult<usize> {
        Ok(self.inner.read().await.contacts.len())
    }
}
