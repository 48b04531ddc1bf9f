use async_trait::async_trait;
use chrono::Utc;
use contacts_api::domain::ContactId;
use contacts_api::error::{StoreError, StoreResult, UniqueField};
use contacts_api::models::{Contact, NewContact};
use contacts_api::repositories::ContactRepository;
use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

/// Mock contact repository for testing.
///
/// Keeps contacts in a plain map, enforces the phone and email uniqueness
/// rules, tracks method calls for verification and can be told to fail
/// specific methods with a backend error. With lookups hidden, the
/// `find_by_*` methods miss and only the write-time uniqueness check remains.
#[allow(dead_code)]
#[derive(Clone)]
pub struct MockContactRepository {
    contacts: Arc<Mutex<HashMap<ContactId, Contact>>>,
    call_counts: Arc<Mutex<HashMap<String, usize>>>,
    failing: Arc<Mutex<HashSet<String>>>,
    lookups_hidden: Arc<AtomicBool>,
}

#[allow(dead_code)]
impl MockContactRepository {
    /// Create a new empty MockContactRepository.
    pub fn new() -> Self {
        Self {
            contacts: Arc::new(Mutex::new(HashMap::new())),
            call_counts: Arc::new(Mutex::new(HashMap::new())),
            failing: Arc::new(Mutex::new(HashSet::new())),
            lookups_hidden: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Add a contact directly, bypassing uniqueness checks.
    pub fn add_contact(&self, contact: Contact) {
        let mut contacts = self.contacts.lock().unwrap();
        contacts.insert(contact.id.clone(), contact);
    }

    /// Add multiple contacts directly.
    pub fn add_contacts(&self, contacts_list: Vec<Contact>) {
        let mut contacts = self.contacts.lock().unwrap();
        for contact in contacts_list {
            contacts.insert(contact.id.clone(), contact);
        }
    }

    /// Snapshot of all stored contacts, unordered.
    pub fn all(&self) -> Vec<Contact> {
        self.contacts.lock().unwrap().values().cloned().collect()
    }

    /// Make every later call to `method` fail with `StoreError::Backend`.
    pub fn fail_on(&self, method: &str) {
        self.failing.lock().unwrap().insert(method.to_string());
    }

    /// Make `find_by_phone` and `find_by_email` always return `None`.
    pub fn hide_lookups(&self) {
        self.lookups_hidden.store(true, Ordering::SeqCst);
    }

    fn lookups_hidden(&self) -> bool {
        self.lookups_hidden.load(Ordering::SeqCst)
    }

    /// Get the number of times a method was called.
    pub fn get_call_count(&self, method: &str) -> usize {
        let counts = self.call_counts.lock().unwrap();
        *counts.get(method).unwrap_or(&0)
    }

    /// Reset all call counts.
    pub fn reset_call_counts(&self) {
        let mut counts = self.call_counts.lock().unwrap();
        counts.clear();
    }

    /// Clear all contacts from the repository.
    pub fn clear(&self) {
        let mut contacts = self.contacts.lock().unwrap();
        contacts.clear();
    }

    /// Track a call and apply any injected failure.
    fn track_call(&self, method: &str) -> StoreResult<()> {
        let mut counts = self.call_counts.lock().unwrap();
        *counts.entry(method.to_string()).or_insert(0) += 1;

        if self.failing.lock().unwrap().contains(method) {
            return Err(StoreError::Backend(format!("injected failure in {}", method)));
        }
        Ok(())
    }

    fn check_unique(
        contacts: &HashMap<ContactId, Contact>,
        phone: &str,
        email: &str,
        owner: Option<&ContactId>,
    ) -> StoreResult<()> {
        for contact in contacts.values() {
            if Some(&contact.id) == owner {
                continue;
            }
            if contact.phone == phone {
                return Err(StoreError::Duplicate {
                    field: UniqueField::Phone,
                    value: phone.to_string(),
                });
            }
            if !email.is_empty() && contact.email == email {
                return Err(StoreError::Duplicate {
                    field: UniqueField::Email,
                    value: email.to_string(),
                });
            }
        }
        Ok(())
    }
}

impl Default for MockContactRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ContactRepository for MockContactRepository {
    async fn get(&self, id: &ContactId) -> StoreResult<Contact> {
        self.track_call("get")?;

        let contacts = self.contacts.lock().unwrap();
        contacts
            .get(id)
            .cloned()
            .ok_or_else(|| StoreError::NotFound(id.to_string()))
    }

    async fn list(&self) -> StoreResult<Vec<Contact>> {
        self.track_call("list")?;

        let mut result = self.all();
        result.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(result)
    }

    async fn find_by_phone(&self, phone: &str) -> StoreResult<Option<Contact>> {
        self.track_call("find_by_phone")?;
        if self.lookups_hidden() {
            return Ok(None);
        }

        let contacts = self.contacts.lock().unwrap();
        Ok(contacts.values().find(|c| c.phone == phone).cloned())
    }

    async fn find_by_email(&self, email: &str) -> StoreResult<Option<Contact>> {
        self.track_call("find_by_email")?;
        if self.lookups_hidden() {
            return Ok(None);
        }

        let contacts = self.contacts.lock().unwrap();
        Ok(contacts
            .values()
            .find(|c| !email.is_empty() && c.email == email)
            .cloned())
    }

    async fn count_favorites(&self, excluding: Option<&ContactId>) -> StoreResult<usize> {
        self.track_call("count_favorites")?;

        let contacts = self.contacts.lock().unwrap();
        Ok(contacts
            .values()
            .filter(|c| c.is_favorite && Some(&c.id) != excluding)
            .count())
    }

    async fn create(&self, contact: NewContact) -> StoreResult<Contact> {
        self.track_call("create")?;

        let mut contacts = self.contacts.lock().unwrap();
        Self::check_unique(&contacts, &contact.phone, &contact.email, None)?;

        let created = contact.into_contact(ContactId::generate(), Utc::now());
        contacts.insert(created.id.clone(), created.clone());
        Ok(created)
    }

    async fn update(&self, contact: &Contact) -> StoreResult<Contact> {
        self.track_call("update")?;

        let mut contacts = self.contacts.lock().unwrap();
        let created_at = match contacts.get(&contact.id) {
            Some(existing) => existing.created_at,
            None => return Err(StoreError::NotFound(contact.id.to_string())),
        };
        Self::check_unique(&contacts, &contact.phone, &contact.email, Some(&contact.id))?;

        let mut stored = contact.clone();
        stored.created_at = created_at;
        stored.updated_at = Utc::now();
        contacts.insert(stored.id.clone(), stored.clone());
        Ok(stored)
    }

    async fn delete(&self, id: &ContactId) -> StoreResult<Contact> {
        self.track_call("delete")?;

        let mut contacts = self.contacts.lock().unwrap();
        contacts
            .remove(id)
            .ok_or_else(|| StoreError::NotFound(id.to_string()))
    }

    async fn count(&self) -> StoreResult<usize> {
        self.track_call("count")?;

        Ok(self.contacts.lock().unwrap().len())
    }
}
