//! Bulk contact sync.
//!
//! A batch of externally sourced contacts (typically a phone's address book)
//! is reconciled against the store one item at a time. Items are processed
//! sequentially so that later items see earlier inserts; an invalid item is
//! skipped with a reason and never stops the rest of the batch. Only an
//! unexpected store failure aborts the run.

use crate::domain::validation::{MAX_NAME_LEN, MIN_NAME_LEN};
use crate::domain::{normalize_phone, sanitize, EmailAddress, PhoneNumber};
use crate::error::{ContactError, ContactResult, StoreError, UniqueField};
use crate::models::{default_avatar_url, ContactGroup, NewContact};
use crate::repositories::ContactRepository;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::sync::Arc;

/// Default upper bound on the number of items in one batch.
pub const DEFAULT_MAX_SYNC_BATCH: usize = 1000;

/// Number of skip reasons reported back to the client.
pub const MAX_REPORTED_ERRORS: usize = 10;

/// Outcome of a sync run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SyncSummary {
    /// Items in the batch.
    pub processed: usize,
    /// Items inserted as new contacts.
    pub added: usize,
    /// Items not inserted, duplicates included.
    pub skipped: usize,
    /// Skip reasons, at most [`MAX_REPORTED_ERRORS`].
    pub errors: Vec<String>,
}

impl SyncSummary {
    fn record(mut self, outcome: ItemOutcome) -> Self {
        self.processed += 1;
        match outcome {
            ItemOutcome::Added => self.added += 1,
            ItemOutcome::Duplicate => self.skipped += 1,
            ItemOutcome::Rejected(reason) => {
                self.skipped += 1;
                if self.errors.len() < MAX_REPORTED_ERRORS {
                    self.errors.push(reason);
                }
            }
        }
        self
    }
}

#[derive(Debug, PartialEq, Eq)]
enum ItemOutcome {
    Added,
    /// Phone already stored; skipped without a reason.
    Duplicate,
    Rejected(String),
}

/// Reconciles sync batches against a contact store.
#[derive(Clone)]
pub struct SyncEngine {
    repo: Arc<dyn ContactRepository>,
    max_batch: usize,
}

impl SyncEngine {
    pub fn new(repo: Arc<dyn ContactRepository>, max_batch: usize) -> Self {
        Self { repo, max_batch }
    }

    /// Extract the list of items from a request body.
    ///
    /// Accepts either `{"contacts": [...]}` or a bare array.
    ///
    /// # Errors
    ///
    /// Returns `ContactError::InvalidBatch` if no list is present.
    pub fn parse_batch(body: Value) -> ContactResult<Vec<Value>> {
        match body {
            Value::Array(items) => Ok(items),
            Value::Object(mut object) => match object.remove("contacts") {
                Some(Value::Array(items)) => Ok(items),
                _ => Err(ContactError::InvalidBatch(
                    "Request body must contain a \"contacts\" array".to_string(),
                )),
            },
            _ => Err(ContactError::InvalidBatch(
                "Request body must be a contacts array".to_string(),
            )),
        }
    }

    /// Run a batch to completion.
    ///
    /// # Errors
    ///
    /// Returns `ContactError::InvalidBatch` for an empty or oversized batch,
    /// and `ContactError::Store` if the store fails mid-batch. Items processed
    /// before a store failure stay committed.
    pub async fn run(&self, items: Vec<Value>) -> ContactResult<SyncSummary> {
        if items.is_empty() {
            return Err(ContactError::InvalidBatch(
                "Contact list must not be empty".to_string(),
            ));
        }
        if items.len() > self.max_batch {
            return Err(ContactError::InvalidBatch(format!(
                "At most {} contacts can be synced at once, got {}",
                self.max_batch,
                items.len()
            )));
        }

        let mut summary = SyncSummary::default();
        for (index, item) in items.iter().enumerate() {
            let outcome = self.process_item(index, item).await?;
            if let ItemOutcome::Rejected(reason) = &outcome {
                tracing::debug!(index, reason = %reason, "Sync item skipped");
            }
            summary = summary.record(outcome);
        }

        tracing::info!(
            processed = summary.processed,
            added = summary.added,
            skipped = summary.skipped,
            "Sync batch completed"
        );
        Ok(summary)
    }

    async fn process_item(&self, index: usize, item: &Value) -> ContactResult<ItemOutcome> {
        let contact = match prepare_item(index, item) {
            Ok(contact) => contact,
            Err(reason) => return Ok(ItemOutcome::Rejected(reason)),
        };

        if self.repo.find_by_phone(&contact.phone).await?.is_some() {
            return Ok(ItemOutcome::Duplicate);
        }

        match self.repo.create(contact).await {
            Ok(_) => Ok(ItemOutcome::Added),
            Err(StoreError::Duplicate {
                field: UniqueField::Phone,
                ..
            }) => Ok(ItemOutcome::Duplicate),
            Err(StoreError::Duplicate {
                field: UniqueField::Email,
                value,
            }) => Ok(ItemOutcome::Rejected(format!(
                "Item {}: email {} is already registered",
                index, value
            ))),
            Err(err) => Err(ContactError::Store(err)),
        }
    }
}

/// Read one text field of a sync item; absent and `null` read as empty.
fn item_text(object: &Map<String, Value>, field: &str) -> Option<String> {
    match object.get(field) {
        None | Some(Value::Null) => Some(String::new()),
        Some(Value::String(text)) => Some(sanitize(text)),
        Some(_) => None,
    }
}

/// Sanitize, normalize and check one raw item.
///
/// Only `name`, `phone` and `email` are read; other fields are ignored
/// whatever their type.
fn prepare_item(index: usize, item: &Value) -> Result<NewContact, String> {
    let invalid = || format!("Item {}: invalid contact data", index);
    let object = item.as_object().ok_or_else(invalid)?;

    let name = item_text(object, "name").ok_or_else(invalid)?;
    let raw_phone = item_text(object, "phone").ok_or_else(invalid)?;
    let email = item_text(object, "email").ok_or_else(invalid)?;

    if name.is_empty() || normalize_phone(&raw_phone).is_empty() {
        return Err(format!("Item {}: name and phone are required", index));
    }
    if !(MIN_NAME_LEN..=MAX_NAME_LEN).contains(&name.chars().count()) {
        return Err(format!(
            "Item {}: name must be between {} and {} characters",
            index, MIN_NAME_LEN, MAX_NAME_LEN
        ));
    }
    let phone = PhoneNumber::new(raw_phone.as_str())
        .map_err(|_| format!("Item {}: invalid phone number {}", index, raw_phone))?
        .into_inner();
    let email = if email.is_empty() {
        String::new()
    } else {
        EmailAddress::new(email.as_str())
            .map_err(|_| format!("Item {}: invalid email {}", index, email))?
            .into_inner()
    };

    Ok(NewContact {
        avatar: default_avatar_url(&name),
        name,
        email,
        phone,
        address: String::new(),
        group: ContactGroup::None,
        is_favorite: false,
    })
}
