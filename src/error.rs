//! Error types for the contacts API.
//!
//! This module defines custom error types using `thiserror` for precise error handling.
//! HTTP status mapping lives in [`crate::server::ApiError`].

use crate::domain::FieldError;
use thiserror::Error;

/// Field covered by a store uniqueness constraint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UniqueField {
    Phone,
    Email,
}

impl std::fmt::Display for UniqueField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Phone => f.write_str("phone"),
            Self::Email => f.write_str("email"),
        }
    }
}

/// Errors returned by a contact store.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// No record with the given identifier
    #[error("Contact not found: {0}")]
    NotFound(String),

    /// A write would violate a uniqueness constraint
    #[error("Duplicate {field}: {value}")]
    Duplicate { field: UniqueField, value: String },

    /// The storage backend failed
    #[error("Storage backend error: {0}")]
    Backend(String),
}

/// Errors produced by contact operations.
#[derive(Error, Debug)]
pub enum ContactError {
    /// Payload failed validation
    #[error("Validation failed: {}", join_messages(.0))]
    Validation(Vec<FieldError>),

    /// Identifier is not a 24-character hex string
    #[error("Invalid contact ID: {0}")]
    InvalidId(String),

    /// No contact with the given identifier
    #[error("Contact not found: {0}")]
    NotFound(String),

    /// Phone or email already used by another contact
    #[error("{field} already registered: {value}")]
    Duplicate { field: UniqueField, value: String },

    /// Favorite quota reached
    #[error("Favorite limit reached: at most {limit} contacts can be favorites")]
    FavoriteLimit { limit: usize },

    /// Sync batch is missing, empty or too large
    #[error("Invalid sync batch: {0}")]
    InvalidBatch(String),

    /// Unexpected store failure
    #[error("Store error: {0}")]
    Store(StoreError),
}

impl From<StoreError> for ContactError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound(id) => Self::NotFound(id),
            StoreError::Duplicate { field, value } => Self::Duplicate { field, value },
            other => Self::Store(other),
        }
    }
}

fn join_messages(errors: &[FieldError]) -> String {
    errors
        .iter()
        .map(|e| e.message.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}

/// Errors that can occur during configuration loading.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Environment variable has invalid value
    #[error("Invalid value for {var}: {reason}")]
    InvalidValue { var: String, reason: String },
}

/// Convenience type alias for Results with StoreError
pub type StoreResult<T> = Result<T, StoreError>;

/// Convenience type alias for Results with ContactError
pub type ContactResult<T> = Result<T, ContactError>;

/// Convenience type alias for Results with ConfigError
pub type ConfigResult<T> = Result<T, ConfigError>;
