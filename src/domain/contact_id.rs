//! ContactId value object.

use super::errors::ValidationError;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// Number of hexadecimal characters in a contact identifier.
pub const CONTACT_ID_LEN: usize = 24;

/// A type-safe wrapper for contact IDs.
///
/// Identifiers are 24 hexadecimal characters (12 bytes), the shape used by
/// document stores for object IDs. They are kept in lowercase so that lookups
/// are case-insensitive.
///
/// # Example
///
/// ```
/// use contacts_api::domain::ContactId;
///
/// let id = ContactId::new("65A1F0C2B3D4E5F601234567").unwrap();
/// assert_eq!(id.as_str(), "65a1f0c2b3d4e5f601234567");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ContactId(String);

impl ContactId {
    /// Create a new ContactId, validating its shape.
    ///
    /// # Errors
    ///
    /// Returns `ValidationError::InvalidId` unless the input is exactly
    /// 24 hexadecimal characters.
    pub fn new(id: impl Into<String>) -> Result<Self, ValidationError> {
        let id = id.into();
        if !Self::is_valid(&id) {
            return Err(ValidationError::InvalidId(id));
        }
        Ok(Self(id.to_ascii_lowercase()))
    }

    /// Check whether a string has the shape of a contact ID.
    pub fn is_valid(id: &str) -> bool {
        id.len() == CONTACT_ID_LEN && id.bytes().all(|b| b.is_ascii_hexdigit())
    }

    /// Generate a fresh identifier.
    ///
    /// The first 4 bytes hold the creation time in seconds, the remaining
    /// 8 bytes are random.
    pub fn generate() -> Self {
        let seconds = chrono::Utc::now().timestamp() as u32;
        let random: u64 = rand::random();
        Self(format!("{:08x}{:016x}", seconds, random))
    }

    /// Get the ID as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

// Serde support - serialize as string
impl Serialize for ContactId {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        self.0.serialize(serializer)
    }
}

// Serde support - deserialize from string with validation
impl<'de> Deserialize<'de> for ContactId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        ContactId::new(s).map_err(serde::de::Error::custom)
    }
}

// Display support
impl fmt::Display for ContactId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
