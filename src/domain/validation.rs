//! Field validation and input sanitation for contact payloads.
//!
//! Validation never fails fast: every rule is checked and the problems are
//! returned as an ordered list of [`FieldError`] values so that clients can
//! show all of them at once.

use super::email::{is_valid_email, MAX_EMAIL_LEN};
use super::phone::is_valid_phone;
use crate::models::{ContactGroup, ContactInput};
use serde::Serialize;
use std::fmt;

/// Minimum name length in characters, after trimming.
pub const MIN_NAME_LEN: usize = 2;

/// Maximum name length in characters, after trimming.
pub const MAX_NAME_LEN: usize = 50;

/// Maximum avatar URL length in characters.
pub const MAX_AVATAR_LEN: usize = 500;

/// Whether a payload must be complete or may carry a subset of fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationMode {
    /// Creation: `name` and `phone` are mandatory.
    Full,
    /// Update: only the supplied fields are checked.
    Partial,
}

/// A single field-level validation problem.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    /// JSON name of the offending field.
    pub field: &'static str,
    /// Human-readable description.
    pub message: String,
}

impl FieldError {
    pub fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

impl fmt::Display for FieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

/// Drop `<` and `>` characters, then trim surrounding whitespace.
///
/// ```
/// use contacts_api::domain::sanitize;
///
/// assert_eq!(sanitize("  <b>Budi</b> "), "bBudi/b");
/// assert_eq!(sanitize("< Budi >"), "Budi");
/// assert_eq!(sanitize("<  >"), "");
/// ```
pub fn sanitize(input: &str) -> String {
    let stripped: String = input.chars().filter(|c| *c != '<' && *c != '>').collect();
    stripped.trim().to_string()
}

/// Validate the contents of a contact payload.
///
/// Type checks (text fields are strings, `isFavorite` is a boolean) already
/// happened when the payload was read into a [`ContactInput`]; this checks the
/// values themselves. Errors are ordered name, email, phone, avatar, group.
pub fn validate_contact_fields(input: &ContactInput, mode: ValidationMode) -> Vec<FieldError> {
    let mut errors = Vec::new();
    let full = mode == ValidationMode::Full;

    match input.name.as_deref() {
        Some(name) => {
            let len = name.trim().chars().count();
            if len == 0 {
                errors.push(FieldError::new("name", "Name is required"));
            } else if !(MIN_NAME_LEN..=MAX_NAME_LEN).contains(&len) {
                errors.push(FieldError::new(
                    "name",
                    format!(
                        "Name must be between {} and {} characters",
                        MIN_NAME_LEN, MAX_NAME_LEN
                    ),
                ));
            }
        }
        None if full => errors.push(FieldError::new("name", "Name is required")),
        None => {}
    }

    if let Some(email) = input.email.as_deref() {
        let email = email.trim();
        if !email.is_empty() {
            if !is_valid_email(email) {
                errors.push(FieldError::new("email", "Invalid email format"));
            } else if email.chars().count() > MAX_EMAIL_LEN {
                errors.push(FieldError::new(
                    "email",
                    format!("Email must be at most {} characters", MAX_EMAIL_LEN),
                ));
            }
        }
    }

    match input.phone.as_deref() {
        Some(phone) if phone.trim().is_empty() => {
            errors.push(FieldError::new("phone", "Phone number is required"));
        }
        Some(phone) => {
            if !is_valid_phone(phone) {
                errors.push(FieldError::new(
                    "phone",
                    "Invalid phone number format (use 08xx, 628xx or +628xx)",
                ));
            }
        }
        None if full => errors.push(FieldError::new("phone", "Phone number is required")),
        None => {}
    }

    if let Some(avatar) = input.avatar.as_deref() {
        if avatar.trim().chars().count() > MAX_AVATAR_LEN {
            errors.push(FieldError::new(
                "avatar",
                format!("Avatar URL must be at most {} characters", MAX_AVATAR_LEN),
            ));
        }
    }

    if let Some(group) = input.group.as_deref() {
        if ContactGroup::parse(group.trim()).is_none() {
            errors.push(FieldError::new(
                "group",
                "Group must be one of Family, Friend, Work or empty",
            ));
        }
    }

    errors
}
