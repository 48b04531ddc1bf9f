//! PhoneNumber value object and the phone normalizer.
//!
//! Phone numbers are Indonesian mobile numbers. They are accepted with a
//! `+62`, `62` or `0` prefix and optional spaces or hyphens, and are always
//! stored in the canonical form produced by [`normalize_phone`]: ASCII digits
//! starting with a single `0`.

use super::errors::ValidationError;
use once_cell::sync::Lazy;
use regex::Regex;

static MOBILE_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(?:\+62|62|0)8[1-9][0-9]{6,11}$").expect("mobile pattern is valid")
});

/// Remove whitespace and hyphens.
fn strip_separators(raw: &str) -> String {
    raw.chars()
        .filter(|c| !c.is_whitespace() && *c != '-')
        .collect()
}

/// Canonicalize a phone number.
///
/// Separators are stripped and a leading `+62` or `62` country code is
/// replaced with `0`. Anything that is not all digits afterwards normalizes
/// to the empty string, which callers treat as invalid. Normalizing an
/// already normalized number returns it unchanged.
///
/// ```
/// use contacts_api::domain::normalize_phone;
///
/// assert_eq!(normalize_phone("+62 812-3456-7890"), "081234567890");
/// assert_eq!(normalize_phone("081234567890"), "081234567890");
/// assert_eq!(normalize_phone("call me"), "");
/// ```
pub fn normalize_phone(raw: &str) -> String {
    let stripped = strip_separators(raw);

    let canonical = if let Some(rest) = stripped.strip_prefix("+62") {
        format!("0{}", rest)
    } else if let Some(rest) = stripped.strip_prefix("62") {
        format!("0{}", rest)
    } else {
        stripped
    };

    if canonical.bytes().all(|b| b.is_ascii_digit()) {
        canonical
    } else {
        String::new()
    }
}

/// Check whether a phone number is a valid Indonesian mobile number.
///
/// Separators are ignored; the country code may be written as `+62`, `62`
/// or a leading `0`.
pub fn is_valid_phone(raw: &str) -> bool {
    MOBILE_PATTERN.is_match(&strip_separators(raw))
}

/// A validated, normalized phone number.
///
/// # Example
///
/// ```
/// use contacts_api::domain::PhoneNumber;
///
/// let phone = PhoneNumber::new("+6281234567890").unwrap();
/// assert_eq!(phone.as_str(), "081234567890");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PhoneNumber(String);

impl PhoneNumber {
    /// Validate and normalize a phone number.
    ///
    /// # Errors
    ///
    /// Returns `ValidationError::InvalidPhone` if the number is not a valid
    /// Indonesian mobile number.
    pub fn new(phone: impl Into<String>) -> Result<Self, ValidationError> {
        let phone = phone.into();

        if !is_valid_phone(&phone) {
            return Err(ValidationError::InvalidPhone(phone));
        }

        Ok(Self(normalize_phone(&phone)))
    }

    /// Get the normalized phone number as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Convert into the underlying String.
    pub fn into_inner(self) -> String {
        self.0
    }
}
