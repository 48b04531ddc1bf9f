//! Domain value objects, normalization and validation.
//!
//! This module contains type-safe wrappers for contact IDs, email addresses
//! and phone numbers, the phone normalizer, and the field validator used by
//! both single-contact writes and the sync pipeline.

pub mod contact_id;
pub mod email;
pub mod errors;
pub mod phone;
pub mod validation;

pub use contact_id::ContactId;
pub use email::{is_valid_email, EmailAddress};
pub use errors::ValidationError;
pub use phone::{is_valid_phone, normalize_phone, PhoneNumber};
pub use validation::{sanitize, validate_contact_fields, FieldError, ValidationMode};
