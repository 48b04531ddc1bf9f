//! Contact model and the typed payloads used to create and update contacts.

use crate::domain::{normalize_phone, sanitize, ContactId, FieldError};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Base URL of the placeholder avatar service.
pub const AVATAR_SERVICE_URL: &str = "https://ui-avatars.com/api/";

/// Group tag attached to a contact.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ContactGroup {
    Family,
    Friend,
    Work,
    /// No group assigned, serialized as `""`.
    #[default]
    #[serde(rename = "")]
    None,
}

impl ContactGroup {
    /// Parse a group tag; only exact names and the empty string are accepted.
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "Family" => Some(Self::Family),
            "Friend" => Some(Self::Friend),
            "Work" => Some(Self::Work),
            "" => Some(Self::None),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Family => "Family",
            Self::Friend => "Friend",
            Self::Work => "Work",
            Self::None => "",
        }
    }
}

/// A stored contact.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Contact {
    /// Store-assigned identifier
    pub id: ContactId,

    /// Display name, trimmed and sanitized
    pub name: String,

    /// Lowercase email address, or empty
    pub email: String,

    /// Normalized phone number
    pub phone: String,

    /// Free-text address, or empty
    pub address: String,

    /// Avatar URL, never empty
    pub avatar: String,

    pub group: ContactGroup,

    pub is_favorite: bool,

    pub created_at: DateTime<Utc>,

    pub updated_at: DateTime<Utc>,
}

impl Contact {
    /// Apply a validated, sanitized partial update.
    ///
    /// Only the fields present in `input` change. An empty avatar falls back
    /// to the generated placeholder for the (possibly new) name.
    pub fn apply(&mut self, input: &ContactInput) {
        if let Some(name) = &input.name {
            self.name = name.clone();
        }
        if let Some(email) = &input.email {
            self.email = canonical_email(email);
        }
        if let Some(phone) = &input.phone {
            self.phone = normalize_phone(phone);
        }
        if let Some(address) = &input.address {
            self.address = address.clone();
        }
        if let Some(avatar) = &input.avatar {
            self.avatar = avatar.trim().to_string();
        }
        if self.avatar.is_empty() {
            self.avatar = default_avatar_url(&self.name);
        }
        if let Some(group) = input.group.as_deref() {
            self.group = ContactGroup::parse(group.trim()).unwrap_or_default();
        }
        if let Some(is_favorite) = input.is_favorite {
            self.is_favorite = is_favorite;
        }
    }
}

/// A contact that has not been stored yet.
///
/// The store assigns the identifier and timestamps.
#[derive(Debug, Clone, PartialEq)]
pub struct NewContact {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub address: String,
    pub avatar: String,
    pub group: ContactGroup,
    pub is_favorite: bool,
}

impl NewContact {
    /// Build a new contact from a validated, sanitized payload.
    pub fn from_input(input: ContactInput) -> Self {
        let name = input.name.unwrap_or_default();
        let avatar = input
            .avatar
            .map(|a| a.trim().to_string())
            .filter(|a| !a.is_empty())
            .unwrap_or_else(|| default_avatar_url(&name));

        Self {
            email: input.email.as_deref().map(canonical_email).unwrap_or_default(),
            phone: input.phone.as_deref().map(normalize_phone).unwrap_or_default(),
            address: input.address.unwrap_or_default(),
            group: input
                .group
                .as_deref()
                .and_then(|g| ContactGroup::parse(g.trim()))
                .unwrap_or_default(),
            is_favorite: input.is_favorite.unwrap_or(false),
            avatar,
            name,
        }
    }

    /// Materialize the record with a store-assigned identifier and timestamp.
    pub fn into_contact(self, id: ContactId, now: DateTime<Utc>) -> Contact {
        Contact {
            id,
            name: self.name,
            email: self.email,
            phone: self.phone,
            address: self.address,
            avatar: self.avatar,
            group: self.group,
            is_favorite: self.is_favorite,
            created_at: now,
            updated_at: now,
        }
    }
}

/// A create or update payload read from JSON.
///
/// `None` means the field was absent (or `null`) in the request.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ContactInput {
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub avatar: Option<String>,
    pub group: Option<String>,
    pub is_favorite: Option<bool>,
}

impl ContactInput {
    /// Read a payload, checking that each known field has the right JSON type.
    ///
    /// Unknown fields are ignored.
    ///
    /// # Errors
    ///
    /// Returns every type problem found, or a single error if the payload is
    /// not a JSON object.
    pub fn from_json(value: &Value) -> Result<Self, Vec<FieldError>> {
        let Some(object) = value.as_object() else {
            return Err(vec![FieldError::new(
                "body",
                "Contact data must be a JSON object",
            )]);
        };

        let mut errors = Vec::new();
        let input = Self {
            name: text_field(object, "name", &mut errors),
            email: text_field(object, "email", &mut errors),
            phone: text_field(object, "phone", &mut errors),
            address: text_field(object, "address", &mut errors),
            avatar: text_field(object, "avatar", &mut errors),
            group: text_field(object, "group", &mut errors),
            is_favorite: match object.get("isFavorite") {
                None | Some(Value::Null) => None,
                Some(Value::Bool(flag)) => Some(*flag),
                Some(_) => {
                    errors.push(FieldError::new("isFavorite", "isFavorite must be a boolean"));
                    None
                }
            },
        };

        if errors.is_empty() {
            Ok(input)
        } else {
            Err(errors)
        }
    }

    /// Strip markup characters and surrounding whitespace from text fields.
    pub fn sanitized(self) -> Self {
        Self {
            name: self.name.as_deref().map(sanitize),
            email: self.email.as_deref().map(sanitize),
            phone: self.phone.as_deref().map(sanitize),
            address: self.address.as_deref().map(sanitize),
            avatar: self.avatar.map(|a| a.trim().to_string()),
            group: self.group.map(|g| g.trim().to_string()),
            is_favorite: self.is_favorite,
        }
    }
}

fn text_field(
    object: &Map<String, Value>,
    field: &'static str,
    errors: &mut Vec<FieldError>,
) -> Option<String> {
    match object.get(field) {
        None | Some(Value::Null) => None,
        Some(Value::String(text)) => Some(text.clone()),
        Some(_) => {
            errors.push(FieldError::new(field, format!("{} must be a string", field)));
            None
        }
    }
}

fn canonical_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// Build the placeholder avatar URL for a name.
///
/// ```
/// use contacts_api::models::default_avatar_url;
///
/// assert_eq!(
///     default_avatar_url("Budi Santoso"),
///     "https://ui-avatars.com/api/?name=Budi+Santoso&background=random&color=fff"
/// );
/// ```
pub fn default_avatar_url(name: &str) -> String {
    let formatted = name
        .split_whitespace()
        .map(|word| urlencoding::encode(word).into_owned())
        .collect::<Vec<_>>()
        .join("+");
    format!(
        "{}?name={}&background=random&color=fff",
        AVATAR_SERVICE_URL, formatted
    )
}

/// Response body for a deleted contact.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DeletedContact {
    pub id: ContactId,
    pub name: String,
}

/// Response body for a favorite toggle.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct FavoriteStatus {
    pub id: ContactId,
    pub is_favorite: bool,
}
