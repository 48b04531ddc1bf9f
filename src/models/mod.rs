//! Data models for stored contacts and request payloads.

pub mod contact;

pub use contact::{
    default_avatar_url, Contact, ContactGroup, ContactInput, DeletedContact, FavoriteStatus,
    NewContact,
};
