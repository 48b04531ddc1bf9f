//! Application service layer.
//!
//! Services contain business logic and orchestrate interactions with the
//! contact store. They provide a clean boundary between the HTTP handlers
//! and the data access layer.

mod contact_service;
pub mod favorites;
pub mod sync_engine;

pub use contact_service::{ContactService, ContactServiceImpl};
pub use favorites::{FavoriteLimiter, DEFAULT_FAVORITE_LIMIT};
pub use sync_engine::{SyncEngine, SyncSummary, DEFAULT_MAX_SYNC_BATCH, MAX_REPORTED_ERRORS};
