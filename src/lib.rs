//! Contacts API - a REST service for managing a personal contact list.
//!
//! Contacts carry a name, phone number (normalized to the Indonesian `08...`
//! form), optional email, address, avatar and group tag. Up to a configured
//! number of contacts may be marked favorite, and whole address books can be
//! merged in through a bulk sync endpoint.
//!
//! # Architecture
//!
//! - **domain**: Validated value objects and field rules
//! - **models**: Contact records and request payloads
//! - **repositories**: Storage abstraction and in-memory store
//! - **services**: Business operations, favorite quota and sync engine
//! - **server**: axum router, handlers and avatar upload
//! - **config**: Configuration management from environment variables
//! - **metrics**: Request and operation counters

pub mod config;
pub mod domain;
pub mod error;
pub mod metrics;
pub mod models;
pub mod repositories;
pub mod server;
pub mod services;

// Re-export commonly used types
pub use config::Config;
pub use error::{ConfigError, ContactError, StoreError, UniqueField};
pub use metrics::{HttpTimer, Metrics, MetricsSummary};
pub use models::{Contact, ContactGroup, ContactInput, NewContact};
pub use repositories::{ContactRepository, InMemoryContactRepository};
pub use server::{build_app, run_server, AppState};
pub use services::{ContactService, ContactServiceImpl, SyncEngine, SyncSummary};
