//! Karaoke Catalog Server Library
//!
//! This library exposes the internal modules for testing and potential reuse.

pub mod admin;
pub mod catalog_store;
pub mod config;
pub mod errors;
pub mod history;
pub mod pagination;
pub mod server;
pub mod sqlite_persistence;

// Re-export commonly used types for convenience
pub use admin::{AdminManager, AdminStore, InMemoryResetTokenStore, SqliteAdminStore};
pub use catalog_store::{CatalogStore, SqliteCatalogStore};
pub use errors::ServiceError;
pub use history::{EventRecorder, HistoryStore, SqliteHistoryStore};
pub use server::{make_app, run_server, RequestsLoggingLevel, ServerConfig};
