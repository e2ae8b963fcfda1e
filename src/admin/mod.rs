mod admin_store;
mod auth;
mod manager;
mod models;
mod reset_tokens;
mod schema;
mod sqlite_admin_store;

pub use admin_store::AdminStore;
pub use auth::{SessionClaims, SessionSigner, SingjamHasher};
pub use manager::{AdminManager, MIN_PASSWORD_LENGTH};
pub use models::{Admin, AdminSession, NewAdmin};
pub use reset_tokens::{InMemoryResetTokenStore, ResetTokenPayload, ResetTokenStore};
pub use sqlite_admin_store::SqliteAdminStore;
