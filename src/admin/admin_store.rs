//! AdminStore trait definition.

use anyhow::Result;

use super::models::Admin;

/// Storage backend for administrator accounts. Emails are unique; the
/// store only ever sees password hashes.
pub trait AdminStore: Send + Sync {
    /// Insert a new admin. Fails on duplicate id or email.
    fn insert_admin(&self, admin: &Admin) -> Result<()>;

    fn get_by_email(&self, email: &str) -> Result<Option<Admin>>;

    fn get_by_id(&self, id: &str) -> Result<Option<Admin>>;

    /// Replace an admin's password hash. Returns false if the admin does
    /// not exist.
    fn update_password_hash(&self, id: &str, password_hash: &str) -> Result<bool>;

    fn email_exists(&self, email: &str) -> Result<bool>;

    fn count_admins(&self) -> Result<i64>;
}
