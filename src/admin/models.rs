//! Admin account models.

use serde::{Deserialize, Serialize};

/// An administrator account as stored. The password hash is a PHC string
/// and never leaves the process.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct Admin {
    pub id: String,
    pub name: String,
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub address: Option<String>,
}

/// Input for admin creation. The plaintext password gets hashed before it
/// touches the store.
#[derive(Clone, Debug)]
pub struct NewAdmin {
    pub name: String,
    pub email: String,
    pub password: String,
    pub address: Option<String>,
}

/// A freshly issued session, as returned by login.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct AdminSession {
    pub token: String,
    pub expires_in: i64,
}
