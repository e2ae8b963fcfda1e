//! Single-use password-reset tokens.
//!
//! Tokens live in memory only; a restart invalidates outstanding tokens,
//! which is acceptable for a short-lived recovery credential. Expired
//! entries are purged lazily on access.

use chrono::{DateTime, Duration, Utc};
use rand::Rng;
use rand_distr::Alphanumeric;
use std::collections::HashMap;
use std::sync::Mutex;

pub const RESET_TOKEN_LENGTH: usize = 64;

/// What a consumed token proves: which admin asked for the reset.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ResetTokenPayload {
    pub admin_id: String,
    pub email: String,
}

pub trait ResetTokenStore: Send + Sync {
    /// Mint a token for the given admin. Issuing again for the same admin
    /// leaves earlier tokens valid until they expire or get used.
    fn issue(&self, admin_id: &str, email: &str) -> String;

    /// Redeem a token. Returns None for unknown, expired or already-used
    /// tokens; a successful consume removes the token.
    fn consume(&self, token: &str) -> Option<ResetTokenPayload>;
}

struct StoredToken {
    admin_id: String,
    email: String,
    expires_at: DateTime<Utc>,
}

pub struct InMemoryResetTokenStore {
    ttl: Duration,
    tokens: Mutex<HashMap<String, StoredToken>>,
}

impl InMemoryResetTokenStore {
    pub fn new(ttl_secs: i64) -> Self {
        InMemoryResetTokenStore {
            ttl: Duration::seconds(ttl_secs),
            tokens: Mutex::new(HashMap::new()),
        }
    }

    fn generate_token() -> String {
        rand::rng()
            .sample_iter(&Alphanumeric)
            .take(RESET_TOKEN_LENGTH)
            .map(char::from)
            .collect()
    }
}

impl ResetTokenStore for InMemoryResetTokenStore {
    fn issue(&self, admin_id: &str, email: &str) -> String {
        let token = Self::generate_token();
        let mut tokens = self.tokens.lock().unwrap();
        let now = Utc::now();
        tokens.retain(|_, stored| stored.expires_at > now);
        tokens.insert(
            token.clone(),
            StoredToken {
                admin_id: admin_id.to_string(),
                email: email.to_string(),
                expires_at: now + self.ttl,
            },
        );
        token
    }

    fn consume(&self, token: &str) -> Option<ResetTokenPayload> {
        let mut tokens = self.tokens.lock().unwrap();
        let stored = tokens.remove(token)?;
        if stored.expires_at <= Utc::now() {
            return None;
        }
        Some(ResetTokenPayload {
            admin_id: stored.admin_id,
            email: stored.email,
        })
    }
}
