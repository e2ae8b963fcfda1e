//! Admin account operations: login, password recovery, account creation.

use std::sync::Arc;

use tracing::{info, warn};
use uuid::Uuid;

use super::admin_store::AdminStore;
use super::auth::{SessionClaims, SessionSigner, SingjamHasher};
use super::models::{Admin, AdminSession, NewAdmin};
use super::reset_tokens::ResetTokenStore;
use crate::errors::ServiceError;

pub const MIN_PASSWORD_LENGTH: usize = 6;

pub struct AdminManager {
    store: Arc<dyn AdminStore>,
    reset_tokens: Arc<dyn ResetTokenStore>,
    hasher: SingjamHasher,
    signer: SessionSigner,
}

impl AdminManager {
    pub fn new(
        store: Arc<dyn AdminStore>,
        reset_tokens: Arc<dyn ResetTokenStore>,
        signer: SessionSigner,
    ) -> Self {
        AdminManager {
            store,
            reset_tokens,
            hasher: SingjamHasher::from_build(),
            signer,
        }
    }

    /// Verify credentials and mint a session token.
    ///
    /// Unknown email and wrong password fail identically, so callers
    /// cannot probe which emails have accounts.
    pub fn login(&self, email: &str, password: &str) -> Result<AdminSession, ServiceError> {
        let admin = self
            .store
            .get_by_email(email)?
            .ok_or(ServiceError::InvalidCredentials)?;

        if !self.hasher.verify(password, &admin.password_hash)? {
            return Err(ServiceError::InvalidCredentials);
        }

        let token = self.signer.sign(&admin)?;
        Ok(AdminSession {
            token,
            expires_in: self.signer.expiry_secs(),
        })
    }

    /// Start a password reset. Always succeeds from the caller's point of
    /// view; whether the email belongs to an account is never revealed.
    pub fn forgot_password(&self, email: &str) -> Result<(), ServiceError> {
        match self.store.get_by_email(email)? {
            Some(admin) => {
                let token = self.reset_tokens.issue(&admin.id, &admin.email);
                // Stand-in for a mail/notification integration.
                info!("Password reset token issued for {}: {}", admin.email, token);
            }
            None => {
                warn!("Password reset requested for unknown email");
            }
        }
        Ok(())
    }

    /// Redeem a reset token and set a new password. The password is
    /// validated before the token gets consumed, so a rejected password
    /// does not burn the token.
    pub fn reset_password(&self, token: &str, new_password: &str) -> Result<(), ServiceError> {
        if new_password.chars().count() < MIN_PASSWORD_LENGTH {
            return Err(ServiceError::Validation(format!(
                "Password must be at least {} characters",
                MIN_PASSWORD_LENGTH
            )));
        }

        let payload = self
            .reset_tokens
            .consume(token)
            .ok_or(ServiceError::InvalidOrExpiredToken)?;

        let hash = self.hasher.hash_password(new_password)?;
        if !self.store.update_password_hash(&payload.admin_id, &hash)? {
            return Err(ServiceError::NotFound);
        }
        info!("Password reset completed for admin {}", payload.admin_id);
        Ok(())
    }

    /// Create a new admin account. Returns the generated id.
    pub fn create_admin(&self, new_admin: &NewAdmin) -> Result<String, ServiceError> {
        if new_admin.name.trim().is_empty() {
            return Err(ServiceError::Validation("Name must not be empty".into()));
        }
        if new_admin.email.trim().is_empty() || !new_admin.email.contains('@') {
            return Err(ServiceError::Validation("Invalid email address".into()));
        }
        if new_admin.password.chars().count() < MIN_PASSWORD_LENGTH {
            return Err(ServiceError::Validation(format!(
                "Password must be at least {} characters",
                MIN_PASSWORD_LENGTH
            )));
        }
        if self.store.email_exists(&new_admin.email)? {
            return Err(ServiceError::Validation(
                "Email already registered".into(),
            ));
        }

        let admin = Admin {
            id: Uuid::new_v4().to_string(),
            name: new_admin.name.clone(),
            email: new_admin.email.clone(),
            password_hash: self.hasher.hash_password(&new_admin.password)?,
            address: new_admin.address.clone(),
        };
        self.store.insert_admin(&admin)?;
        info!("Created admin {} ({})", admin.id, admin.email);
        Ok(admin.id)
    }

    /// Validate a session token from a request.
    pub fn verify_session(&self, token: &str) -> Result<SessionClaims, ServiceError> {
        self.signer
            .verify(token)
            .map_err(|_| ServiceError::Unauthorized)
    }
}
