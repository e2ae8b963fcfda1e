//! Password hashing and session token signing for admins.

use anyhow::{anyhow, bail, Result};
use chrono::Utc;
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

use super::models::Admin;

mod singjam_argon2 {
    use anyhow::{anyhow, Result};
    use argon2::{
        password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
        Argon2,
    };

    pub fn generate_b64_salt() -> String {
        SaltString::generate(&mut OsRng).to_string()
    }

    pub fn hash<T: AsRef<str>>(plain: &[u8], b64_salt: T) -> Result<String> {
        let argon2 = Argon2::default();
        let salt = SaltString::from_b64(b64_salt.as_ref()).map_err(|err| anyhow!("{}", err))?;
        let hash_string = argon2
            .hash_password(plain, &salt)
            .map_err(|err| anyhow!("{}", err))?
            .to_string();
        Ok(hash_string)
    }

    pub fn verify<T: AsRef<str>>(plain_pw: &[u8], target_hash: T) -> Result<bool> {
        let argon2 = Argon2::default();
        let password_hash =
            PasswordHash::new(target_hash.as_ref()).map_err(|err| anyhow!("{}", err))?;
        Ok(argon2.verify_password(plain_pw, &password_hash).is_ok())
    }
}

#[derive(Clone, Serialize, Deserialize, Debug)]
pub enum SingjamHasher {
    Argon2,
    /// Fast test-only hasher - DO NOT use in production!
    /// Simply stores password with a marker prefix for verification.
    #[cfg(feature = "test-fast-hasher")]
    TestFast,
}

impl SingjamHasher {
    /// The hasher the binary was built with. Plain argon2 unless the
    /// test-fast feature is on.
    pub fn from_build() -> Self {
        #[cfg(feature = "test-fast-hasher")]
        {
            SingjamHasher::TestFast
        }
        #[cfg(not(feature = "test-fast-hasher"))]
        {
            SingjamHasher::Argon2
        }
    }

    /// Hash a plaintext password with a fresh salt. The salt travels
    /// inside the returned PHC string.
    pub fn hash_password(&self, plain: &str) -> Result<String> {
        match self {
            SingjamHasher::Argon2 => {
                let salt = singjam_argon2::generate_b64_salt();
                singjam_argon2::hash(plain.as_bytes(), salt)
            }
            #[cfg(feature = "test-fast-hasher")]
            SingjamHasher::TestFast => {
                let hex: String = plain.bytes().map(|b| format!("{:02x}", b)).collect();
                Ok(format!("$testfast$test_salt${}", hex))
            }
        }
    }

    pub fn verify(&self, plain: &str, target_hash: &str) -> Result<bool> {
        match self {
            SingjamHasher::Argon2 => singjam_argon2::verify(plain.as_bytes(), target_hash),
            #[cfg(feature = "test-fast-hasher")]
            SingjamHasher::TestFast => {
                if let Some(hex) = target_hash
                    .strip_prefix("$testfast$")
                    .and_then(|s| s.split('$').nth(1))
                {
                    let decoded: Vec<u8> = (0..hex.len())
                        .step_by(2)
                        .filter_map(|i| u8::from_str_radix(&hex[i..i + 2], 16).ok())
                        .collect();
                    Ok(decoded == plain.as_bytes())
                } else {
                    Ok(false)
                }
            }
        }
    }
}

impl FromStr for SingjamHasher {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "argon2" => Ok(SingjamHasher::Argon2),
            #[cfg(feature = "test-fast-hasher")]
            "test_fast" => Ok(SingjamHasher::TestFast),
            _ => bail!("Unknown hasher {}", s),
        }
    }
}

impl std::fmt::Display for SingjamHasher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SingjamHasher::Argon2 => write!(f, "argon2"),
            #[cfg(feature = "test-fast-hasher")]
            SingjamHasher::TestFast => write!(f, "test_fast"),
        }
    }
}

/// Claims carried in a session JWT.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionClaims {
    /// Admin id.
    pub sub: String,
    pub email: String,
    pub name: String,
    pub iat: i64,
    pub exp: i64,
}

/// Signs and verifies HS256 session tokens.
#[derive(Clone)]
pub struct SessionSigner {
    secret: String,
    expiry_secs: i64,
}

impl SessionSigner {
    pub fn new(secret: impl Into<String>, expiry_secs: i64) -> Self {
        SessionSigner {
            secret: secret.into(),
            expiry_secs,
        }
    }

    pub fn expiry_secs(&self) -> i64 {
        self.expiry_secs
    }

    pub fn sign(&self, admin: &Admin) -> Result<String> {
        let now = Utc::now().timestamp();
        let claims = SessionClaims {
            sub: admin.id.clone(),
            email: admin.email.clone(),
            name: admin.name.clone(),
            iat: now,
            exp: now + self.expiry_secs,
        };
        encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(self.secret.as_bytes()),
        )
        .map_err(|err| anyhow!("Failed to sign session token: {}", err))
    }

    /// Decode and verify a token, including its expiry. Any failure comes
    /// back as an error without distinguishing tampering from expiry.
    pub fn verify(&self, token: &str) -> Result<SessionClaims> {
        let mut validation = Validation::default();
        validation.leeway = 0;
        let data = decode::<SessionClaims>(
            token,
            &DecodingKey::from_secret(self.secret.as_bytes()),
            &validation,
        )
        .map_err(|err| anyhow!("Session token rejected: {}", err))?;
        Ok(data.claims)
    }
}
