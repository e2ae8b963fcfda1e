mod file_config;

pub use file_config::FileConfig;

use crate::server::RequestsLoggingLevel;
use anyhow::{anyhow, bail, Result};
use clap::ValueEnum;
use std::path::PathBuf;
use tracing::warn;

pub const DEFAULT_SESSION_EXPIRY_SECS: i64 = 1800;
pub const DEFAULT_RESET_TOKEN_TTL_SECS: i64 = 3600;
pub const DEFAULT_READ_POOL_SIZE: usize = 4;

const DEV_SESSION_SECRET: &str = "dev-secret-change-me";

/// CLI arguments that can be used for config resolution.
/// This struct mirrors the CLI arguments that can be overridden by TOML config.
#[derive(Debug, Clone, Default)]
pub struct CliConfig {
    pub db_dir: Option<PathBuf>,
    pub port: u16,
    pub logging_level: RequestsLoggingLevel,
    pub disable_rate_limit: bool,
    pub session_secret: Option<String>,
    pub session_expiry_secs: Option<i64>,
    pub reset_token_ttl_secs: Option<i64>,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub db_dir: PathBuf,
    pub port: u16,
    pub logging_level: RequestsLoggingLevel,
    pub disable_rate_limit: bool,
    pub read_pool_size: usize,

    pub session_secret: String,
    pub session_expiry_secs: i64,
    pub reset_token_ttl_secs: i64,
}

impl AppConfig {
    /// Resolve configuration from CLI arguments and optional TOML file config.
    /// TOML values override CLI values where present.
    pub fn resolve(cli: &CliConfig, file_config: Option<FileConfig>) -> Result<Self> {
        let file = file_config.unwrap_or_default();

        // TOML overrides CLI for each field
        let db_dir = file
            .db_dir
            .map(PathBuf::from)
            .or_else(|| cli.db_dir.clone())
            .ok_or_else(|| {
                anyhow!("db_dir must be specified via --db-dir or in config file")
            })?;

        if !db_dir.exists() {
            bail!("Database directory does not exist: {:?}", db_dir);
        }
        if !db_dir.is_dir() {
            bail!("db_dir is not a directory: {:?}", db_dir);
        }

        let port = file.port.unwrap_or(cli.port);

        let logging_level = file
            .logging_level
            .and_then(|s| parse_logging_level(&s))
            .unwrap_or_else(|| cli.logging_level.clone());

        let disable_rate_limit = file.disable_rate_limit.unwrap_or(cli.disable_rate_limit);
        let read_pool_size = file.read_pool_size.unwrap_or(DEFAULT_READ_POOL_SIZE).max(1);

        let session_secret = file
            .session_secret
            .or_else(|| cli.session_secret.clone())
            .unwrap_or_else(|| {
                warn!("No session secret configured, using the development default");
                DEV_SESSION_SECRET.to_string()
            });

        let session_expiry_secs = file
            .session_expiry_secs
            .or(cli.session_expiry_secs)
            .unwrap_or(DEFAULT_SESSION_EXPIRY_SECS);
        if session_expiry_secs <= 0 {
            bail!("session_expiry_secs must be positive");
        }

        let reset_token_ttl_secs = file
            .reset_token_ttl_secs
            .or(cli.reset_token_ttl_secs)
            .unwrap_or(DEFAULT_RESET_TOKEN_TTL_SECS);
        if reset_token_ttl_secs <= 0 {
            bail!("reset_token_ttl_secs must be positive");
        }

        Ok(Self {
            db_dir,
            port,
            logging_level,
            disable_rate_limit,
            read_pool_size,
            session_secret,
            session_expiry_secs,
            reset_token_ttl_secs,
        })
    }

    pub fn catalog_db_path(&self) -> PathBuf {
        self.db_dir.join("catalog.db")
    }

    pub fn admin_db_path(&self) -> PathBuf {
        self.db_dir.join("admin.db")
    }

    pub fn history_db_path(&self) -> PathBuf {
        self.db_dir.join("history.db")
    }
}

/// Parses a logging level string into RequestsLoggingLevel.
/// Uses clap's ValueEnum trait for parsing.
fn parse_logging_level(s: &str) -> Option<RequestsLoggingLevel> {
    RequestsLoggingLevel::from_str(s, true).ok()
}
