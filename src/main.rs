use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{info, level_filters::LevelFilter};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use catalog_server::admin::{AdminManager, InMemoryResetTokenStore, SessionSigner, SqliteAdminStore};
use catalog_server::catalog_store::SqliteCatalogStore;
use catalog_server::config::{AppConfig, CliConfig, FileConfig};
use catalog_server::history::{EventRecorder, SqliteHistoryStore};
use catalog_server::server::{run_server, RequestsLoggingLevel, ServerConfig};

#[derive(Parser, Debug)]
struct CliArgs {
    /// Directory holding the SQLite database files.
    #[clap(long)]
    pub db_dir: Option<PathBuf>,

    /// Path to an optional TOML config file. File values override CLI.
    #[clap(long)]
    pub config: Option<PathBuf>,

    /// The port to listen on.
    #[clap(short, long, default_value_t = 3001)]
    pub port: u16,

    /// The level of logging to perform on each request.
    #[clap(long, default_value = "path")]
    pub logging_level: RequestsLoggingLevel,

    /// Disable per-IP rate limiting on public routes.
    #[clap(long)]
    pub disable_rate_limit: bool,

    /// Secret used to sign session tokens.
    #[clap(long)]
    pub session_secret: Option<String>,

    /// Session token lifetime in seconds.
    #[clap(long)]
    pub session_expiry_secs: Option<i64>,

    /// Password-reset token lifetime in seconds.
    #[clap(long)]
    pub reset_token_ttl_secs: Option<i64>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli_args = CliArgs::parse();

    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(
            EnvFilter::builder()
                .with_default_directive(LevelFilter::INFO.into())
                .with_env_var("LOG_LEVEL")
                .from_env_lossy(),
        )
        .try_init()
        .unwrap();

    let file_config = cli_args
        .config
        .as_deref()
        .map(FileConfig::load)
        .transpose()?;

    let cli_config = CliConfig {
        db_dir: cli_args.db_dir,
        port: cli_args.port,
        logging_level: cli_args.logging_level,
        disable_rate_limit: cli_args.disable_rate_limit,
        session_secret: cli_args.session_secret,
        session_expiry_secs: cli_args.session_expiry_secs,
        reset_token_ttl_secs: cli_args.reset_token_ttl_secs,
    };
    let config = AppConfig::resolve(&cli_config, file_config)?;

    info!("Opening databases in {:?}...", config.db_dir);
    let catalog_store = Arc::new(SqliteCatalogStore::new(
        config.catalog_db_path(),
        config.read_pool_size,
    )?);
    let admin_store = Arc::new(SqliteAdminStore::new(config.admin_db_path())?);
    let history_store = Arc::new(SqliteHistoryStore::new(config.history_db_path())?);

    let reset_tokens = Arc::new(InMemoryResetTokenStore::new(config.reset_token_ttl_secs));
    let signer = SessionSigner::new(config.session_secret.clone(), config.session_expiry_secs);
    let admin_manager = Arc::new(AdminManager::new(admin_store, reset_tokens, signer));
    let event_recorder = Arc::new(EventRecorder::new(history_store, catalog_store.clone()));

    let server_config = ServerConfig {
        port: config.port,
        requests_logging_level: config.logging_level.clone(),
        disable_rate_limit: config.disable_rate_limit,
    };

    info!("Ready to serve at port {}!", config.port);
    run_server(server_config, catalog_store, admin_manager, event_recorder).await
}
