//! Bootstrap tool for creating admin accounts directly in the admin
//! database. Admin creation over HTTP requires an authenticated admin, so
//! the first account has to come from here.

use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use catalog_server::admin::{AdminManager, InMemoryResetTokenStore, NewAdmin, SessionSigner, SqliteAdminStore};

#[derive(Parser, Debug)]
struct CliArgs {
    /// Directory holding the SQLite database files.
    #[clap(long)]
    pub db_dir: PathBuf,

    /// Display name of the new admin.
    #[clap(long)]
    pub name: String,

    /// Email of the new admin (used to log in).
    #[clap(long)]
    pub email: String,

    /// Plaintext password; hashed before storage.
    #[clap(long)]
    pub password: String,

    /// Optional postal address.
    #[clap(long)]
    pub address: Option<String>,
}

fn main() -> Result<()> {
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

    let store = Arc::new(SqliteAdminStore::new(cli_args.db_dir.join("admin.db"))?);

    // The manager is only used for validation and hashing here; the
    // session/reset plumbing is inert.
    let manager = AdminManager::new(
        store,
        Arc::new(InMemoryResetTokenStore::new(1)),
        SessionSigner::new("unused", 1),
    );

    let id = manager
        .create_admin(&NewAdmin {
            name: cli_args.name,
            email: cli_args.email.clone(),
            password: cli_args.password,
            address: cli_args.address,
        })
        .map_err(|err| anyhow::anyhow!("{}", err))?;

    println!("Created admin {} ({})", id, cli_args.email);
    Ok(())
}
