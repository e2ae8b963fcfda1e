//! Test server lifecycle management
//!
//! This module manages spawning and shutting down test HTTP servers.
//! Each test gets an isolated server with its own database directory.

use super::constants::*;
use super::fixtures::seed_catalog;
use catalog_server::admin::{
    AdminManager, InMemoryResetTokenStore, NewAdmin, SessionSigner, SqliteAdminStore,
};
use catalog_server::catalog_store::{CatalogStore, SqliteCatalogStore};
use catalog_server::history::{EventRecorder, SqliteHistoryStore};
use catalog_server::server::{make_app, RequestsLoggingLevel, ServerConfig};
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tempfile::TempDir;
use tokio::net::TcpListener;

/// Test server instance with an isolated catalog, admin and history database
///
/// When dropped, the server gracefully shuts down and temp resources are
/// cleaned up.
pub struct TestServer {
    /// Base URL for making requests (e.g., "http://127.0.0.1:12345")
    pub base_url: String,

    /// The port the server is listening on
    pub port: u16,

    /// Ids of the seeded songs, in seed order (song 1, song 2, song 3)
    pub song_ids: Vec<String>,

    /// Id of the seeded admin account
    pub admin_id: String,

    /// Catalog store for direct seeding in tests
    pub catalog_store: Arc<dyn CatalogStore>,

    /// Reset token store, so tests can mint tokens without scraping logs
    pub reset_tokens: Arc<InMemoryResetTokenStore>,

    // Private fields - keep resources alive until drop
    _temp_db_dir: TempDir,
    _shutdown_tx: Option<tokio::sync::oneshot::Sender<()>>,
}

impl TestServer {
    /// Spawns a new test server on a random port
    ///
    /// This function:
    /// 1. Creates a temporary database directory
    /// 2. Seeds the catalog and one admin account
    /// 3. Binds to a random port (127.0.0.1:0)
    /// 4. Spawns the server in a background task
    /// 5. Waits for the server to be ready
    ///
    /// # Panics
    ///
    /// Panics if:
    /// - Database creation or seeding fails
    /// - Port binding fails
    /// - Server fails to start
    /// - Server doesn't become ready within timeout
    pub async fn spawn() -> Self {
        Self::spawn_with_reset_ttl(3600).await
    }

    /// Same as [`TestServer::spawn`], with a custom reset token lifetime.
    ///
    /// A non-positive TTL makes every issued token already expired, which
    /// is how the expiry paths get tested.
    pub async fn spawn_with_reset_ttl(reset_token_ttl_secs: i64) -> Self {
        let temp_db_dir = TempDir::new().expect("Failed to create temp db dir");

        let catalog_store = Arc::new(
            SqliteCatalogStore::new(temp_db_dir.path().join("catalog.db"), 2)
                .expect("Failed to open catalog store"),
        );
        let song_ids = seed_catalog(catalog_store.as_ref()).expect("Failed to seed catalog");

        let admin_store = Arc::new(
            SqliteAdminStore::new(temp_db_dir.path().join("admin.db"))
                .expect("Failed to open admin store"),
        );
        let reset_tokens = Arc::new(InMemoryResetTokenStore::new(reset_token_ttl_secs));
        let admin_manager = Arc::new(AdminManager::new(
            admin_store,
            reset_tokens.clone(),
            SessionSigner::new("e2e-test-secret", 1800),
        ));
        let admin_id = admin_manager
            .create_admin(&NewAdmin {
                name: ADMIN_NAME.to_string(),
                email: ADMIN_EMAIL.to_string(),
                password: ADMIN_PASS.to_string(),
                address: None,
            })
            .expect("Failed to seed admin account");

        let history_store = Arc::new(
            SqliteHistoryStore::new(temp_db_dir.path().join("history.db"))
                .expect("Failed to open history store"),
        );
        let event_recorder = Arc::new(EventRecorder::new(
            history_store,
            catalog_store.clone() as Arc<dyn CatalogStore>,
        ));

        // Bind to random port
        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind to random port");

        let port = listener
            .local_addr()
            .expect("Failed to get local address")
            .port();

        let base_url = format!("http://127.0.0.1:{}", port);

        // Create shutdown channel
        let (shutdown_tx, shutdown_rx) = tokio::sync::oneshot::channel::<()>();

        let config = ServerConfig {
            port,
            requests_logging_level: RequestsLoggingLevel::None,
            disable_rate_limit: true, // tests hammer endpoints from one IP
        };

        let app = make_app(
            config,
            catalog_store.clone() as Arc<dyn CatalogStore>,
            admin_manager,
            event_recorder,
        )
        .expect("Failed to build app");

        // Spawn server in background task with graceful shutdown
        tokio::spawn(async move {
            axum::serve(
                listener,
                app.into_make_service_with_connect_info::<SocketAddr>(),
            )
            .with_graceful_shutdown(async {
                shutdown_rx.await.ok();
            })
            .await
            .expect("Server failed");
        });

        let server = Self {
            base_url,
            port,
            song_ids,
            admin_id,
            catalog_store,
            reset_tokens,
            _temp_db_dir: temp_db_dir,
            _shutdown_tx: Some(shutdown_tx),
        };

        server.wait_for_ready().await;

        server
    }

    /// Waits for the server to become ready by polling the /health endpoint
    async fn wait_for_ready(&self) {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_millis(100))
            .build()
            .expect("Failed to build reqwest client");

        let start = std::time::Instant::now();
        let timeout = Duration::from_millis(SERVER_READY_TIMEOUT_MS);

        loop {
            if start.elapsed() > timeout {
                panic!(
                    "Server did not become ready within {}ms",
                    SERVER_READY_TIMEOUT_MS
                );
            }

            match client.get(format!("{}/health", self.base_url)).send().await {
                Ok(response) if response.status().is_success() => {
                    // Server is ready
                    return;
                }
                _ => {
                    // Server not ready yet, wait and retry
                    tokio::time::sleep(Duration::from_millis(SERVER_READY_POLL_INTERVAL_MS)).await;
                }
            }
        }
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        // Send shutdown signal
        if let Some(tx) = self._shutdown_tx.take() {
            let _ = tx.send(());
        }
        // TempDir will be cleaned up automatically
    }
}
