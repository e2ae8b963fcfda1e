use axum::extract::FromRef;

use crate::admin::AdminManager;
use crate::catalog_store::CatalogStore;
use crate::history::EventRecorder;
use std::sync::Arc;
use std::time::Instant;

use super::ServerConfig;

pub type GuardedCatalogStore = Arc<dyn CatalogStore>;
pub type GuardedAdminManager = Arc<AdminManager>;
pub type GuardedEventRecorder = Arc<EventRecorder>;

#[derive(Clone)]
pub struct ServerState {
    pub config: ServerConfig,
    pub start_time: Instant,
    pub catalog_store: GuardedCatalogStore,
    pub admin_manager: GuardedAdminManager,
    pub event_recorder: GuardedEventRecorder,
    pub hash: String,
}

impl ServerState {
    pub fn new(
        config: ServerConfig,
        catalog_store: GuardedCatalogStore,
        admin_manager: GuardedAdminManager,
        event_recorder: GuardedEventRecorder,
    ) -> ServerState {
        ServerState {
            config,
            start_time: Instant::now(),
            catalog_store,
            admin_manager,
            event_recorder,
            hash: env!("GIT_HASH").to_owned(),
        }
    }
}

impl FromRef<ServerState> for GuardedCatalogStore {
    fn from_ref(input: &ServerState) -> Self {
        input.catalog_store.clone()
    }
}

impl FromRef<ServerState> for GuardedAdminManager {
    fn from_ref(input: &ServerState) -> Self {
        input.admin_manager.clone()
    }
}

impl FromRef<ServerState> for GuardedEventRecorder {
    fn from_ref(input: &ServerState) -> Self {
        input.event_recorder.clone()
    }
}

impl FromRef<ServerState> for ServerConfig {
    fn from_ref(input: &ServerState) -> Self {
        input.config.clone()
    }
}
