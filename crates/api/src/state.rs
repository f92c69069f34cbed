use std::sync::Arc;

use catalog_db::CatalogStore;

use crate::config::ServerConfig;
use crate::wizard::WizardRegistry;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc` or is already `Clone`).
#[derive(Clone)]
pub struct AppState {
    /// Catalog storage backend (PostgreSQL pool or in-memory store).
    pub store: CatalogStore,
    /// Server configuration.
    pub config: Arc<ServerConfig>,
    /// Live product wizard sessions.
    pub wizard: Arc<WizardRegistry>,
}

impl AppState {
    pub fn new(store: CatalogStore, config: ServerConfig) -> Self {
        let ttl = std::time::Duration::from_secs(config.wizard_session_ttl_secs);
        Self {
            store,
            config: Arc::new(config),
            wizard: Arc::new(WizardRegistry::new(ttl)),
        }
    }
}
