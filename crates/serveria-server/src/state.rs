//! Shared application state.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serveria_catalog::Catalog;
use serveria_core::ServeriaConfig;
use serveria_engine::SessionRegistry;

/// Shared application state accessible from all route handlers.
pub struct AppState {
    pub config: ServeriaConfig,
    pub catalog: Arc<Catalog>,
    pub sessions: SessionRegistry,
    pub started_at: DateTime<Utc>,
}

impl AppState {
    pub fn new(config: ServeriaConfig, catalog: Catalog) -> Self {
        let catalog = Arc::new(catalog);
        let sessions = SessionRegistry::new(Arc::clone(&catalog), config.policy, config.max_sessions);

        Self {
            config,
            catalog,
            sessions,
            started_at: Utc::now(),
        }
    }
}
