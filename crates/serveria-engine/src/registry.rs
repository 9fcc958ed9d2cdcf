//! Registry of independent configuration sessions keyed by id.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use serde::Serialize;
use serveria_catalog::Catalog;
use serveria_core::RulePolicy;
use tracing::info;

use crate::session::ConfigSession;

struct SessionEntry {
    session: ConfigSession,
    created_at: DateTime<Utc>,
    last_used: DateTime<Utc>,
}

/// Listing row for a live session.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionInfo {
    pub id: String,
    pub chassis: Option<String>,
    pub components: usize,
    pub created_at: String,
    pub last_used: String,
}

/// Owns every live session; each one is only ever touched by its own caller.
pub struct SessionRegistry {
    catalog: Arc<Catalog>,
    policy: RulePolicy,
    sessions: RwLock<HashMap<String, SessionEntry>>,
    max_sessions: usize,
}

impl SessionRegistry {
    pub fn new(catalog: Arc<Catalog>, policy: RulePolicy, max_sessions: usize) -> Self {
        Self {
            catalog,
            policy,
            sessions: RwLock::new(HashMap::new()),
            max_sessions: max_sessions.max(1),
        }
    }

    /// Start an empty session and return its id.
    pub fn create(&self) -> String {
        let id = uuid::Uuid::new_v4().to_string();
        let now = Utc::now();
        let entry = SessionEntry {
            session: ConfigSession::new(Arc::clone(&self.catalog), self.policy),
            created_at: now,
            last_used: now,
        };

        // Enforce max sessions (LRU eviction)
        let mut sessions = self.sessions.write();
        if sessions.len() >= self.max_sessions {
            if let Some(oldest_id) = sessions
                .iter()
                .min_by_key(|(_, e)| e.last_used)
                .map(|(id, _)| id.clone())
            {
                sessions.remove(&oldest_id);
                info!("Evicted idle configuration session {}", oldest_id);
            }
        }

        sessions.insert(id.clone(), entry);
        info!("Configuration session created: {}", id);
        id
    }

    /// Read a session. Reads count as use for eviction.
    pub fn with_session<R>(&self, id: &str, f: impl FnOnce(&ConfigSession) -> R) -> Option<R> {
        let mut sessions = self.sessions.write();
        let entry = sessions.get_mut(id)?;
        entry.last_used = Utc::now();
        Some(f(&entry.session))
    }

    /// Mutate a session and mark it as recently used.
    pub fn with_session_mut<R>(
        &self,
        id: &str,
        f: impl FnOnce(&mut ConfigSession) -> R,
    ) -> Option<R> {
        let mut sessions = self.sessions.write();
        let entry = sessions.get_mut(id)?;
        entry.last_used = Utc::now();
        Some(f(&mut entry.session))
    }

    /// End (delete) a session.
    pub fn remove(&self, id: &str) -> bool {
        self.sessions.write().remove(id).is_some()
    }

    pub fn list(&self) -> Vec<SessionInfo> {
        let sessions = self.sessions.read();
        let mut rows: Vec<SessionInfo> = sessions
            .iter()
            .map(|(id, e)| SessionInfo {
                id: id.clone(),
                chassis: e.session.chassis().map(|c| c.name.clone()),
                components: e.session.selection().len(),
                created_at: e.created_at.to_rfc3339(),
                last_used: e.last_used.to_rfc3339(),
            })
            .collect();
        rows.sort_by(|a, b| a.created_at.cmp(&b.created_at));
        rows
    }

    pub fn count(&self) -> usize {
        self.sessions.read().len()
    }
}
