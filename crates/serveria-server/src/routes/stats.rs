//! Stats and server info routes.

use std::sync::Arc;

use axum::extract::State;
use axum::routing::get;
use axum::{Json, Router};

use crate::state::AppState;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new().route("/stats", get(get_stats))
}

/// GET /api/stats — catalog size, live sessions, rule policy.
async fn get_stats(State(state): State<Arc<AppState>>) -> Json<serde_json::Value> {
    let uptime = (chrono::Utc::now() - state.started_at).num_seconds();

    Json(serde_json::json!({
        "catalog": state.catalog.summary(),
        "sessions": state.sessions.count(),
        "maxSessions": state.config.max_sessions,
        "policy": state.config.policy,
        "port": state.config.port,
        "uptimeSeconds": uptime,
        "platform": std::env::consts::OS,
        "arch": std::env::consts::ARCH,
    }))
}
