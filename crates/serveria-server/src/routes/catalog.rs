//! Read-only catalog routes.

use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Json, Router};
use serveria_catalog::Category;

use crate::state::AppState;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/catalog", get(get_catalog))
        .route("/catalog/chassis/{name}", get(get_chassis))
        .route("/catalog/chassis/{name}/compatible", get(get_compatible))
        .route("/catalog/components/{name}", get(get_component))
}

/// GET /api/catalog — every chassis and component, plus the active rules.
async fn get_catalog(State(state): State<Arc<AppState>>) -> Json<serde_json::Value> {
    let catalog = &state.catalog;
    Json(serde_json::json!({
        "chassis": catalog.chassis(),
        "components": catalog.components(),
        "vendors": {
            "HPE": catalog.chassis_by_vendor("HPE").len(),
            "Dell": catalog.chassis_by_vendor("Dell").len(),
        },
        "policy": state.config.policy,
    }))
}

/// GET /api/catalog/chassis/:name
async fn get_chassis(
    State(state): State<Arc<AppState>>,
    Path(name): Path<String>,
) -> impl IntoResponse {
    match state.catalog.chassis_spec(&name) {
        Some(spec) => (StatusCode::OK, Json(serde_json::json!(spec))),
        None => (
            StatusCode::NOT_FOUND,
            Json(serde_json::json!({ "error": "Server model not found" })),
        ),
    }
}

/// GET /api/catalog/chassis/:name/compatible — component lists keyed by category.
async fn get_compatible(
    State(state): State<Arc<AppState>>,
    Path(name): Path<String>,
) -> impl IntoResponse {
    if state.catalog.chassis_spec(&name).is_none() {
        return (
            StatusCode::NOT_FOUND,
            Json(serde_json::json!({ "error": "Server model not found" })),
        );
    }
    let lists: serde_json::Map<String, serde_json::Value> = Category::all()
        .iter()
        .map(|&c| {
            (
                c.as_str().to_string(),
                serde_json::json!(state.catalog.compatible(&name, c)),
            )
        })
        .collect();
    (StatusCode::OK, Json(serde_json::Value::Object(lists)))
}

/// GET /api/catalog/components/:name
async fn get_component(
    State(state): State<Arc<AppState>>,
    Path(name): Path<String>,
) -> impl IntoResponse {
    match state.catalog.component_spec(&name) {
        Some(spec) => (StatusCode::OK, Json(serde_json::json!(spec))),
        None => (
            StatusCode::NOT_FOUND,
            Json(serde_json::json!({ "error": "Component not found" })),
        ),
    }
}
