//! Configuration session routes — chassis choice, add/remove, checks, export.

use std::sync::Arc;

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{delete, get, post};
use axum::{Json, Router};
use serveria_catalog::Category;
use serveria_core::Error;
use serveria_engine::{ConfigSession, SpecSheet};
use tracing::warn;

use crate::state::AppState;

// ---------------------------------------------------------------
// Route builder
// ---------------------------------------------------------------

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/sessions", post(create_session).get(list_sessions))
        .route("/sessions/{id}", get(get_session).delete(end_session))
        .route("/sessions/{id}/chassis", post(select_chassis))
        .route("/sessions/{id}/components", post(add_component))
        .route(
            "/sessions/{id}/components/{category}/{index}",
            delete(remove_component),
        )
        .route("/sessions/{id}/drop", post(drop_component))
        .route("/sessions/{id}/reset", post(reset_session))
        .route("/sessions/{id}/readiness", get(get_readiness))
        .route("/sessions/{id}/save", post(save_session))
        .route("/sessions/{id}/export", get(export_session))
}

// ---------------------------------------------------------------
// Request/Response types
// ---------------------------------------------------------------

#[derive(serde::Deserialize)]
struct SelectChassisBody {
    name: String,
}

#[derive(serde::Deserialize)]
struct AddComponentBody {
    category: String,
    name: String,
}

type ApiResponse = (StatusCode, Json<serde_json::Value>);

fn error_response(status: StatusCode, message: impl Into<String>) -> ApiResponse {
    (status, Json(serde_json::json!({ "error": message.into() })))
}

fn session_not_found() -> ApiResponse {
    error_response(StatusCode::NOT_FOUND, "Session not found")
}

fn bad_body(rejection: JsonRejection) -> ApiResponse {
    error_response(rejection.status(), rejection.body_text())
}

/// Category names are case-insensitive in bodies and paths alike.
fn parse_category(raw: &str) -> Result<Category, ApiResponse> {
    raw.parse()
        .map_err(|e: Error| error_response(StatusCode::BAD_REQUEST, e.to_string()))
}

fn view_json(session: &ConfigSession) -> serde_json::Value {
    serde_json::to_value(session.view()).unwrap_or_default()
}

// ---------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------

/// POST /api/sessions — start an empty configuration.
async fn create_session(State(state): State<Arc<AppState>>) -> ApiResponse {
    let id = state.sessions.create();
    match state.sessions.with_session(&id, view_json) {
        Some(view) => (
            StatusCode::CREATED,
            Json(serde_json::json!({ "id": id, "session": view })),
        ),
        None => error_response(StatusCode::INTERNAL_SERVER_ERROR, "Session vanished"),
    }
}

async fn list_sessions(State(state): State<Arc<AppState>>) -> Json<serde_json::Value> {
    let sessions = state.sessions.list();
    Json(serde_json::json!({
        "sessions": sessions,
        "count": sessions.len(),
    }))
}

async fn get_session(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> ApiResponse {
    match state.sessions.with_session(&id, view_json) {
        Some(view) => (StatusCode::OK, Json(view)),
        None => session_not_found(),
    }
}

async fn end_session(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> ApiResponse {
    if state.sessions.remove(&id) {
        (StatusCode::OK, Json(serde_json::json!({ "success": true })))
    } else {
        session_not_found()
    }
}

/// POST /api/sessions/:id/chassis — choose a server model, clearing the selection.
async fn select_chassis(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    body: Result<Json<SelectChassisBody>, JsonRejection>,
) -> ApiResponse {
    let Json(body) = match body {
        Ok(body) => body,
        Err(rejection) => return bad_body(rejection),
    };
    let result = state.sessions.with_session_mut(&id, |s| {
        let chosen = s.select_chassis(&body.name).map(|spec| spec.name.clone());
        chosen.map(|_| view_json(s))
    });
    match result {
        Some(Ok(view)) => (StatusCode::OK, Json(view)),
        Some(Err(e)) => error_response(StatusCode::NOT_FOUND, e.to_string()),
        None => session_not_found(),
    }
}

/// POST /api/sessions/:id/components — add one component if a slot is free.
async fn add_component(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    body: Result<Json<AddComponentBody>, JsonRejection>,
) -> ApiResponse {
    let Json(body) = match body {
        Ok(body) => body,
        Err(rejection) => return bad_body(rejection),
    };
    let category = match parse_category(&body.category) {
        Ok(c) => c,
        Err(response) => return response,
    };
    let result = state.sessions.with_session_mut(&id, |s| {
        let added = s.add(category, &body.name);
        (added, view_json(s))
    });
    match result {
        Some((added, view)) => (
            StatusCode::OK,
            Json(serde_json::json!({ "added": added, "session": view })),
        ),
        None => session_not_found(),
    }
}

/// POST /api/sessions/:id/drop — raw drag data, as produced on drag start.
async fn drop_component(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    body: String,
) -> ApiResponse {
    let result = state.sessions.with_session_mut(&id, |s| {
        let added = s.handle_drop(&body);
        (added, view_json(s))
    });
    match result {
        Some((added, view)) => (
            StatusCode::OK,
            Json(serde_json::json!({ "added": added, "session": view })),
        ),
        None => session_not_found(),
    }
}

/// DELETE /api/sessions/:id/components/:category/:index
async fn remove_component(
    State(state): State<Arc<AppState>>,
    Path((id, category, index)): Path<(String, String, usize)>,
) -> ApiResponse {
    let category = match parse_category(&category) {
        Ok(c) => c,
        Err(response) => return response,
    };
    let result = state.sessions.with_session_mut(&id, |s| {
        let removed = s.remove(category, index);
        (removed, view_json(s))
    });
    match result {
        Some((removed, view)) => (
            StatusCode::OK,
            Json(serde_json::json!({ "removed": removed, "session": view })),
        ),
        None => session_not_found(),
    }
}

async fn reset_session(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> ApiResponse {
    let result = state.sessions.with_session_mut(&id, |s| {
        s.reset();
        view_json(s)
    });
    match result {
        Some(view) => (StatusCode::OK, Json(view)),
        None => session_not_found(),
    }
}

async fn get_readiness(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> ApiResponse {
    let result = state.sessions.with_session(&id, |s| s.readiness());
    match result {
        Some(issues) => {
            let messages: Vec<String> = issues.iter().map(|i| i.to_string()).collect();
            (
                StatusCode::OK,
                Json(serde_json::json!({
                    "ready": issues.is_empty(),
                    "issues": issues,
                    "messages": messages,
                })),
            )
        }
        None => session_not_found(),
    }
}

/// POST /api/sessions/:id/save — accept a complete configuration (not persisted).
async fn save_session(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> ApiResponse {
    let timestamp = chrono::Utc::now().to_rfc3339();
    let result = state.sessions.with_session(&id, |s| s.snapshot(&timestamp));
    match result {
        Some(Ok(saved)) => (StatusCode::OK, Json(serde_json::json!(saved))),
        Some(Err(e)) => error_response(StatusCode::UNPROCESSABLE_ENTITY, e.to_string()),
        None => session_not_found(),
    }
}

/// GET /api/sessions/:id/export — plain-text spec sheet.
async fn export_session(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Response {
    let generated_at = chrono::Local::now().format("%Y-%m-%d %H:%M:%S").to_string();
    let result = state
        .sessions
        .with_session(&id, |s| SpecSheet::render(s, &generated_at));
    match result {
        Some(Ok(text)) => (
            StatusCode::OK,
            [(header::CONTENT_TYPE, "text/plain; charset=utf-8")],
            text,
        )
            .into_response(),
        Some(Err(e @ (Error::NoChassisSelected | Error::EmptyConfiguration))) => {
            error_response(StatusCode::BAD_REQUEST, e.to_string()).into_response()
        }
        Some(Err(e)) => {
            warn!("Spec sheet export failed: {}", e);
            error_response(StatusCode::INTERNAL_SERVER_ERROR, e.to_string()).into_response()
        }
        None => session_not_found().into_response(),
    }
}
