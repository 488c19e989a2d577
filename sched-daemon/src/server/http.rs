//! HTTP routes and handlers for the scheduler API.

use axum::{
    body::Bytes,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde_json::{json, Value};
use std::sync::Arc;
use std::time::Duration;
use tower_http::cors::{Any, CorsLayer};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;
use tracing::error;

use sched_core::now_iso;

use super::assets::static_fallback;
use super::state::AppState;

/// Slow or stalled clients are cut off rather than holding a task forever.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Create the main router with all routes.
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        // Health check
        .route("/api/health", get(health).options(preflight))
        // Named projects
        .route(
            "/api/projects",
            get(list_projects)
                .delete(delete_all_projects)
                .options(preflight),
        )
        .route(
            "/api/project/:name",
            get(load_project)
                .post(save_project)
                .delete(delete_project)
                .put(rename_project)
                .options(preflight),
        )
        // Legacy single-document schedule
        .route(
            "/api/schedule",
            get(load_schedule).post(save_schedule).options(preflight),
        )
        // Everything else is the front-end bundle
        .fallback(static_fallback)
        .layer(cors)
        .layer(TimeoutLayer::new(REQUEST_TIMEOUT))
        .layer(TraceLayer::new_for_http())
        .with_state(Arc::new(state))
}

// =============================================================================
// Helpers
// =============================================================================

/// Storage and parse failures become 500s at this boundary; they never
/// crash the server.
fn internal_error(err: impl std::fmt::Display) -> Response {
    error!("Request failed: {}", err);
    (StatusCode::INTERNAL_SERVER_ERROR, err.to_string()).into_response()
}

/// Parse a request body as JSON. Malformed bodies are a 500, not a 400:
/// existing clients expect the original server's behavior.
fn parse_body(body: &Bytes) -> Result<Value, Response> {
    serde_json::from_slice(body).map_err(internal_error)
}

// =============================================================================
// Handlers
// =============================================================================

async fn health() -> impl IntoResponse {
    Json(json!({"status": "ok", "time": now_iso()}))
}

/// Bare OPTIONS gets a 200 on every path; the CORS layer fills in the
/// permissive headers.
async fn preflight() -> StatusCode {
    StatusCode::OK
}

async fn list_projects(State(state): State<Arc<AppState>>) -> Response {
    match state.store.list() {
        Ok(projects) => Json(json!({"projects": projects})).into_response(),
        Err(e) => internal_error(e),
    }
}

/// A missing project is reported in-band with HTTP 200; the front-end
/// checks the `error` field, not the status code.
async fn load_project(
    State(state): State<Arc<AppState>>,
    Path(name): Path<String>,
) -> Response {
    match state.store.load(&name) {
        Ok(Some(doc)) => Json(doc).into_response(),
        Ok(None) => Json(json!({"error": "Project not found", "name": name})).into_response(),
        Err(e) => internal_error(e),
    }
}

async fn save_project(
    State(state): State<Arc<AppState>>,
    Path(name): Path<String>,
    body: Bytes,
) -> Response {
    let doc = match parse_body(&body) {
        Ok(doc) => doc,
        Err(resp) => return resp,
    };
    match state.store.save(&name, &doc) {
        Ok(receipt) => Json(json!({
            "success": true,
            "saved": receipt.saved,
            "filename": receipt.filename,
        }))
        .into_response(),
        Err(e) => internal_error(e),
    }
}

async fn delete_project(
    State(state): State<Arc<AppState>>,
    Path(name): Path<String>,
) -> Response {
    match state.store.delete(&name) {
        Ok(true) => Json(json!({"success": true, "deleted": name})).into_response(),
        Ok(false) => {
            Json(json!({"success": false, "error": "Project not found"})).into_response()
        }
        Err(e) => internal_error(e),
    }
}

async fn rename_project(
    State(state): State<Arc<AppState>>,
    Path(name): Path<String>,
    body: Bytes,
) -> Response {
    let payload = match parse_body(&body) {
        Ok(payload) => payload,
        Err(resp) => return resp,
    };
    let new_name = payload
        .get("newName")
        .and_then(Value::as_str)
        .unwrap_or("")
        .trim()
        .to_string();

    match state.store.rename(&name, &new_name) {
        Ok(Some((old_name, new_name))) => Json(json!({
            "success": true,
            "oldName": old_name,
            "newName": new_name,
        }))
        .into_response(),
        Ok(None) => {
            Json(json!({"success": false, "error": "Project not found"})).into_response()
        }
        Err(sched_core::StoreError::InvalidName(_)) => {
            Json(json!({"success": false, "error": "New name required"})).into_response()
        }
        Err(e) => internal_error(e),
    }
}

/// Wipes the named projects and the legacy document plus its backup.
async fn delete_all_projects(State(state): State<Arc<AppState>>) -> Response {
    let from_store = match state.store.delete_all() {
        Ok(count) => count,
        Err(e) => return internal_error(e),
    };
    let from_legacy = match state.legacy.clear() {
        Ok(count) => count,
        Err(e) => return internal_error(e),
    };
    Json(json!({"success": true, "deleted_count": from_store + from_legacy})).into_response()
}

async fn load_schedule(State(state): State<Arc<AppState>>) -> Response {
    match state.legacy.load() {
        Ok(doc) => Json(doc).into_response(),
        Err(e) => internal_error(e),
    }
}

async fn save_schedule(State(state): State<Arc<AppState>>, body: Bytes) -> Response {
    let doc = match parse_body(&body) {
        Ok(doc) => doc,
        Err(resp) => return resp,
    };
    match state.legacy.save(&doc) {
        Ok(saved) => Json(json!({"success": true, "saved": saved})).into_response(),
        Err(e) => internal_error(e),
    }
}
