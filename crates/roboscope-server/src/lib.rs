//! Replay server for roboscope.
//!
//! Serves recorded session archives (and an optional generated demo
//! session) over the same HTTP contract as the upstream telemetry service,
//! so the viewer can be pointed at a directory of exports instead of a live
//! recorder.

use std::path::Path;
use std::sync::Arc;

use axum::{
    Router,
    extract::{Path as UrlPath, Query, State},
    http::StatusCode,
    response::Json,
    routing::{get, post},
};
use serde::{Deserialize, Serialize};

use roboscope_core::protocol::{
    Message, SeekRequest, Session, SessionListResponse, SessionSource, TopicSummary,
};

pub mod demo;
pub mod store;

pub use demo::demo_archive;
pub use store::{SessionArchive, SessionStore};

/// Shared server state. The store is read-only after startup, so a plain
/// `Arc` is the whole concurrency story.
struct AppState {
    store: SessionStore,
}

/// Error body in the upstream service's shape.
#[derive(Serialize)]
struct ErrorDetail {
    detail: String,
}

type ApiError = (StatusCode, Json<ErrorDetail>);

fn not_found(what: &str) -> ApiError {
    (
        StatusCode::NOT_FOUND,
        Json(ErrorDetail {
            detail: format!("{what} not found"),
        }),
    )
}

#[derive(Deserialize)]
struct ListParams {
    /// Filter by source: "live" or "import".
    source: Option<String>,
    limit: Option<usize>,
    offset: Option<usize>,
}

#[derive(Serialize)]
struct HealthResponse {
    status: String,
    sessions: usize,
}

async fn handle_index(State(state): State<Arc<AppState>>) -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "name": "roboscope replay server",
        "version": roboscope_core::VERSION,
        "sessions": state.store.len(),
        "endpoints": {
            "/": "This API index",
            "/sessions": "List sessions (params: source, limit, offset)",
            "/sessions/{id}": "Session catalog entry",
            "/sessions/{id}/topics": "Per-topic summaries",
            "/sessions/{id}/seek": {
                "method": "POST",
                "description": "Time-range sample query",
                "body": {
                    "start_time": "range start in seconds (inclusive)",
                    "end_time": "range end in seconds (inclusive)",
                    "topics": "optional topic-name filter",
                    "limit": "max samples (1-10000, default: 1000)",
                }
            },
            "/sessions/{id}/export": "Full session archive",
            "/health": "Health check",
        },
    }))
}

async fn handle_list_sessions(
    State(state): State<Arc<AppState>>,
    Query(params): Query<ListParams>,
) -> Json<SessionListResponse> {
    let source = params.source.as_deref().and_then(|s| match s {
        "live" => Some(SessionSource::Live),
        "import" => Some(SessionSource::Import),
        _ => None,
    });
    let limit = params.limit.unwrap_or(100).clamp(1, 1000);
    let offset = params.offset.unwrap_or(0);

    let (sessions, total) = state.store.list(source, limit, offset);
    Json(SessionListResponse { sessions, total })
}

async fn handle_get_session(
    State(state): State<Arc<AppState>>,
    UrlPath(session_id): UrlPath<String>,
) -> Result<Json<Session>, ApiError> {
    state
        .store
        .get(&session_id)
        .map(|a| Json(a.session.clone()))
        .ok_or_else(|| not_found("Session"))
}

async fn handle_topics(
    State(state): State<Arc<AppState>>,
    UrlPath(session_id): UrlPath<String>,
) -> Result<Json<Vec<TopicSummary>>, ApiError> {
    state
        .store
        .get(&session_id)
        .map(|a| Json(a.topics.clone()))
        .ok_or_else(|| not_found("Session"))
}

async fn handle_seek(
    State(state): State<Arc<AppState>>,
    UrlPath(session_id): UrlPath<String>,
    Json(req): Json<SeekRequest>,
) -> Result<Json<Vec<Message>>, ApiError> {
    if !req.is_valid() {
        return Err((
            StatusCode::UNPROCESSABLE_ENTITY,
            Json(ErrorDetail {
                detail: "end_time must be greater than start_time".into(),
            }),
        ));
    }
    state
        .store
        .seek(&session_id, &req)
        .map(Json)
        .ok_or_else(|| not_found("Session"))
}

async fn handle_export(
    State(state): State<Arc<AppState>>,
    UrlPath(session_id): UrlPath<String>,
) -> Result<Json<SessionArchive>, ApiError> {
    state
        .store
        .get(&session_id)
        .map(|a| Json(a.clone()))
        .ok_or_else(|| not_found("Session"))
}

async fn handle_health(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".into(),
        sessions: state.store.len(),
    })
}

/// Build the axum router.
fn build_router(store: SessionStore) -> Router {
    let state = Arc::new(AppState { store });

    Router::new()
        .route("/", get(handle_index))
        .route("/sessions", get(handle_list_sessions))
        .route("/sessions/{session_id}", get(handle_get_session))
        .route("/sessions/{session_id}/topics", get(handle_topics))
        .route("/sessions/{session_id}/seek", post(handle_seek))
        .route("/sessions/{session_id}/export", get(handle_export))
        .route("/health", get(handle_health))
        .with_state(state)
}

/// Assemble a store from an optional archive directory and/or a demo
/// session of `demo_secs` seconds.
pub fn build_store(data_dir: Option<&Path>, demo_secs: Option<f64>) -> std::io::Result<SessionStore> {
    let mut store = match data_dir {
        Some(dir) => SessionStore::load_dir(dir)?,
        None => SessionStore::new(),
    };
    if let Some(secs) = demo_secs {
        store.insert(demo_archive(secs));
    }
    Ok(store)
}

/// Run the replay server until the process is stopped.
pub async fn run_server(store: SessionStore, host: &str, port: u16) -> std::io::Result<()> {
    let app = build_router(store);
    let addr = format!("{host}:{port}");
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    log::info!("replay server listening on {addr}");
    axum::serve(listener, app).await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn build_store_demo_only() {
        let store = build_store(None, Some(3.0)).unwrap();
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn build_store_empty() {
        let store = build_store(None, None).unwrap();
        assert!(store.is_empty());
    }

    #[test]
    fn build_store_from_dir_plus_demo() {
        let dir = tempfile::tempdir().unwrap();
        let archive = demo_archive(1.0);
        std::fs::write(
            dir.path().join("a.json"),
            serde_json::to_string(&archive).unwrap(),
        )
        .unwrap();

        let store = build_store(Some(dir.path()), Some(2.0)).unwrap();
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn router_builds() {
        let store = build_store(None, Some(1.0)).unwrap();
        let _router = build_router(store);
    }
}
