//! HTTP transport for the MCP dispatcher.
//!
//! # Endpoints
//!
//! - `POST /` - JSON-RPC endpoint feeding `McpServer::handle_request`
//! - `GET /ping` - Health check
//! - `GET /notes` - Current notes as JSON
//! - `GET /notes/ui` - Current notes as an escaped HTML page
//! - `GET /stats` - Dispatcher runtime statistics
//! - `/app` - Companion UI bundle, mounted only if its directory exists

use std::path::Path;
use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::State,
    http::{header, HeaderMap, Method, StatusCode},
    response::{Html, IntoResponse, Json, Response},
    routing::{get, post},
    Router,
};
use serde_json::{json, Value};
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::services::ServeDir;
use tower_http::trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer};
use tracing::Level;

use crate::config::ServerConfig;
use crate::errors::Result;
use crate::mcp::{ErrorCode, JsonRpcRequest, JsonRpcResponse, McpServer};
use crate::store::{MonotonicIds, NoteStore};

/// HTML rendering of notes.
pub mod views;

/// State shared by all handlers.
#[derive(Clone)]
pub struct AppState {
    pub server: Arc<McpServer>,
    /// Fixed public base URL; when `None` it is derived from request headers.
    pub public_url: Option<Arc<str>>,
}

impl AppState {
    pub fn new(server: McpServer, public_url: Option<String>) -> Self {
        Self {
            server: Arc::new(server),
            public_url: public_url.filter(|u| !u.is_empty()).map(Arc::from),
        }
    }
}

/// Builds the router. `app_ui_dir` is mounted at `/app` only if it is an
/// existing directory.
pub fn create_router(state: AppState, app_ui_dir: Option<&Path>) -> Router {
    let mut router = Router::new()
        .route("/", post(rpc))
        .route("/ping", get(ping))
        .route("/notes", get(list_notes))
        .route("/notes/ui", get(notes_ui))
        .route("/stats", get(stats));

    if let Some(dir) = app_ui_dir {
        if dir.is_dir() {
            tracing::info!("Apps UI mounted at /app -> {}", dir.display());
            router = router.nest_service("/app", ServeDir::new(dir));
        } else {
            tracing::warn!("Missing /app UI at: {}", dir.display());
        }
    }

    router
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .layer(cors_layer())
        .with_state(state)
}

/// Reflects the caller's origin, so any browser-hosted client may connect.
fn cors_layer() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(AllowOrigin::mirror_request())
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers(Any)
}

fn header_str<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .filter(|s| !s.is_empty())
}

/// Works out the externally visible base URL, without a trailing slash.
///
/// A configured public URL wins; otherwise the forwarded host/proto headers
/// are used, falling back to `Host` and plain `http`.
pub fn resolve_base_url(public_url: Option<&str>, headers: &HeaderMap) -> String {
    if let Some(url) = public_url.filter(|u| !u.is_empty()) {
        return url.trim_end_matches('/').to_string();
    }

    let host = header_str(headers, "x-forwarded-host")
        .or_else(|| header_str(headers, header::HOST.as_str()))
        .unwrap_or("");
    let proto = header_str(headers, "x-forwarded-proto").unwrap_or("http");
    format!("{}://{}", proto, host)
}

/// JSON-RPC endpoint.
///
/// Responds `204 No Content` when the dispatcher has nothing to say.
async fn rpc(State(state): State<AppState>, headers: HeaderMap, body: Bytes) -> Response {
    let value: Value = match serde_json::from_slice(&body) {
        Ok(v) => v,
        Err(e) => {
            tracing::warn!("rejecting malformed JSON body: {}", e);
            return Json(JsonRpcResponse::error(
                Value::Null,
                ErrorCode::ParseError,
                format!("failed to parse JSON-RPC request: {}", e),
            ))
            .into_response();
        }
    };
    tracing::debug!(body = %value, "rpc request");

    let id = value.get("id").cloned().unwrap_or(Value::Null);
    let request: JsonRpcRequest = match serde_json::from_value(value) {
        Ok(r) => r,
        Err(e) => {
            return Json(JsonRpcResponse::error(
                id,
                ErrorCode::InvalidRequest,
                format!("invalid JSON-RPC request: {}", e),
            ))
            .into_response();
        }
    };

    let base_url = resolve_base_url(state.public_url.as_deref(), &headers);
    match state.server.handle_request(&request, &base_url) {
        Some(response) => Json(response).into_response(),
        None => StatusCode::NO_CONTENT.into_response(),
    }
}

async fn ping() -> Json<Value> {
    Json(json!({ "ok": true }))
}

async fn list_notes(State(state): State<AppState>) -> Json<Value> {
    Json(json!({ "notes": state.server.notes() }))
}

async fn notes_ui(State(state): State<AppState>) -> Html<String> {
    Html(views::render_notes_page(&state.server.notes()))
}

async fn stats(State(state): State<AppState>) -> Json<Value> {
    Json(state.server.server_stats_json())
}

/// Builds the store and dispatcher from `config` and serves until the
/// listener fails.
pub async fn start_server(config: ServerConfig) -> Result<()> {
    let store = if config.seed_demo_notes {
        NoteStore::seeded(MonotonicIds::new())
    } else {
        NoteStore::new(MonotonicIds::new())
    };
    let server = McpServer::new(store).with_unknown_method_policy(config.unknown_method_policy());
    let state = AppState::new(server, config.public_url.clone());
    let app = create_router(state, Some(&config.app_ui_dir));

    let listener = tokio::net::TcpListener::bind(config.bind_addr()).await?;
    tracing::info!("MCP server running on http://{}", listener.local_addr()?);
    axum::serve(listener, app).await?;

    Ok(())
}
