//! MCP protocol dispatcher.
//!
//! `dispatch` is the transport-free core: a function of one request envelope
//! and the note store that produces at most one response envelope.
//! `McpServer` owns the store for the HTTP layer and keeps runtime statistics.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Mutex, MutexGuard};
use std::time::Instant;

use serde_json::{json, Value};

use crate::errors::NotesError;
use crate::store::NoteStore;
use crate::types::Note;

use super::request::{methods, ParsedRequest, ToolCall};
use super::tools::{get_tool_definitions, handle_tool_call, Tool};
use super::transport::{ErrorCode, JsonRpcRequest, JsonRpcResponse};

/// MCP protocol revision announced by `initialize`.
pub const PROTOCOL_VERSION: &str = "2025-06-18";

/// Server name announced by `initialize`.
pub const SERVER_NAME: &str = "notes-mcp";

/// How to answer a method name the dispatcher does not recognise.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum UnknownMethodPolicy {
    /// Reply with a success envelope carrying `{"ok": true}`.
    #[default]
    Permissive,
    /// Reply with a `-32601` method-not-found error.
    Strict,
}

/// Per-request inputs to `dispatch` that do not live in the store.
#[derive(Debug, Clone)]
pub struct DispatchContext {
    /// Base URL used to build UI references, without a trailing slash.
    pub base_url: String,
    pub unknown_methods: UnknownMethodPolicy,
}

impl DispatchContext {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            unknown_methods: UnknownMethodPolicy::default(),
        }
    }
}

/// Dispatches one request envelope against the store.
///
/// Returns `None` only for `notifications/initialized`, which has no
/// response body. Every other request gets an envelope echoing its id.
pub fn dispatch(
    request: &JsonRpcRequest,
    store: &mut NoteStore,
    ctx: &DispatchContext,
) -> Option<JsonRpcResponse> {
    let id = request.id.clone();

    let parsed = match ParsedRequest::parse(request) {
        Ok(parsed) => parsed,
        Err(e) => return Some(error_response(id, &e)),
    };

    match parsed {
        ParsedRequest::Initialize => Some(handle_initialize(id)),
        ParsedRequest::ToolsList => Some(handle_tools_list(id)),
        ParsedRequest::ToolsCall(call) => Some(handle_tools_call(id, call, store, ctx)),
        ParsedRequest::InitializedNotification => None,
        ParsedRequest::Other(method) => Some(handle_unknown_method(id, &method, ctx)),
    }
}

/// Handles the `initialize` method, returning server capabilities.
fn handle_initialize(id: Value) -> JsonRpcResponse {
    JsonRpcResponse::success(
        id,
        json!({
            "protocolVersion": PROTOCOL_VERSION,
            "capabilities": {
                "tools": { "listChanged": true }
            },
            "serverInfo": {
                "name": SERVER_NAME,
                "version": env!("CARGO_PKG_VERSION")
            }
        }),
    )
}

/// Handles the `tools/list` method, returning all available tool definitions.
fn handle_tools_list(id: Value) -> JsonRpcResponse {
    JsonRpcResponse::success(id, json!({ "tools": get_tool_definitions() }))
}

/// Handles the `tools/call` method, dispatching to the named tool.
fn handle_tools_call(
    id: Value,
    call: ToolCall,
    store: &mut NoteStore,
    ctx: &DispatchContext,
) -> JsonRpcResponse {
    let Some(tool) = Tool::resolve(&call.name) else {
        tracing::debug!(tool = %call.name, "unknown tool requested");
        return JsonRpcResponse::error(id, ErrorCode::MethodNotFound, "Unknown tool");
    };

    match handle_tool_call(store, tool, call.arguments, &ctx.base_url) {
        Ok(content) => JsonRpcResponse::success(id, json!({ "content": content })),
        Err(e) => error_response(id, &e),
    }
}

fn handle_unknown_method(id: Value, method: &str, ctx: &DispatchContext) -> JsonRpcResponse {
    match ctx.unknown_methods {
        UnknownMethodPolicy::Permissive => {
            tracing::debug!(method, "unrecognised method, replying ok");
            JsonRpcResponse::success(id, json!({ "ok": true }))
        }
        UnknownMethodPolicy::Strict => JsonRpcResponse::error(
            id,
            ErrorCode::MethodNotFound,
            format!("method not found: {}", method),
        ),
    }
}

/// Maps a domain error onto a JSON-RPC error envelope.
fn error_response(id: Value, err: &NotesError) -> JsonRpcResponse {
    let code = match err {
        NotesError::InvalidParams { .. } => ErrorCode::InvalidParams,
        _ => ErrorCode::InternalError,
    };
    JsonRpcResponse::error(id, code, err.to_string())
}

/// Stats bucket for `tools/call` requests naming no known tool.
const UNRESOLVED_TOOL_KEY: &str = "<unknown>";

/// Runtime statistics for the MCP server.
pub struct ServerStats {
    started_at: Instant,
    total_requests: AtomicU64,
    tool_calls: AtomicU64,
    errors: AtomicU64,
}

impl ServerStats {
    fn new() -> Self {
        Self {
            started_at: Instant::now(),
            total_requests: AtomicU64::new(0),
            tool_calls: AtomicU64::new(0),
            errors: AtomicU64::new(0),
        }
    }
}

/// The MCP server wrapping a `NoteStore` instance.
///
/// Each request holds the store lock for its whole dispatch, so handling is
/// serialised even when the HTTP layer runs requests in parallel.
pub struct McpServer {
    store: Mutex<NoteStore>,
    unknown_methods: UnknownMethodPolicy,
    stats: ServerStats,
    tool_call_counts: Mutex<HashMap<&'static str, u64>>,
}

impl McpServer {
    /// Creates a new MCP server backed by the given store.
    pub fn new(store: NoteStore) -> Self {
        Self {
            store: Mutex::new(store),
            unknown_methods: UnknownMethodPolicy::default(),
            stats: ServerStats::new(),
            tool_call_counts: Mutex::new(HashMap::new()),
        }
    }

    pub fn with_unknown_method_policy(mut self, policy: UnknownMethodPolicy) -> Self {
        self.unknown_methods = policy;
        self
    }

    fn lock_store(&self) -> MutexGuard<'_, NoteStore> {
        // A panic mid-request cannot leave the Vec half-written, so keep serving.
        self.store.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Dispatches a parsed request, using `base_url` for UI references.
    ///
    /// Returns `None` for the initialized notification.
    pub fn handle_request(
        &self,
        request: &JsonRpcRequest,
        base_url: &str,
    ) -> Option<JsonRpcResponse> {
        self.stats.total_requests.fetch_add(1, Ordering::Relaxed);

        if request.method == methods::TOOLS_CALL {
            self.stats.tool_calls.fetch_add(1, Ordering::Relaxed);
            // Keys are registry names plus the single unresolved bucket.
            let key = request
                .params
                .as_ref()
                .and_then(|p| p.get("name"))
                .and_then(Value::as_str)
                .and_then(Tool::resolve)
                .map_or(UNRESOLVED_TOOL_KEY, Tool::as_str);
            if let Ok(mut counts) = self.tool_call_counts.lock() {
                *counts.entry(key).or_insert(0) += 1;
            }
        }

        let ctx = DispatchContext {
            base_url: base_url.to_string(),
            unknown_methods: self.unknown_methods,
        };
        let response = {
            let mut store = self.lock_store();
            dispatch(request, &mut store, &ctx)
        };

        if let Some(ref resp) = response {
            if resp.is_error() {
                self.stats.errors.fetch_add(1, Ordering::Relaxed);
            }
        }

        response
    }

    /// Snapshot of all notes, most recent first.
    pub fn notes(&self) -> Vec<Note> {
        self.lock_store().list_all().to_vec()
    }

    /// Returns the current server runtime statistics as a JSON value.
    pub fn server_stats_json(&self) -> Value {
        let uptime = self.stats.started_at.elapsed();
        let tool_counts: Value = self
            .tool_call_counts
            .lock()
            .map(|counts| json!(*counts))
            .unwrap_or(json!({}));

        json!({
            "uptime_secs": uptime.as_secs(),
            "total_requests": self.stats.total_requests.load(Ordering::Relaxed),
            "tool_calls": self.stats.tool_calls.load(Ordering::Relaxed),
            "errors": self.stats.errors.load(Ordering::Relaxed),
            "note_count": self.lock_store().len(),
            "tool_call_counts": tool_counts,
        })
    }
}
