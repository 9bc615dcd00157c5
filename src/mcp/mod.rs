//! MCP (Model Context Protocol) server for the note store.
//!
//! Provides a JSON-RPC 2.0 interface so that AI assistants can list and
//! create notes. The dispatcher itself is transport-free; the `http` module
//! feeds it request bodies.

/// Typed decoding of request envelopes.
pub mod request;

/// Protocol dispatcher and server wrapper.
pub mod server;

/// Tool registry and tool handlers.
pub mod tools;

/// JSON-RPC 2.0 transport types.
pub mod transport;

pub use request::{ParsedRequest, ToolCall};
pub use server::{dispatch, DispatchContext, McpServer, UnknownMethodPolicy};
pub use tools::{get_tool_definitions, handle_tool_call, ContentItem, Tool, ToolDefinition};
pub use transport::{ErrorCode, JsonRpcError, JsonRpcRequest, JsonRpcResponse};
