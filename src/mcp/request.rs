//! Typed view of an incoming request envelope.
//!
//! The method name is matched once, here, into a closed set of variants so
//! the dispatcher never touches untyped params for the methods it knows.

use serde_json::{Map, Value};

use crate::errors::{NotesError, Result};

use super::transport::JsonRpcRequest;

/// Method names recognised by the dispatcher.
pub mod methods {
    pub const INITIALIZE: &str = "initialize";
    pub const TOOLS_LIST: &str = "tools/list";
    pub const TOOLS_CALL: &str = "tools/call";
    pub const INITIALIZED_NOTIFICATION: &str = "notifications/initialized";
}

/// Parameters of a `tools/call` request.
#[derive(Debug, Clone, PartialEq)]
pub struct ToolCall {
    pub name: String,
    /// Defaults to an empty object when the client sends none.
    pub arguments: Value,
}

/// A request envelope decoded into one of the protocol's methods.
#[derive(Debug, Clone, PartialEq)]
pub enum ParsedRequest {
    Initialize,
    ToolsList,
    ToolsCall(ToolCall),
    /// `notifications/initialized`: fire-and-forget, no response body.
    InitializedNotification,
    /// Any method name not listed above.
    Other(String),
}

impl ParsedRequest {
    /// Decodes the method and its required params.
    ///
    /// Only `tools/call` has required params; a missing `name` or
    /// non-object `arguments` is an `InvalidParams` error.
    pub fn parse(request: &JsonRpcRequest) -> Result<Self> {
        match request.method.as_str() {
            methods::INITIALIZE => Ok(Self::Initialize),
            methods::TOOLS_LIST => Ok(Self::ToolsList),
            methods::TOOLS_CALL => parse_tool_call(request.params.as_ref()).map(Self::ToolsCall),
            methods::INITIALIZED_NOTIFICATION => Ok(Self::InitializedNotification),
            other => Ok(Self::Other(other.to_string())),
        }
    }
}

fn parse_tool_call(params: Option<&Value>) -> Result<ToolCall> {
    let params = params
        .and_then(Value::as_object)
        .ok_or_else(|| NotesError::invalid_params("missing params for tools/call"))?;

    let name = params
        .get("name")
        .and_then(Value::as_str)
        .ok_or_else(|| NotesError::invalid_params("missing 'name' in tools/call params"))?;

    let arguments = match params.get("arguments") {
        None | Some(Value::Null) => Value::Object(Map::new()),
        Some(args @ Value::Object(_)) => args.clone(),
        Some(_) => {
            return Err(NotesError::invalid_params(
                "'arguments' in tools/call params must be an object",
            ))
        }
    };

    Ok(ToolCall {
        name: name.to_string(),
        arguments,
    })
}
