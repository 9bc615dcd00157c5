//! MCP tool registry and tool handlers for the note store.
//!
//! The catalog is fixed at compile time. Tool definitions include JSON Schema
//! descriptions so that MCP clients can discover available capabilities.

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::errors::{NotesError, Result};
use crate::store::NoteStore;
use crate::types::{NewNote, Note};

/// Text shown by `get_notes` when the store is empty.
const EMPTY_NOTES_TEXT: &str = "_(no notes yet)_";

/// A tool definition exposed by the MCP server.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolDefinition {
    /// Unique tool name.
    pub name: String,
    /// Human-readable description of what the tool does.
    pub description: String,
    /// JSON Schema describing the tool's input parameters.
    #[serde(rename = "inputSchema")]
    pub input_schema: Value,
}

/// The tools this server can run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tool {
    GetNotes,
    CreateNote,
}

impl Tool {
    /// All tools, in declaration order.
    pub const ALL: [Tool; 2] = [Tool::GetNotes, Tool::CreateNote];

    pub fn as_str(self) -> &'static str {
        match self {
            Tool::GetNotes => "get_notes",
            Tool::CreateNote => "create_note",
        }
    }

    /// Looks up a tool by its exact name.
    pub fn resolve(name: &str) -> Option<Tool> {
        Self::ALL.into_iter().find(|t| t.as_str() == name)
    }

    pub fn definition(self) -> ToolDefinition {
        match self {
            Tool::GetNotes => ToolDefinition {
                name: self.as_str().to_string(),
                description: "List notes".to_string(),
                input_schema: json!({ "type": "object" }),
            },
            Tool::CreateNote => ToolDefinition {
                name: self.as_str().to_string(),
                description: "Create a note".to_string(),
                input_schema: json!({
                    "type": "object",
                    "required": ["title", "content"],
                    "properties": {
                        "title": { "type": "string" },
                        "content": { "type": "string" },
                        "tags": { "type": "array", "items": { "type": "string" } }
                    }
                }),
            },
        }
    }
}

/// Returns the list of all tool definitions exposed by this MCP server.
pub fn get_tool_definitions() -> Vec<ToolDefinition> {
    Tool::ALL.into_iter().map(Tool::definition).collect()
}

/// One unit of tool output.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ContentItem {
    /// Markdown text for the assistant to show.
    Text { text: String },
    /// Reference to the companion UI, with the state it should render.
    Ui { url: String, state: Value },
}

impl ContentItem {
    /// UI reference pointing at `<base_url>/app/` with the full note list as state.
    fn notes_view(base_url: &str, notes: &[Note]) -> Self {
        ContentItem::Ui {
            url: format!("{}/app/", base_url),
            state: json!({ "notes": notes }),
        }
    }
}

/// Runs `tool` against the store and returns its content items.
pub fn handle_tool_call(
    store: &mut NoteStore,
    tool: Tool,
    args: Value,
    base_url: &str,
) -> Result<Vec<ContentItem>> {
    match tool {
        Tool::GetNotes => Ok(handle_get_notes(store, base_url)),
        Tool::CreateNote => handle_create_note(store, args, base_url),
    }
}

/// Handles `get_notes` tool calls. Arguments are ignored.
fn handle_get_notes(store: &NoteStore, base_url: &str) -> Vec<ContentItem> {
    let notes = store.list_all();
    let text = if notes.is_empty() {
        EMPTY_NOTES_TEXT.to_string()
    } else {
        notes
            .iter()
            .map(|n| format!("- **{}** ({})", n.title, n.id))
            .collect::<Vec<_>>()
            .join("\n")
    };

    vec![
        ContentItem::Text { text },
        ContentItem::notes_view(base_url, notes),
    ]
}

/// Arguments accepted by `create_note`. A `null` tags value counts as absent.
#[derive(Debug, Deserialize)]
struct CreateNoteArgs {
    title: String,
    content: String,
    #[serde(default)]
    tags: Option<Vec<String>>,
}

impl From<CreateNoteArgs> for NewNote {
    fn from(args: CreateNoteArgs) -> Self {
        NewNote {
            title: args.title,
            content: args.content,
            tags: args.tags.unwrap_or_default(),
        }
    }
}

/// Handles `create_note` tool calls.
fn handle_create_note(
    store: &mut NoteStore,
    args: Value,
    base_url: &str,
) -> Result<Vec<ContentItem>> {
    let input: NewNote = serde_json::from_value::<CreateNoteArgs>(args)
        .map_err(|e| NotesError::invalid_params(format!("create_note: {}", e)))?
        .into();

    if input.title.trim().is_empty() {
        return Err(NotesError::invalid_params("create_note: title must not be empty"));
    }

    let note = store.create(input)?;

    Ok(vec![
        ContentItem::Text {
            text: format!("Created note **{}** ({})", note.title, note.id),
        },
        ContentItem::notes_view(base_url, store.list_all()),
    ])
}
