use chrono::{SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

/// A single note held by the note store.
///
/// Notes are immutable once created; only their position in the store changes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Note {
    pub id: String,
    pub title: String,
    pub content: String,
    #[serde(default)]
    pub tags: Vec<String>,
    /// ISO-8601 UTC timestamp with millisecond precision.
    pub created_at: String,
}

/// Input for creating a note. The store assigns the id and timestamp.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewNote {
    pub title: String,
    pub content: String,
    #[serde(default)]
    pub tags: Vec<String>,
}

/// Returns the current UTC time formatted like `2025-06-18T09:30:00.000Z`.
pub fn iso_timestamp() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}
