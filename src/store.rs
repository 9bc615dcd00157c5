//! In-memory note store.
//!
//! The store exclusively owns the ordered list of notes (most recent first).
//! It has no persistence: a restart starts again from an empty or seeded store.

use std::collections::HashSet;

use crate::errors::{NotesError, Result};
use crate::types::{iso_timestamp, NewNote, Note};

/// Source of fresh note identifiers.
pub trait IdGenerator: Send {
    /// Returns the next identifier. Must never repeat within one generator.
    fn next_id(&mut self) -> String;
}

/// Time-derived ids of the form `n<unix millis>`.
///
/// Strictly increasing within the process, even if two notes are created in
/// the same millisecond or the wall clock steps backwards.
#[derive(Debug, Default)]
pub struct MonotonicIds {
    last: u64,
}

impl MonotonicIds {
    pub fn new() -> Self {
        Self::default()
    }
}

impl IdGenerator for MonotonicIds {
    fn next_id(&mut self) -> String {
        let now = chrono::Utc::now().timestamp_millis().max(0) as u64;
        self.last = now.max(self.last + 1);
        format!("n{}", self.last)
    }
}

/// Deterministic counter ids (`<prefix>1`, `<prefix>2`, ...).
#[derive(Debug)]
pub struct SequentialIds {
    prefix: String,
    next: u64,
}

impl SequentialIds {
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            next: 1,
        }
    }
}

impl IdGenerator for SequentialIds {
    fn next_id(&mut self) -> String {
        let id = format!("{}{}", self.prefix, self.next);
        self.next += 1;
        id
    }
}

/// Ordered, most-recent-first collection of notes.
pub struct NoteStore {
    notes: Vec<Note>,
    ids: HashSet<String>,
    id_gen: Box<dyn IdGenerator>,
}

impl NoteStore {
    /// Creates an empty store drawing ids from `id_gen`.
    pub fn new(id_gen: impl IdGenerator + 'static) -> Self {
        Self {
            notes: Vec::new(),
            ids: HashSet::new(),
            id_gen: Box::new(id_gen),
        }
    }

    /// Creates a store pre-populated with the two demo notes.
    pub fn seeded(id_gen: impl IdGenerator + 'static) -> Self {
        let mut store = Self::new(id_gen);
        let created_at = iso_timestamp();
        let demo = [
            Note {
                id: "n1".to_string(),
                title: "Welcome to Notes".to_string(),
                content: "You can create, list, and view notes from your assistant now."
                    .to_string(),
                tags: vec!["demo".to_string()],
                created_at: created_at.clone(),
            },
            Note {
                id: "n2".to_string(),
                title: "Next Actions".to_string(),
                content: "- Wire bookmarks\n- Add summarize tool\n- Connect org auth if needed"
                    .to_string(),
                tags: vec!["todo".to_string()],
                created_at,
            },
        ];
        // Pushed in reverse so that n1 ends up first.
        for note in demo.into_iter().rev() {
            store.ids.insert(note.id.clone());
            store.notes.insert(0, note);
        }
        store
    }

    /// Inserts a note at the front of the list.
    ///
    /// Fails with `DuplicateId` if a note with the same id already exists.
    pub fn append_front(&mut self, note: Note) -> Result<()> {
        if !self.ids.insert(note.id.clone()) {
            return Err(NotesError::DuplicateId { id: note.id });
        }
        self.notes.insert(0, note);
        Ok(())
    }

    /// Returns every note, most recent first.
    pub fn list_all(&self) -> &[Note] {
        &self.notes
    }

    /// Creates a note with a fresh id and timestamp and stores it at the front.
    pub fn create(&mut self, input: NewNote) -> Result<Note> {
        let mut id = self.id_gen.next_id();
        while self.ids.contains(&id) {
            id = self.id_gen.next_id();
        }

        let note = Note {
            id,
            title: input.title,
            content: input.content,
            tags: input.tags,
            created_at: iso_timestamp(),
        };
        self.append_front(note.clone())?;
        tracing::debug!(id = %note.id, total = self.notes.len(), "note created");
        Ok(note)
    }

    pub fn len(&self) -> usize {
        self.notes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.notes.is_empty()
    }
}

impl Default for NoteStore {
    fn default() -> Self {
        Self::new(MonotonicIds::new())
    }
}
