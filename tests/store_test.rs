use notes_mcp::errors::NotesError;
use notes_mcp::store::*;
use notes_mcp::types::{NewNote, Note};

fn new_note(title: &str) -> NewNote {
    NewNote {
        title: title.to_string(),
        content: format!("{} body", title),
        tags: vec![],
    }
}

#[test]
fn test_seeded_store_has_demo_notes() {
    let store = NoteStore::seeded(SequentialIds::new("n"));
    let notes = store.list_all();
    assert_eq!(notes.len(), 2);
    assert_eq!(notes[0].id, "n1");
    assert_eq!(notes[0].tags, vec!["demo".to_string()]);
    assert_eq!(notes[1].id, "n2");
    assert_eq!(notes[1].title, "Next Actions");
}

#[test]
fn test_create_inserts_at_front() {
    let mut store = NoteStore::new(SequentialIds::new("id-"));
    let a = store.create(new_note("a")).unwrap();
    let b = store.create(new_note("b")).unwrap();

    assert_eq!(a.id, "id-1");
    assert_eq!(b.id, "id-2");
    let ids: Vec<&str> = store.list_all().iter().map(|n| n.id.as_str()).collect();
    assert_eq!(ids, vec!["id-2", "id-1"]);
}

#[test]
fn test_created_at_is_iso8601_millis() {
    let mut store = NoteStore::default();
    let note = store.create(new_note("a")).unwrap();
    let parsed = chrono::DateTime::parse_from_rfc3339(&note.created_at).unwrap();
    assert_eq!(parsed.offset().local_minus_utc(), 0);
    // 2025-01-01T00:00:00.000Z
    assert_eq!(note.created_at.len(), 24);
}

#[test]
fn test_monotonic_ids_never_collide() {
    let mut store = NoteStore::new(MonotonicIds::new());
    for i in 0..200 {
        store.create(new_note(&i.to_string())).unwrap();
    }
    let mut ids: Vec<String> = store.list_all().iter().map(|n| n.id.clone()).collect();
    ids.sort();
    ids.dedup();
    assert_eq!(ids.len(), 200);
    assert!(ids.iter().all(|id| id.starts_with('n')));
}

#[test]
fn test_append_front_and_duplicates() {
    let mut store = NoteStore::new(SequentialIds::new("n"));
    let note = Note {
        id: "custom".to_string(),
        title: "t".to_string(),
        content: "c".to_string(),
        tags: vec!["x".to_string()],
        created_at: "2025-01-01T00:00:00.000Z".to_string(),
    };
    store.append_front(note.clone()).unwrap();
    assert_eq!(store.list_all()[0], note);

    let err = store.append_front(note).unwrap_err();
    assert!(matches!(err, NotesError::DuplicateId { ref id } if id == "custom"));
    assert_eq!(store.len(), 1);
}

#[test]
fn test_note_serializes_camel_case() {
    let mut store = NoteStore::new(SequentialIds::new("n"));
    let note = store.create(new_note("a")).unwrap();
    let value = serde_json::to_value(&note).unwrap();
    assert!(value.get("createdAt").is_some());
    assert!(value.get("created_at").is_none());
}

#[test]
fn test_created_note_is_visible_to_append_front_duplicate_check() {
    let mut store = NoteStore::new(SequentialIds::new("n"));
    let created = store.create(new_note("a")).unwrap();

    let err = store.append_front(created.clone()).unwrap_err();
    assert!(matches!(err, NotesError::DuplicateId { ref id } if *id == created.id));
    assert_eq!(store.len(), 1);
}
