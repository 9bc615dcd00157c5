//! Read-only HTML rendering of the note list.

use crate::types::Note;

/// Escapes `&`, `<` and `>` so note text cannot inject markup.
pub fn escape_html(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            _ => out.push(c),
        }
    }
    out
}

fn render_note_card(note: &Note) -> String {
    let tags = note
        .tags
        .iter()
        .map(|t| escape_html(t))
        .collect::<Vec<_>>()
        .join(", ");

    format!(
        r#"
      <div style="border:1px solid #ddd;padding:10px;margin:10px;border-radius:8px;background:#fafafa">
        <h3>{}</h3>
        <p>{}</p>
        <small>{}</small>
      </div>"#,
        escape_html(&note.title),
        escape_html(&note.content),
        tags
    )
}

/// Renders the full notes page with a link to the companion app.
pub fn render_notes_page(notes: &[Note]) -> String {
    let list: String = notes.iter().map(render_note_card).collect();

    format!(
        r#"
    <html><head><title>Notes</title></head>
    <body style="font-family:sans-serif;background:#f0f2f5;padding:20px;">
      <h2>Notes</h2>
      {}
      <p style="margin-top:20px;">
        <a href="/app" style="color:blue;">Open Full App UI</a>
      </p>
    </body></html>"#,
        list
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn note(title: &str, content: &str, tags: &[&str]) -> Note {
        Note {
            id: "n1".to_string(),
            title: title.to_string(),
            content: content.to_string(),
            tags: tags.iter().map(|t| t.to_string()).collect(),
            created_at: "2025-01-01T00:00:00.000Z".to_string(),
        }
    }

    #[test]
    fn test_escape_html() {
        assert_eq!(escape_html("a & b"), "a &amp; b");
        assert_eq!(escape_html("<b>"), "&lt;b&gt;");
        assert_eq!(escape_html("&lt;"), "&amp;lt;");
        assert_eq!(escape_html("plain"), "plain");
    }

    #[test]
    fn test_page_escapes_every_field() {
        let page = render_notes_page(&[note(
            "<script>alert(1)</script>",
            "Tom & Jerry <3",
            &["<i>tag</i>"],
        )]);
        assert!(!page.contains("<script>"));
        assert!(!page.contains("<i>"));
        assert!(page.contains("&lt;script&gt;alert(1)&lt;/script&gt;"));
        assert!(page.contains("Tom &amp; Jerry &lt;3"));
        assert!(page.contains("&lt;i&gt;tag&lt;/i&gt;"));
    }

    #[test]
    fn test_empty_page_still_links_app() {
        let page = render_notes_page(&[]);
        assert!(page.contains("<h2>Notes</h2>"));
        assert!(page.contains("href=\"/app\""));
    }
}
