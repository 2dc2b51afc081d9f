//! Plain-text rendition of an annotated document.
//!
//! Approximates what an editor shows: each line is shifted to the column its
//! [`LineIndent`](headline::LineIndent) puts the first visual row at, header
//! markers are dropped and the bullet glyph takes their place.

use headline::{AnnotationSet, Document, LineSource, Payload};

/// Render `document` with `annotations` applied.
///
/// Lines are joined with `\n`; no trailing newline is added.
pub fn render(document: &Document, annotations: &AnnotationSet) -> String {
    let text = document.text();
    let mut out = String::with_capacity(text.len());

    for index in 0..document.line_count() {
        if index > 0 {
            out.push('\n');
        }
        let line = document.line(index);
        // Inclusive end so zero-width annotations on empty lines are found.
        let attached = annotations.starting_in(line.start..line.end() + 1);

        let column = attached
            .iter()
            .find_map(|a| match a.payload {
                Payload::LineIndent(indent) => Some(indent.first_row_column()),
                _ => None,
            })
            .unwrap_or(0)
            .max(0);
        for _ in 0..column {
            out.push(' ');
        }

        let mut cursor = line.start;
        for annotation in attached {
            let at = annotation.range.start.clamp(cursor, line.end());
            match annotation.payload {
                Payload::BulletInsert(bullet) => {
                    out.push_str(&text[cursor..at]);
                    out.push_str(bullet.glyph);
                    out.push(' ');
                    cursor = at;
                },
                Payload::MarkerReplace { .. } => {
                    out.push_str(&text[cursor..at]);
                    cursor = annotation.range.end.clamp(at, line.end());
                },
                Payload::LineIndent(_) => {},
            }
        }
        out.push_str(&text[cursor..line.end()]);
    }

    out
}
