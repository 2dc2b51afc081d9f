//! Line-addressable document snapshots.
//!
//! The resolver and builder never hold on to a host buffer. They read lines
//! through [`LineSource`], which a host implements over whatever storage it
//! has. [`Document`] is the owned implementation used by tests and by the
//! terminal host.

use std::ops::Range;

/// A single line of a [`LineSource`].
///
/// `start` is the byte offset of the first character of the line within the
/// whole document. `text` excludes the line terminator.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Line<'a> {
    pub index: usize,
    pub start: usize,
    pub text: &'a str,
}

impl Line<'_> {
    /// Byte length of the line, excluding the terminator.
    pub fn len(&self) -> usize {
        self.text.len()
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    /// Byte offset one past the last character of the line.
    pub fn end(&self) -> usize {
        self.start + self.text.len()
    }
}

/// Read-only, line-addressable view of a document.
///
/// Implementations must return lines in document order with non-decreasing
/// start offsets. A view is only required to stay valid for the duration of a
/// single recomputation.
pub trait LineSource {
    fn line_count(&self) -> usize;

    /// Line at `index`. Callers only pass indices below [`line_count`](Self::line_count).
    fn line(&self, index: usize) -> Line<'_>;
}

/// Owned document snapshot with a precomputed line index.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Document {
    text: String,
    lines: Vec<Range<usize>>,
}

impl Document {
    /// Build a snapshot from `text`, splitting on `\n`.
    ///
    /// A `\r` immediately before `\n` is treated as part of the terminator.
    /// Text ending in a newline has a trailing empty line, and the empty
    /// string has exactly one empty line.
    pub fn new(text: impl Into<String>) -> Self {
        let text = text.into();
        let mut lines = Vec::new();
        let mut start = 0;

        for (newline, _) in text.match_indices('\n') {
            let end = if newline > start && text.as_bytes()[newline - 1] == b'\r' {
                newline - 1
            } else {
                newline
            };
            lines.push(start..end);
            start = newline + 1;
        }
        lines.push(start..text.len());

        Self { text, lines }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn lines(&self) -> impl Iterator<Item = Line<'_>> + '_ {
        (0..self.lines.len()).map(move |index| self.line(index))
    }
}

impl LineSource for Document {
    fn line_count(&self) -> usize {
        self.lines.len()
    }

    fn line(&self, index: usize) -> Line<'_> {
        let range = self.lines[index].clone();
        Line {
            index,
            start: range.start,
            text: &self.text[range],
        }
    }
}

impl From<&str> for Document {
    fn from(text: &str) -> Self {
        Self::new(text)
    }
}

impl From<String> for Document {
    fn from(text: String) -> Self {
        Self::new(text)
    }
}
