//! Per-line classification.
//!
//! Only the handful of constructs that affect indentation are recognized:
//! hash headers, blank lines, fenced and indented code, horizontal rules,
//! list items, block quotes and pipe tables. Everything else is [`LineKind::Text`].
//!
//! Headers come from the hash-run rule alone; the other constructs come from
//! the document's [`BlockStructure`]. Fenced blocks are opaque: a `# comment`
//! inside a shell snippet is code, not a header.

use crate::{
    blocks::{Block, BlockStructure, MarkdownBlocks},
    document::LineSource,
};

/// Deepest header level recognized by the hash-run rule.
pub const MAX_HEADER_LEVEL: u8 = 6;

/// Columns a tab advances to when measuring native indentation.
const TAB_STOP: u32 = 4;

/// Leading whitespace (in columns) at which a `>` no longer opens a quote.
const CODE_INDENT: u32 = 4;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum LineKind {
    /// Empty or whitespace-only, outside any fenced block.
    Blank,
    /// Hash header. `marker_len` is the byte length of the hash run plus its
    /// single separator character.
    Header { level: u8, marker_len: usize },
    /// List item. `prefix` is the display width of the leading whitespace,
    /// the marker and the whitespace that follows it.
    ListItem { prefix: u32 },
    /// Block quote. `prefix` is the display width up to the quoted text.
    BlockQuote { prefix: u32 },
    /// Opening or closing code fence.
    CodeFence,
    /// Inside a fenced block, or an indented code line.
    Code,
    Table,
    HorizontalRule,
    Text,
}

impl LineKind {
    pub fn is_blank(&self) -> bool {
        matches!(self, LineKind::Blank)
    }

    pub fn is_list_item(&self) -> bool {
        matches!(self, LineKind::ListItem { .. })
    }

    /// Lines whose native layout must never be shifted by content indentation.
    pub fn is_verbatim(&self) -> bool {
        matches!(
            self,
            LineKind::Code | LineKind::CodeFence | LineKind::Table | LineKind::HorizontalRule
        )
    }
}

/// Match the header rule: 1-6 `#` at column 0 followed by one whitespace
/// character. Returns the level and the byte length of hashes plus separator.
pub fn header_marker(text: &str) -> Option<(u8, usize)> {
    let hashes = text.bytes().take_while(|&b| b == b'#').count();
    if hashes == 0 || hashes > MAX_HEADER_LEVEL as usize {
        return None;
    }

    let separator = text[hashes..].chars().next()?;
    if !separator.is_whitespace() {
        return None;
    }

    Some((hashes as u8, hashes + separator.len_utf8()))
}

/// Classify every line of `source`, in order, parsing its block structure.
pub fn classify<S: LineSource + ?Sized>(source: &S) -> Vec<LineKind> {
    classify_with(source, &MarkdownBlocks::parse(source))
}

/// Classify every line of `source` against an already known block structure.
pub fn classify_with<S, B>(source: &S, blocks: &B) -> Vec<LineKind>
where
    S: LineSource + ?Sized,
    B: BlockStructure + ?Sized,
{
    (0..source.line_count())
        .map(|index| kind_of(source.line(index).text, blocks.block(index)))
        .collect()
}

fn kind_of(text: &str, block: Option<Block>) -> LineKind {
    match block {
        Some(Block::FenceDelimiter) => return LineKind::CodeFence,
        Some(Block::FencedCode) => return LineKind::Code,
        _ => {},
    }

    if text.trim().is_empty() {
        return LineKind::Blank;
    }
    if let Some((level, marker_len)) = header_marker(text) {
        return LineKind::Header { level, marker_len };
    }

    match block {
        Some(Block::IndentedCode) => LineKind::Code,
        Some(Block::Table) => LineKind::Table,
        Some(Block::ThematicBreak) => LineKind::HorizontalRule,
        Some(Block::BlockQuote | Block::ListItem) => quote_prefix(text)
            .map(|prefix| LineKind::BlockQuote { prefix })
            .or_else(|| list_prefix(text).map(|prefix| LineKind::ListItem { prefix }))
            .unwrap_or(LineKind::Text),
        _ => LineKind::Text,
    }
}

/// Measure leading spaces and tabs starting at display column `column`.
/// Returns the column reached and the number of bytes consumed.
fn measure_whitespace(text: &str, column: u32) -> (u32, usize) {
    let mut col = column;
    let mut bytes = 0;
    for b in text.bytes() {
        match b {
            b' ' => col += 1,
            b'\t' => col += TAB_STOP - col % TAB_STOP,
            _ => break,
        }
        bytes += 1;
    }
    (col, bytes)
}

fn list_prefix(text: &str) -> Option<u32> {
    let (indent, indent_bytes) = measure_whitespace(text, 0);
    let rest = &text[indent_bytes..];

    let marker_len = match *rest.as_bytes().first()? {
        b'-' | b'*' | b'+' => 1,
        b'0'..=b'9' => {
            let digits = rest.bytes().take_while(u8::is_ascii_digit).count();
            if digits > 9 {
                return None;
            }
            match rest.as_bytes().get(digits) {
                Some(b'.' | b')') => digits + 1,
                _ => return None,
            }
        },
        _ => return None,
    };

    let after = &rest[marker_len..];
    let marker_end = indent + marker_len as u32;
    if after.is_empty() {
        return Some(marker_end);
    }
    if !after.starts_with([' ', '\t']) {
        return None;
    }

    let (end, _) = measure_whitespace(after, marker_end);
    Some(end)
}

fn quote_prefix(text: &str) -> Option<u32> {
    let (indent, bytes) = measure_whitespace(text, 0);
    if indent >= CODE_INDENT {
        return None;
    }
    let rest = text[bytes..].strip_prefix('>')?;
    let space = u32::from(rest.starts_with(' '));
    Some(indent + 1 + space)
}
