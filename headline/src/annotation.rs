//! Non-destructive display annotations.
//!
//! An [`AnnotationSet`] is the only output of a recomputation. It is sorted
//! once at construction and never mutated afterwards, so a display layer can
//! walk it front to back.
//!
//! # Ordering
//!
//! Annotations are ordered by start offset. At equal start offsets the
//! zero-width bullet insertion comes first, then the line indentation, then
//! the marker replacement, so the glyph renders before any line styling and
//! before the concealed marker. Remaining ties are broken by end offset.
//! Sorting is stable, so equal keys keep their emission order.

use serde::Serialize;
use std::{cmp::Ordering, ops::Range, slice};

/// Discriminant of an [`Annotation`], ordered by tie-break rank.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AnnotationKind {
    BulletInsert,
    LineIndent,
    MarkerReplace,
}

/// Glyph inserted in front of a header line.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
pub struct Bullet {
    pub glyph: &'static str,
    pub level: u8,
}

/// How an indented line relates to its content.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LineRole {
    Header,
    Content,
    ListItem,
    BlockQuote,
}

/// Left padding for a whole line, in columns.
///
/// `text_indent` shifts only the first visual row. Content lines use `0`;
/// list items and quotes use a negative hanging indent equal to their native
/// prefix, so the marker stays at `padding + text_indent` while wrapped rows
/// align with the item text.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
pub struct LineIndent {
    pub padding: u32,
    pub text_indent: i32,
    pub role: LineRole,
}

impl LineIndent {
    /// Column at which the first visual row of the line starts.
    pub fn first_row_column(&self) -> i64 {
        i64::from(self.padding) + i64::from(self.text_indent)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Payload {
    /// Zero-width glyph insertion.
    BulletInsert(Bullet),
    /// Line-level styling attached at the line start.
    LineIndent(LineIndent),
    /// Concealment of a header's hash run and its separator.
    MarkerReplace { level: u8 },
}

#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize)]
pub struct Annotation {
    pub range: Range<usize>,
    #[serde(flatten)]
    pub payload: Payload,
}

impl Annotation {
    pub fn bullet(at: usize, bullet: Bullet) -> Self {
        Self {
            range: at..at,
            payload: Payload::BulletInsert(bullet),
        }
    }

    pub fn line_indent(line_start: usize, indent: LineIndent) -> Self {
        Self {
            range: line_start..line_start,
            payload: Payload::LineIndent(indent),
        }
    }

    pub fn marker(range: Range<usize>, level: u8) -> Self {
        Self {
            range,
            payload: Payload::MarkerReplace { level },
        }
    }

    pub fn kind(&self) -> AnnotationKind {
        match self.payload {
            Payload::BulletInsert(_) => AnnotationKind::BulletInsert,
            Payload::LineIndent(_) => AnnotationKind::LineIndent,
            Payload::MarkerReplace { .. } => AnnotationKind::MarkerReplace,
        }
    }

    /// Whether the cursor and selection must treat the range as one unit.
    ///
    /// Inserted glyphs and concealed markers are atomic; line styling is not.
    pub fn is_atomic(&self) -> bool {
        !matches!(self.payload, Payload::LineIndent(_))
    }

    /// Total order used by [`AnnotationSet`].
    pub fn display_order(&self, other: &Self) -> Ordering {
        self.range
            .start
            .cmp(&other.range.start)
            .then_with(|| self.kind().cmp(&other.kind()))
            .then_with(|| self.range.end.cmp(&other.range.end))
    }
}

/// Immutable, display-ordered annotations for one document snapshot.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct AnnotationSet {
    annotations: Vec<Annotation>,
}

impl AnnotationSet {
    /// Sort `annotations` into display order and freeze them.
    pub fn from_unsorted(mut annotations: Vec<Annotation>) -> Self {
        annotations.sort_by(Annotation::display_order);
        Self { annotations }
    }

    pub fn len(&self) -> usize {
        self.annotations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.annotations.is_empty()
    }

    pub fn iter(&self) -> slice::Iter<'_, Annotation> {
        self.annotations.iter()
    }

    pub fn as_slice(&self) -> &[Annotation] {
        &self.annotations
    }

    /// Annotations starting inside `range`, in display order.
    pub fn starting_in(&self, range: Range<usize>) -> &[Annotation] {
        let from = self
            .annotations
            .partition_point(|a| a.range.start < range.start);
        let to = self
            .annotations
            .partition_point(|a| a.range.start < range.end);
        &self.annotations[from..to.max(from)]
    }

    /// Whether the set satisfies the display ordering invariant.
    pub fn is_ordered(&self) -> bool {
        self.annotations
            .windows(2)
            .all(|pair| pair[0].display_order(&pair[1]) != Ordering::Greater)
    }
}

impl<'a> IntoIterator for &'a AnnotationSet {
    type Item = &'a Annotation;
    type IntoIter = slice::Iter<'a, Annotation>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
