//! Annotation generation.
//!
//! [`build`] resolves the governing level of every line and turns each line
//! into zero or more [`Annotation`]s:
//!
//! | line                          | annotations                                          |
//! |-------------------------------|------------------------------------------------------|
//! | accepted header at level `n`  | bullet, indent `(n - 1) * unit` when `n > 1`, marker |
//! | text under level `n`          | indent `n * unit`                                    |
//! | list item / quote under `n`   | hanging indent, marker stays at `n * unit`           |
//! | code, fence, table, rule      | none                                                 |
//! | blank, or no governing header | none                                                 |
//!
//! Ignoring top-level headers only affects `#` lines; deeper headers keep
//! their own level.
//!
//! Every entry point is a pure function of its inputs; equal inputs yield
//! equal, identically ordered sets.

use crate::{
    annotation::{Annotation, AnnotationSet, Bullet, LineIndent, LineRole},
    blocks::{BlockStructure, MarkdownBlocks},
    config::Config,
    document::{Line, LineSource},
    level::{resolve_with, ResolvedLine},
    line_kind::LineKind,
};
use std::ops::Range;

/// Glyphs inserted in front of headers, indexed by `level - 1`. Levels past
/// the end of the palette reuse the last glyph.
pub const BULLET_PALETTE: [&str; 4] = ["●", "○", "◆", "◇"];

pub fn bullet_glyph(level: u8) -> &'static str {
    let index = usize::from(level.saturating_sub(1)).min(BULLET_PALETTE.len() - 1);
    BULLET_PALETTE[index]
}

/// Annotate every line of `source`.
pub fn build<S: LineSource + ?Sized>(source: &S, config: &Config) -> AnnotationSet {
    build_visible(source, config, 0..source.line_count())
}

/// Annotate only the lines whose index falls in `visible`.
///
/// Levels are still resolved from the first line, so a visible line deep
/// inside a section is governed by its header even when the header itself
/// is scrolled out of view.
pub fn build_visible<S: LineSource + ?Sized>(
    source: &S,
    config: &Config,
    visible: Range<usize>,
) -> AnnotationSet {
    build_visible_with(source, &MarkdownBlocks::parse(source), config, visible)
}

/// Like [`build_visible`], with the block structure supplied by the host.
pub fn build_visible_with<S, B>(
    source: &S,
    blocks: &B,
    config: &Config,
    visible: Range<usize>,
) -> AnnotationSet
where
    S: LineSource + ?Sized,
    B: BlockStructure + ?Sized,
{
    let resolved = resolve_with(source, blocks, config);
    let visible = visible.start.min(resolved.len())..visible.end.min(resolved.len());

    let mut annotations = Vec::new();
    for index in visible.clone() {
        annotate_line(source.line(index), resolved[index], config, &mut annotations);
    }

    let set = AnnotationSet::from_unsorted(annotations);
    tracing::debug!(
        lines = resolved.len(),
        visible_start = visible.start,
        visible_end = visible.end,
        annotations = set.len(),
        "built header annotations"
    );
    set
}

fn annotate_line(
    line: Line<'_>,
    resolved: ResolvedLine,
    config: &Config,
    out: &mut Vec<Annotation>,
) {
    let level = resolved.level;
    match resolved.kind {
        LineKind::Header { level, marker_len } => {
            out.push(Annotation::bullet(
                line.start,
                Bullet {
                    glyph: bullet_glyph(level),
                    level,
                },
            ));
            if level > 1 {
                out.push(Annotation::line_indent(
                    line.start,
                    LineIndent {
                        padding: config.indent(level - 1),
                        text_indent: 0,
                        role: LineRole::Header,
                    },
                ));
            }
            out.push(Annotation::marker(line.start..line.start + marker_len, level));
        },
        _ if level == 0 => {},
        kind if kind.is_blank() || kind.is_verbatim() => {},
        LineKind::ListItem { prefix } => {
            out.push(hanging(line.start, config.indent(level), prefix, LineRole::ListItem));
        },
        LineKind::BlockQuote { prefix } => {
            out.push(hanging(line.start, config.indent(level), prefix, LineRole::BlockQuote));
        },
        _ => {
            out.push(Annotation::line_indent(
                line.start,
                LineIndent {
                    padding: config.indent(level),
                    text_indent: 0,
                    role: LineRole::Content,
                },
            ));
        },
    }
}

/// Indent a line by `base` while keeping its native marker at `base`.
fn hanging(line_start: usize, base: u32, prefix: u32, role: LineRole) -> Annotation {
    let shift = i32::try_from(prefix).unwrap_or(i32::MAX);
    Annotation::line_indent(
        line_start,
        LineIndent {
            padding: base.saturating_add(shift.unsigned_abs()),
            text_indent: -shift,
            role,
        },
    )
}
