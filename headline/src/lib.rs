//! Header-driven indentation for hash-header text documents.
//!
//! Given a document whose sections are introduced by `#`-prefixed headers,
//! this crate computes presentational annotations: the hash run of each header
//! is concealed and replaced by a level-indexed bullet glyph, and every line
//! under a header is padded in proportion to that header's level. The text
//! itself is never modified.
//!
//! # Architecture
//!
//! ```text
//! LineSource (host text)
//!   | MarkdownBlocks  per-line Block from a tree-sitter-md parse
//!   | classify        per-line LineKind
//!   | LevelResolver   governing ActiveLevel per line
//!   | build           ordered AnnotationSet
//!   | UpdateScheduler deferred, coalesced publish to the EditorSurface
//! ```
//!
//! Everything up to [`build`] is a pure function of the document and the
//! [`Config`]. The [`UpdateScheduler`] is the only stateful piece; it runs on
//! a single-threaded [`smol::LocalExecutor`] and never blocks the caller.
//!
//! # Usage
//!
//! ```ignore
//! let doc = Document::new("## Section\nBody text");
//! let annotations = build(&doc, &Config::default());
//! for annotation in &annotations {
//!     // hand to the display layer
//! }
//! ```
mod annotation;
mod blocks;
mod config;
mod decoration;
mod document;
mod level;
mod line_kind;
mod scheduler;

pub use annotation::{
    Annotation, AnnotationKind, AnnotationSet, Bullet, LineIndent, LineRole, Payload,
};
pub use blocks::{Block, BlockStructure, MarkdownBlocks};
pub use config::Config;
pub use decoration::{build, build_visible, build_visible_with, bullet_glyph, BULLET_PALETTE};
pub use document::{Document, Line, LineSource};
pub use level::{
    resolve, resolve_with, ActiveLevel, LevelResolver, ResolvedLine, ScanEvent, ScanState,
};
pub use line_kind::{classify, classify_with, header_marker, LineKind, MAX_HEADER_LEVEL};
pub use scheduler::{
    EditorSurface, PendingUpdate, SchedulerStats, UpdateReason, UpdateScheduler,
};
