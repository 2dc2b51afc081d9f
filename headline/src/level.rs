//! Active header level tracking.
//!
//! The resolver is a two-state machine ([`ScanState::Inactive`] and
//! [`ScanState::Active`]) driven by one [`ScanEvent`] per line:
//!
//! ```text
//!               Header(n), n accepted
//!   Inactive ---------------------------> Active(n)
//!   Active(m) --------------------------> Active(n)
//!   Active(m) -- Header(1), ignored ----> Inactive
//!   Active(m) -- 2nd consecutive Blank -> Inactive   (unless the last
//!                                                     non-blank line was
//!                                                     a list item)
//! ```
//!
//! Content lines and list items never change the state, they only feed the
//! blank-run bookkeeping. A single blank line never ends a section.

use crate::{
    blocks::{BlockStructure, MarkdownBlocks},
    config::Config,
    document::LineSource,
    line_kind::{classify_with, LineKind},
};

/// Nesting depth governing a line. `0` means no header is in effect.
pub type ActiveLevel = u8;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ScanState {
    #[default]
    Inactive,
    Active(u8),
}

impl ScanState {
    pub fn level(self) -> ActiveLevel {
        match self {
            ScanState::Inactive => 0,
            ScanState::Active(level) => level,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ScanEvent {
    Header(u8),
    Blank,
    ListItem,
    Content,
}

impl From<LineKind> for ScanEvent {
    fn from(kind: LineKind) -> Self {
        match kind {
            LineKind::Header { level, .. } => ScanEvent::Header(level),
            LineKind::Blank => ScanEvent::Blank,
            LineKind::ListItem { .. } => ScanEvent::ListItem,
            _ => ScanEvent::Content,
        }
    }
}

/// A classified line together with the level governing it.
///
/// For an accepted header line `level` is the header's own level. Ignored
/// top-level headers are reported as [`LineKind::Text`] at level 0.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ResolvedLine {
    pub kind: LineKind,
    pub level: ActiveLevel,
}

#[derive(Clone, Debug)]
pub struct LevelResolver {
    state: ScanState,
    blank_run: usize,
    after_list: bool,
    ignore_top_level_header: bool,
}

impl LevelResolver {
    /// Consecutive blank lines that end a section.
    pub const BLANK_RUN_RESET: usize = 2;

    pub fn new(config: &Config) -> Self {
        Self {
            state: ScanState::Inactive,
            blank_run: 0,
            after_list: false,
            ignore_top_level_header: config.ignore_top_level_header,
        }
    }

    pub fn state(&self) -> ScanState {
        self.state
    }

    /// Feed one event and return the state after it.
    pub fn transition(&mut self, event: ScanEvent) -> ScanState {
        match event {
            ScanEvent::Header(level) => {
                self.blank_run = 0;
                self.after_list = false;
                self.state = if self.ignore_top_level_header && level == 1 {
                    ScanState::Inactive
                } else {
                    ScanState::Active(level)
                };
            },
            ScanEvent::Blank => {
                self.blank_run += 1;
                if self.blank_run >= Self::BLANK_RUN_RESET && !self.after_list {
                    self.state = ScanState::Inactive;
                }
            },
            ScanEvent::ListItem => {
                self.blank_run = 0;
                self.after_list = true;
            },
            ScanEvent::Content => {
                self.blank_run = 0;
                self.after_list = false;
            },
        }
        self.state
    }

    /// Resolve one classified line.
    pub fn step(&mut self, kind: LineKind) -> ResolvedLine {
        let state = self.transition(ScanEvent::from(kind));
        let kind = match kind {
            LineKind::Header { level: 1, .. } if self.ignore_top_level_header => LineKind::Text,
            kind => kind,
        };
        ResolvedLine {
            kind,
            level: state.level(),
        }
    }
}

/// Resolve the governing level of every line of `source`.
pub fn resolve<S: LineSource + ?Sized>(source: &S, config: &Config) -> Vec<ResolvedLine> {
    resolve_with(source, &MarkdownBlocks::parse(source), config)
}

/// Like [`resolve`], with the block structure supplied by the caller.
pub fn resolve_with<S, B>(source: &S, blocks: &B, config: &Config) -> Vec<ResolvedLine>
where
    S: LineSource + ?Sized,
    B: BlockStructure + ?Sized,
{
    let mut resolver = LevelResolver::new(config);
    let resolved: Vec<_> = classify_with(source, blocks)
        .into_iter()
        .map(|kind| resolver.step(kind))
        .collect();

    tracing::trace!(lines = resolved.len(), "resolved header levels");
    resolved
}
