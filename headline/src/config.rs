//! Indentation settings handed to every recomputation.
//!
//! The core never loads or stores settings. Hosts deserialize [`Config`]
//! from wherever they persist it (missing keys fall back to defaults) and
//! pass it in per call.

use serde::{Deserialize, Serialize};
use std::num::NonZeroU32;

const DEFAULT_INDENT_UNIT: NonZeroU32 = match NonZeroU32::new(2) {
    Some(unit) => unit,
    None => unreachable!(),
};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// When set, level-1 headers neither establish an indentation level nor
    /// have their hash marker replaced. Documents commonly use a single `#`
    /// line as a title.
    pub ignore_top_level_header: bool,

    /// Visual width, in columns, of one nesting level.
    pub indent_unit: NonZeroU32,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            ignore_top_level_header: true,
            indent_unit: DEFAULT_INDENT_UNIT,
        }
    }
}

impl Config {
    pub fn with_ignore_top_level_header(mut self, ignore: bool) -> Self {
        self.ignore_top_level_header = ignore;
        self
    }

    pub fn with_indent_unit(mut self, unit: NonZeroU32) -> Self {
        self.indent_unit = unit;
        self
    }

    /// Padding, in columns, for `levels` nesting levels.
    pub fn indent(&self, levels: u8) -> u32 {
        u32::from(levels).saturating_mul(self.indent_unit.get())
    }

    /// Whether a header at `level` is skipped under this configuration.
    pub fn ignores(&self, level: u8) -> bool {
        self.ignore_top_level_header && level == 1
    }
}
