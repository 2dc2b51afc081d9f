use clap::{Args, Parser, Subcommand};
use headline::Config;
use std::{num::NonZeroU32, ops::Range, path::PathBuf};

/// Preview header-indented text documents in the terminal
#[derive(Debug, Parser)]
#[command(name = "headline", author, version, about, long_about = None)]
pub struct Cli {
    /// Settings file. Defaults to `<config_dir>/headline/config.toml`
    #[arg(long, global = true, env = "HEADLINE_CONFIG")]
    pub config: Option<PathBuf>,

    /// Log file, or a directory to place the log file in
    #[arg(long, global = true)]
    pub log_file: Option<PathBuf>,

    /// Subcommand to run
    #[command(subcommand)]
    pub command: Command,
}

/// Available CLI commands
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Print the document with bullets and indentation applied
    Render(TargetArgs),

    /// Print the computed annotations as JSON
    Annotations {
        #[command(flatten)]
        target: TargetArgs,

        /// Pretty-print the JSON
        #[arg(long)]
        pretty: bool,
    },

    /// Re-render the document whenever it changes on disk
    Watch(TargetArgs),

    /// Show or update the persisted settings
    Settings(SettingsArgs),
}

#[derive(Debug, Clone, Args)]
pub struct TargetArgs {
    /// Document to read
    pub file: PathBuf,

    /// Indent unit for this run, overriding the settings file
    #[arg(long)]
    pub indent_unit: Option<NonZeroU32>,

    /// Treat `#` headers as sections for this run
    #[arg(long)]
    pub include_top_level: bool,

    /// Only decorate lines in `START..END` (zero-based, end exclusive)
    #[arg(long, value_parser = parse_line_range)]
    pub lines: Option<Range<usize>>,
}

impl TargetArgs {
    /// Apply per-run overrides on top of the persisted settings.
    pub fn apply(&self, mut config: Config) -> Config {
        if let Some(unit) = self.indent_unit {
            config = config.with_indent_unit(unit);
        }
        if self.include_top_level {
            config = config.with_ignore_top_level_header(false);
        }
        config
    }
}

#[derive(Debug, Clone, Args)]
pub struct SettingsArgs {
    /// Persist whether `#` headers are ignored
    #[arg(long)]
    pub ignore_top_level_header: Option<bool>,

    /// Persist the indent unit
    #[arg(long)]
    pub indent_unit: Option<NonZeroU32>,
}

impl SettingsArgs {
    pub fn is_update(&self) -> bool {
        self.ignore_top_level_header.is_some() || self.indent_unit.is_some()
    }

    pub fn apply(&self, mut config: Config) -> Config {
        if let Some(ignore) = self.ignore_top_level_header {
            config = config.with_ignore_top_level_header(ignore);
        }
        if let Some(unit) = self.indent_unit {
            config = config.with_indent_unit(unit);
        }
        config
    }
}

fn parse_line_range(value: &str) -> Result<Range<usize>, String> {
    let (start, end) = value
        .split_once("..")
        .ok_or_else(|| format!("expected START..END, got `{value}`"))?;
    let parse = |part: &str| {
        part.trim()
            .parse::<usize>()
            .map_err(|err| format!("invalid line number `{part}`: {err}"))
    };
    let range = parse(start)?..parse(end)?;
    if range.start > range.end {
        return Err(format!("range start {} is past its end {}", range.start, range.end));
    }
    Ok(range)
}
