//! Terminal host for `headline`.
//!
//! Wires the core crate to a file on disk: [`surface::FileSurface`] plays the
//! role of the editor surface, [`preview`] stands in for the display layer and
//! [`settings`] persists the [`headline::Config`].

pub mod cli;
pub mod commands;
pub mod preview;
pub mod settings;
pub mod surface;
pub mod watcher;

use anyhow::{Context, Result};
use cli::{Cli, Command};
use headline::Config;
use std::io;

/// Run a parsed command line against stdout.
pub fn run(cli: Cli) -> Result<()> {
    let default_path = settings::default_path();
    let load_config = || -> Result<Config> {
        let config =
            settings::load_with_overrides(cli.config.as_deref(), default_path.as_deref())?;
        tracing::debug!(?config, "loaded settings");
        Ok(config)
    };
    let mut stdout = io::stdout();

    match &cli.command {
        Command::Render(target) => commands::render::handle(target, load_config()?, &mut stdout),
        Command::Annotations { target, pretty } => {
            commands::annotations::handle(target, load_config()?, *pretty, &mut stdout)
        },
        Command::Watch(target) => {
            let settings_path = cli.config.as_deref().or(default_path.as_deref());
            commands::watch::handle(target, settings_path, load_config()?)
        },
        Command::Settings(args) => {
            let path = cli
                .config
                .as_deref()
                .or(default_path.as_deref())
                .context("No config directory found, pass --config")?;
            commands::settings::handle(args, path, &mut stdout)
        },
    }
}
