use crate::{cli::SettingsArgs, settings};
use anyhow::Result;
use std::{io::Write, path::Path};

/// Print the effective settings, persisting any requested changes first.
pub fn handle(args: &SettingsArgs, path: &Path, out: &mut impl Write) -> Result<()> {
    let current = settings::load_or_default(path)?;
    let config = args.apply(current.clone());

    if args.is_update() && config != current {
        settings::save(path, &config)?;
    }

    writeln!(out, "# {}", path.display())?;
    write!(out, "{}", toml::to_string_pretty(&config)?)?;
    Ok(())
}
