//! Settings persistence for the terminal host.
//!
//! Settings are a TOML rendition of [`headline::Config`] stored at
//! `<config_dir>/headline/config.toml`, or wherever `--config` points.
//!
//! # Resolution
//!
//! 1. `--config <path>`: must exist and parse
//! 2. the default settings file: used when present, defaults otherwise
//! 3. built-in defaults
//!
//! Keys missing from a file keep their default values.

use headline::Config;
use std::{
    fs, io,
    path::{Path, PathBuf},
};
use thiserror::Error;

pub const SETTINGS_FILE: &str = "config.toml";

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("Failed to read settings file: {}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Failed to parse settings file: {}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("Failed to serialize settings")]
    Serialize(#[from] toml::ser::Error),

    #[error("Failed to write settings file: {}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Default settings location, if the platform has a config directory.
pub fn default_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("headline").join(SETTINGS_FILE))
}

/// Read and deserialize the settings file at `path`.
pub fn load(path: &Path) -> Result<Config, SettingsError> {
    let contents = fs::read_to_string(path).map_err(|source| SettingsError::Read {
        path: path.to_path_buf(),
        source,
    })?;

    toml::from_str(&contents).map_err(|source| SettingsError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

/// Like [`load`], but a missing file yields the defaults.
pub fn load_or_default(path: &Path) -> Result<Config, SettingsError> {
    match load(path) {
        Err(SettingsError::Read { source, .. }) if source.kind() == io::ErrorKind::NotFound => {
            tracing::debug!(path = %path.display(), "no settings file, using defaults");
            Ok(Config::default())
        },
        result => result,
    }
}

/// Resolve settings with priority: CLI override > default file > defaults.
pub fn load_with_overrides(
    cli_override: Option<&Path>,
    default_file: Option<&Path>,
) -> Result<Config, SettingsError> {
    if let Some(path) = cli_override {
        return load(path);
    }
    if let Some(path) = default_file {
        return load_or_default(path);
    }
    Ok(Config::default())
}

/// Write `config` to `path`, creating parent directories as needed.
pub fn save(path: &Path, config: &Config) -> Result<(), SettingsError> {
    let write_error = |source| SettingsError::Write {
        path: path.to_path_buf(),
        source,
    };

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(write_error)?;
    }
    let contents = toml::to_string_pretty(config)?;
    fs::write(path, contents).map_err(write_error)?;

    tracing::info!(path = %path.display(), "saved settings");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::num::NonZeroU32;
    use tempfile::tempdir;

    #[test]
    fn loads_empty_settings_as_defaults() {
        let tmp_dir = tempdir().unwrap();
        let path = tmp_dir.path().join(SETTINGS_FILE);
        fs::write(&path, "").unwrap();

        assert_eq!(load(&path).unwrap(), Config::default());
    }

    #[test]
    fn partial_settings_merge_with_defaults() {
        let tmp_dir = tempdir().unwrap();
        let path = tmp_dir.path().join(SETTINGS_FILE);
        fs::write(&path, "# comment\nignore_top_level_header = false\n").unwrap();

        let config = load(&path).unwrap();
        assert!(!config.ignore_top_level_header);
        assert_eq!(config.indent_unit.get(), 2);
    }

    #[test]
    fn errors_on_invalid_toml() {
        let tmp_dir = tempdir().unwrap();
        let path = tmp_dir.path().join(SETTINGS_FILE);
        fs::write(&path, "invalid toml {{{{").unwrap();

        let err = load(&path).unwrap_err();
        assert!(matches!(err, SettingsError::Parse { .. }));
        assert!(err.to_string().contains("Failed to parse"));
    }

    #[test]
    fn errors_on_zero_indent_unit() {
        let tmp_dir = tempdir().unwrap();
        let path = tmp_dir.path().join(SETTINGS_FILE);
        fs::write(&path, "indent_unit = 0").unwrap();

        assert!(matches!(load(&path), Err(SettingsError::Parse { .. })));
    }

    #[test]
    fn missing_file_is_an_error_for_load_but_not_for_load_or_default() {
        let tmp_dir = tempdir().unwrap();
        let path = tmp_dir.path().join("nonexistent.toml");

        let err = load(&path).unwrap_err();
        assert!(err.to_string().contains("Failed to read"));
        assert_eq!(load_or_default(&path).unwrap(), Config::default());
    }

    #[test]
    fn cli_override_takes_priority() {
        let tmp_dir = tempdir().unwrap();
        let cli_path = tmp_dir.path().join("cli.toml");
        let default_path = tmp_dir.path().join("default.toml");
        fs::write(&cli_path, "indent_unit = 4").unwrap();
        fs::write(&default_path, "indent_unit = 8").unwrap();

        let config = load_with_overrides(Some(&cli_path), Some(&default_path)).unwrap();
        assert_eq!(config.indent_unit.get(), 4);
    }

    #[test]
    fn missing_cli_override_is_an_error() {
        let tmp_dir = tempdir().unwrap();
        let missing = tmp_dir.path().join("nonexistent.toml");

        assert!(load_with_overrides(Some(&missing), None).is_err());
    }

    #[test]
    fn missing_default_file_falls_back_to_defaults() {
        let tmp_dir = tempdir().unwrap();
        let missing = tmp_dir.path().join("nonexistent.toml");

        let config = load_with_overrides(None, Some(&missing)).unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(load_with_overrides(None, None).unwrap(), Config::default());
    }

    #[test]
    fn save_then_load_preserves_values() {
        let tmp_dir = tempdir().unwrap();
        let path = tmp_dir.path().join("nested").join(SETTINGS_FILE);
        let config = Config::default()
            .with_ignore_top_level_header(false)
            .with_indent_unit(NonZeroU32::new(3).unwrap());

        save(&path, &config).unwrap();
        assert_eq!(load(&path).unwrap(), config);
    }
}
