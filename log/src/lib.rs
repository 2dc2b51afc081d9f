//! Logging setup for headline with file output and optional console output.
//!
//! Logs always go to a file at `warn` level (or whatever `HEADLINE_LOG` /
//! `RUST_LOG` ask for). Console logging goes to stderr, keeping stdout free
//! for rendered documents, and is enabled when either variable is set or in
//! debug builds.
//!
//! ## Environment Variables
//!
//! 1. **`HEADLINE_LOG`** (highest priority) - a bare level such as `debug`
//!    applies to every headline crate; full directive syntax is used as-is
//! 2. **`RUST_LOG`** - standard tracing environment variable
//! 3. **Default** - `warn` globally, `info` for headline crates
//!
//! ## Log File Location
//!
//! Default: `<data_local_dir>/headline/logs/headline-<pid>.log`
//! - macOS: `~/Library/Application Support/headline/logs/headline-12345.log`
//! - Linux: `~/.local/share/headline/logs/headline-12345.log`
//!
//! Override with `--log-file <path>` or `HEADLINE_LOG_FILE`.

use std::{
    env,
    path::{Path, PathBuf},
};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{
    fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer, Registry,
};

type BoxError = Box<dyn std::error::Error + Send + Sync>;

const LOG_ENV: &str = "HEADLINE_LOG";
const LOG_FILE_ENV: &str = "HEADLINE_LOG_FILE";

/// Targets that a bare `HEADLINE_LOG=<level>` applies to.
const CRATES: &[&str] = &["headline", "headline_bin", "headline_log"];

/// Returned from [`init`]; must be held alive to ensure log file flushing.
pub struct LogGuard {
    _file_guard: WorkerGuard,
    pub log_file: PathBuf,
}

#[derive(Debug, Default)]
pub struct LogConfig {
    pub log_file_path: Option<PathBuf>,
}

/// Initialize logging.
///
/// The returned [`LogGuard`] must be held for the lifetime of the program --
/// dropping it flushes and stops the background file writer.
pub fn init(config: LogConfig) -> Result<LogGuard, BoxError> {
    let override_path = config
        .log_file_path
        .or_else(|| env::var_os(LOG_FILE_ENV).map(PathBuf::from));
    let (log_dir, filename) = resolve_log_path(override_path);

    std::fs::create_dir_all(&log_dir)?;

    let file_appender = tracing_appender::rolling::never(&log_dir, &filename);
    let (non_blocking_file, file_guard) = tracing_appender::non_blocking(file_appender);

    let file_layer = fmt::layer()
        .with_writer(non_blocking_file)
        .with_ansi(false)
        .with_filter(create_file_filter()?);

    let console_layer = if user_filter_set() || cfg!(debug_assertions) {
        Some(
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_filter(create_filter()?),
        )
    } else {
        None
    };

    Registry::default()
        .with(file_layer)
        .with(console_layer)
        .try_init()?;

    Ok(LogGuard {
        _file_guard: file_guard,
        log_file: log_dir.join(filename),
    })
}

/// Initialize logging for tests.
///
/// Console-only, and safe to call from every test: repeated or competing
/// initialization is ignored.
pub fn test() {
    let _ = test_init();
}

fn test_init() -> Result<(), BoxError> {
    let filter = create_filter()?;
    fmt().with_env_filter(filter).with_test_writer().try_init()?;
    Ok(())
}

fn user_filter_set() -> bool {
    env::var(LOG_ENV).is_ok() || env::var("RUST_LOG").is_ok()
}

/// Split an override into directory and file name.
///
/// A path with an extension names the log file itself; anything else is a
/// directory that receives the default per-process file name.
fn resolve_log_path(override_path: Option<PathBuf>) -> (PathBuf, String) {
    let filename = format!("headline-{}.log", std::process::id());

    if let Some(path) = override_path {
        if path.extension().is_some() {
            let dir = path.parent().unwrap_or_else(|| Path::new(".")).to_path_buf();
            let name = path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or(filename);
            return (dir, name);
        }
        return (path, filename);
    }

    let dir = dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("headline")
        .join("logs");

    (dir, filename)
}

/// File filter: uses the user-specified filter if set, otherwise `warn`.
fn create_file_filter() -> Result<EnvFilter, BoxError> {
    if user_filter_set() {
        return create_filter();
    }
    Ok(EnvFilter::new("warn"))
}

/// Build the [`EnvFilter`]: `HEADLINE_LOG` > `RUST_LOG` > defaults.
fn create_filter() -> Result<EnvFilter, BoxError> {
    if let Ok(value) = env::var(LOG_ENV) {
        return Ok(EnvFilter::try_new(expand_directives(&value))?);
    }

    if let Ok(rust_log) = env::var("RUST_LOG") {
        return Ok(EnvFilter::try_new(rust_log)?);
    }

    Ok(EnvFilter::new(expand_directives("info")))
}

/// Expand a `HEADLINE_LOG` value into a directive string.
///
/// - `debug` becomes `warn,headline=debug,headline_bin=debug,...`
/// - anything containing `=`, `:` or `,` is passed through untouched
fn expand_directives(value: &str) -> String {
    if value.contains('=') || value.contains(':') || value.contains(',') {
        return value.to_string();
    }

    let mut directives = String::from("warn");
    for name in CRATES {
        directives.push_str(&format!(",{name}={value}"));
    }
    directives
}
