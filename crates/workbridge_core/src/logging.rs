//! Rolling file logs for the core library.
//!
//! # Invariants
//! - The logger starts at most once per process; repeating the same
//!   settings is a no-op, different settings are rejected.
//! - Log lines carry metadata only (`event=… module=… status=…`). Team
//!   secrets, meeting scripts and request bodies never reach a log line.
//! - The HTTP stack is capped at `warn` regardless of the chosen level.

use crate::config::LoggingConfig;
use flexi_logger::{
    Cleanup, Criterion, FileSpec, LogSpecification, Logger, LoggerHandle, Naming, WriteMode,
};
use log::{error, info, LevelFilter};
use once_cell::sync::OnceCell;
use std::path::{Path, PathBuf};
use thiserror::Error;

const LOG_FILE_BASENAME: &str = "workbridge";
const ROTATE_AT_BYTES: u64 = 8 * 1024 * 1024;
const KEEP_ROTATED_FILES: usize = 4;
const PANIC_SUMMARY_CHARS: usize = 200;
const QUIET_MODULES: [&str; 3] = ["reqwest", "hyper", "hyper_util"];

static ACTIVE: OnceCell<ActiveLogger> = OnceCell::new();
static PANIC_HOOK: OnceCell<()> = OnceCell::new();

struct ActiveLogger {
    level: LevelFilter,
    dir: PathBuf,
    _handle: LoggerHandle,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LoggingError {
    #[error("unsupported log level `{0}`; expected trace|debug|info|warn|error|off")]
    UnsupportedLevel(String),
    #[error("log directory must be an absolute path, got `{0}`")]
    InvalidDirectory(String),
    #[error("logging already running with {current}; cannot switch to {requested}")]
    Conflict { current: String, requested: String },
    #[error("could not start file logger: {0}")]
    Backend(String),
}

/// Starts file logging at `level` under `log_dir`.
///
/// # Errors
/// - `UnsupportedLevel` or `InvalidDirectory` for bad input.
/// - `Conflict` when logging already runs with other settings.
/// - `Backend` when the directory or the logger cannot be set up.
pub fn init_logging(level: &str, log_dir: &Path) -> Result<(), LoggingError> {
    let level = parse_level(level)?;
    if !log_dir.is_absolute() || log_dir.as_os_str().is_empty() {
        return Err(LoggingError::InvalidDirectory(
            log_dir.to_string_lossy().into_owned(),
        ));
    }

    let active = ACTIVE.get_or_try_init(|| start_logger(level, log_dir))?;
    if active.dir != log_dir {
        return Err(LoggingError::Conflict {
            current: format!("directory `{}`", active.dir.display()),
            requested: format!("`{}`", log_dir.display()),
        });
    }
    if active.level != level {
        return Err(LoggingError::Conflict {
            current: format!("level `{}`", level_name(active.level)),
            requested: format!("`{}`", level_name(level)),
        });
    }
    Ok(())
}

/// Starts logging from the `[logging]` config section.
///
/// Returns `false` without touching the logger when no directory is set.
pub fn init_from_config(config: &LoggingConfig) -> Result<bool, LoggingError> {
    match config.dir.as_deref() {
        Some(dir) => init_logging(&config.level, dir).map(|()| true),
        None => Ok(false),
    }
}

/// Active `(level, directory)`, if logging was started.
pub fn logging_status() -> Option<(&'static str, PathBuf)> {
    ACTIVE
        .get()
        .map(|active| (level_name(active.level), active.dir.clone()))
}

pub fn default_log_level() -> &'static str {
    if cfg!(debug_assertions) {
        "debug"
    } else {
        "info"
    }
}

/// Flattens `value` to one line of at most `max_chars` characters.
pub(crate) fn one_line(value: &str, max_chars: usize) -> String {
    let flat = value.replace(['\n', '\r'], " ");
    let mut out: String = flat.chars().take(max_chars).collect();
    if flat.chars().count() > max_chars {
        out.push_str("...");
    }
    out
}

fn start_logger(level: LevelFilter, dir: &Path) -> Result<ActiveLogger, LoggingError> {
    std::fs::create_dir_all(dir).map_err(|err| {
        LoggingError::Backend(format!("cannot create `{}`: {err}", dir.display()))
    })?;

    let mut spec = LogSpecification::builder();
    spec.default(level);
    for module in QUIET_MODULES {
        spec.module(module, level.min(LevelFilter::Warn));
    }

    let handle = Logger::with(spec.build())
        .log_to_file(FileSpec::default().directory(dir).basename(LOG_FILE_BASENAME))
        .rotate(
            Criterion::Size(ROTATE_AT_BYTES),
            Naming::Numbers,
            Cleanup::KeepLogFiles(KEEP_ROTATED_FILES),
        )
        .write_mode(WriteMode::BufferAndFlush)
        .append()
        .format_for_files(flexi_logger::detailed_format)
        .start()
        .map_err(|err| LoggingError::Backend(err.to_string()))?;

    install_panic_hook();
    info!(
        "event=logging_init module=logging status=ok level={} version={} os={}",
        level_name(level),
        env!("CARGO_PKG_VERSION"),
        std::env::consts::OS
    );

    Ok(ActiveLogger {
        level,
        dir: dir.to_path_buf(),
        _handle: handle,
    })
}

fn parse_level(value: &str) -> Result<LevelFilter, LoggingError> {
    let lowered = value.trim().to_ascii_lowercase();
    let canonical = if lowered == "warning" { "warn" } else { lowered.as_str() };
    canonical
        .parse::<LevelFilter>()
        .map_err(|_| LoggingError::UnsupportedLevel(lowered.clone()))
}

fn level_name(level: LevelFilter) -> &'static str {
    match level {
        LevelFilter::Off => "off",
        LevelFilter::Error => "error",
        LevelFilter::Warn => "warn",
        LevelFilter::Info => "info",
        LevelFilter::Debug => "debug",
        LevelFilter::Trace => "trace",
    }
}

fn install_panic_hook() {
    if PANIC_HOOK.set(()).is_err() {
        return;
    }

    let previous = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic_info| {
        let location = panic_info
            .location()
            .map_or_else(|| "unknown".to_string(), |loc| format!("{}:{}", loc.file(), loc.line()));
        let payload = panic_info
            .payload()
            .downcast_ref::<&str>()
            .map(|message| (*message).to_string())
            .or_else(|| panic_info.payload().downcast_ref::<String>().cloned())
            .unwrap_or_else(|| "non-string panic payload".to_string());
        error!(
            "event=panic module=logging status=error location={location} payload=\"{}\"",
            one_line(&payload, PANIC_SUMMARY_CHARS)
        );
        previous(panic_info);
    }));
}

#[cfg(test)]
mod tests {
    use super::{
        init_from_config, init_logging, logging_status, one_line, parse_level, LoggingError,
    };
    use crate::config::LoggingConfig;
    use log::LevelFilter;
    use std::path::Path;

    #[test]
    fn levels_are_case_insensitive_and_accept_warning() {
        assert_eq!(parse_level(" INFO ").unwrap(), LevelFilter::Info);
        assert_eq!(parse_level("warning").unwrap(), LevelFilter::Warn);
        assert!(matches!(
            parse_level("loud"),
            Err(LoggingError::UnsupportedLevel(_))
        ));
    }

    #[test]
    fn relative_directory_is_rejected() {
        let err = init_logging("info", Path::new("logs/dev")).unwrap_err();
        assert!(matches!(err, LoggingError::InvalidDirectory(_)));
    }

    #[test]
    fn one_line_flattens_and_truncates() {
        assert_eq!(one_line("a\nb\rc", 10), "a b c");
        assert_eq!(one_line("abcdef", 3), "abc...");
    }

    #[test]
    fn config_without_directory_leaves_logging_off() {
        let config = LoggingConfig {
            level: "info".to_string(),
            dir: None,
        };
        assert!(!init_from_config(&config).unwrap());
    }

    #[test]
    fn repeated_init_is_idempotent_and_conflicts_are_rejected() {
        let log_dir = tempfile::tempdir().unwrap();
        let other_dir = tempfile::tempdir().unwrap();

        init_logging("info", log_dir.path()).expect("first init should succeed");
        init_logging("INFO", log_dir.path()).expect("same settings should be a no-op");

        let level_err = init_logging("debug", log_dir.path()).unwrap_err();
        assert!(matches!(level_err, LoggingError::Conflict { .. }));
        let dir_err = init_logging("info", other_dir.path()).unwrap_err();
        assert!(matches!(dir_err, LoggingError::Conflict { .. }));

        let (level, dir) = logging_status().expect("logging should be active");
        assert_eq!(level, "info");
        assert_eq!(dir, log_dir.path());
    }
}
