//! Logging configuration and initialization.
//!
//! The terminal UI owns the screen, so interactive sessions log to a file in
//! the platform cache directory. One-shot conversions log to stderr.

use std::fs::{self, File, OpenOptions};
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use clap::ValueEnum;
use directories::ProjectDirs;
use thiserror::Error;
use tracing_subscriber::{fmt, EnvFilter};

/// File name of the interactive-mode log
const LOG_FILE_NAME: &str = "unitconv.log";

/// Errors that can occur while setting up logging
#[derive(Debug, Error)]
pub enum LoggingError {
    /// Log file could not be created or opened
    #[error("Failed to open log file: {0}")]
    Io(#[from] io::Error),

    /// A global subscriber was already installed or the filter was invalid
    #[error("Failed to initialize logging: {0}")]
    Init(String),
}

/// Output format for log lines
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

/// Where log lines go
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LogTarget {
    Stderr,
    File(PathBuf),
}

/// Logging configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoggingConfig {
    pub level: String,
    pub format: LogFormat,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".into(),
            format: LogFormat::Pretty,
        }
    }
}

impl LoggingConfig {
    /// Initialize the tracing subscriber with this logging configuration.
    ///
    /// `RUST_LOG` takes precedence over the configured level.
    pub fn init(&self, target: &LogTarget) -> Result<(), LoggingError> {
        let filter =
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&self.level));

        let result = match (self.format, target) {
            (LogFormat::Json, LogTarget::Stderr) => fmt()
                .json()
                .with_env_filter(filter)
                .with_writer(io::stderr)
                .try_init(),
            (LogFormat::Pretty, LogTarget::Stderr) => fmt()
                .with_env_filter(filter)
                .with_writer(io::stderr)
                .try_init(),
            (LogFormat::Json, LogTarget::File(path)) => fmt()
                .json()
                .with_env_filter(filter)
                .with_writer(Mutex::new(open_log_file(path)?))
                .try_init(),
            (LogFormat::Pretty, LogTarget::File(path)) => fmt()
                .with_env_filter(filter)
                .with_ansi(false)
                .with_writer(Mutex::new(open_log_file(path)?))
                .try_init(),
        };

        result.map_err(|e| LoggingError::Init(e.to_string()))
    }
}

/// Returns the default interactive log path
///
/// Uses `~/.cache/unitconv/unitconv.log` on Linux, or the equivalent XDG path
/// on other platforms. Returns `None` if no home directory can be determined.
pub fn default_log_path() -> Option<PathBuf> {
    let project_dirs = ProjectDirs::from("", "", "unitconv")?;
    Some(project_dirs.cache_dir().join(LOG_FILE_NAME))
}

/// Opens a log file for appending, creating parent directories as needed
pub fn open_log_file(path: &Path) -> io::Result<File> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    OpenOptions::new().create(true).append(true).open(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::TempDir;

    #[test]
    fn test_default_config() {
        let config = LoggingConfig::default();
        assert_eq!(config.level, "info");
        assert_eq!(config.format, LogFormat::Pretty);
    }

    #[test]
    fn test_open_log_file_creates_missing_directories() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let path = temp_dir.path().join("nested").join("logs").join(LOG_FILE_NAME);

        let file = open_log_file(&path).expect("Should open log file");
        drop(file);

        assert!(path.exists(), "Log file should exist");
    }

    #[test]
    fn test_open_log_file_appends() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let path = temp_dir.path().join(LOG_FILE_NAME);

        writeln!(open_log_file(&path).unwrap(), "first").unwrap();
        writeln!(open_log_file(&path).unwrap(), "second").unwrap();

        let content = fs::read_to_string(&path).unwrap();
        assert_eq!(content, "first\nsecond\n");
    }

    #[test]
    fn test_default_log_path_is_project_scoped() {
        if let Some(path) = default_log_path() {
            let path_str = path.to_string_lossy();
            assert!(path_str.contains("unitconv"));
            assert!(path_str.ends_with(LOG_FILE_NAME));
        }
        // Passes when there is no home directory (e.g. some CI sandboxes)
    }
}
