//! File-backed `tracing` setup.
//!
//! The terminal belongs to the TUI, so log lines go to a plain-text file.
//! Initialization happens at most once per process; calling again with the
//! same file is a no-op.

use std::fs::{self, OpenOptions};
use std::path::{Path, PathBuf};
use std::sync::{Mutex, OnceLock};

use thiserror::Error;
use tracing::info;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

static LOG_FILE: OnceLock<PathBuf> = OnceLock::new();

#[derive(Debug, Error)]
pub enum LoggingError {
    #[error("failed to open log file {}: {source}", .path.display())]
    Open {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("invalid log filter `{filter}`: {source}")]
    Filter {
        filter: String,
        source: tracing_subscriber::filter::ParseError,
    },

    #[error("logging already initialized at {}", .0.display())]
    AlreadyInitialized(PathBuf),

    #[error("failed to install subscriber: {0}")]
    Install(#[from] tracing_subscriber::util::TryInitError),
}

pub fn init(log_file: &Path, filter: &str) -> Result<(), LoggingError> {
    let env_filter = EnvFilter::try_new(filter).map_err(|source| LoggingError::Filter {
        filter: filter.to_string(),
        source,
    })?;

    if let Some(active) = LOG_FILE.get() {
        if active == log_file {
            return Ok(());
        }
        return Err(LoggingError::AlreadyInitialized(active.clone()));
    }
    let file = open_append(log_file)?;

    tracing_subscriber::registry()
        .with(env_filter)
        .with(
            fmt::layer()
                .with_ansi(false)
                .with_target(true)
                .with_writer(Mutex::new(file)),
        )
        .try_init()?;
    let _ = LOG_FILE.set(log_file.to_path_buf());

    info!(
        version = env!("CARGO_PKG_VERSION"),
        log_file = %log_file.display(),
        filter,
        "logging started"
    );
    Ok(())
}

fn open_append(path: &Path) -> Result<fs::File, LoggingError> {
    let open_err = |source| LoggingError::Open {
        path: path.to_path_buf(),
        source,
    };
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(open_err)?;
    }
    OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .map_err(open_err)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_bad_filter_before_touching_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("logs").join("bad.log");
        let err = init(&path, "event_calendar=loudest").unwrap_err();
        assert!(matches!(err, LoggingError::Filter { .. }));
        assert!(!path.exists());
    }

    #[test]
    fn init_is_idempotent_for_same_file_and_rejects_another() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("logs").join("app.log");

        init(&path, "debug").unwrap();
        init(&path, "debug").unwrap();
        assert!(path.exists());

        let other = dir.path().join("other.log");
        let err = init(&other, "debug").unwrap_err();
        assert!(matches!(err, LoggingError::AlreadyInitialized(_)));
    }
}
