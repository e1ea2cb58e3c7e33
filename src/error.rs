// src/error.rs

use std::path::PathBuf;

use thiserror::Error;

/// Errors surfaced by the storage and editing layers.
///
/// The scoring engine and the in-memory classification index never fail;
/// only persistence and user-supplied input can.
#[derive(Debug, Error)]
pub enum TrackerError {
    /// Reading or writing a data file failed
    #[error("I/O error on {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A data file holds JSON we cannot parse or produce
    #[error("JSON error in {path:?}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// No record exists for the requested problem id
    #[error("No record found for problem {0}")]
    NotFound(i64),

    /// A date string was not in YYYY-MM-DD form
    #[error("Invalid date '{0}', expected YYYY-MM-DD")]
    InvalidDate(String),

    /// The platform data directory could not be determined
    #[error("Failed to determine data directory")]
    NoDataDir,

    /// Migration output already holds current-format records
    #[error("{0:?} already holds current-format records, pass --force to overwrite")]
    WouldOverwrite(PathBuf),

    /// The system browser could not be launched
    #[error("Failed to open browser: {0}")]
    Browser(String),
}

impl TrackerError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        TrackerError::Io { path: path.into(), source }
    }

    pub(crate) fn json(path: impl Into<PathBuf>, source: serde_json::Error) -> Self {
        TrackerError::Json { path: path.into(), source }
    }

    /// Whether the caller can recover by correcting its input
    pub fn is_user_error(&self) -> bool {
        matches!(
            self,
            TrackerError::NotFound(_) | TrackerError::InvalidDate(_) | TrackerError::WouldOverwrite(_)
        )
    }
}

pub type Result<T> = std::result::Result<T, TrackerError>;
