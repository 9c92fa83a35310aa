//! Domain error types
//!
//! This module defines the error hierarchy for ago-backup. Every failure the
//! core can produce falls into one of the categories below; adapters translate
//! their transport errors into these before returning, so no third-party
//! error type crosses the public API.

use std::path::PathBuf;
use thiserror::Error;

/// Main ago-backup error type
#[derive(Debug, Error)]
pub enum BackupError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Bad credentials or an expired session
    #[error("Authentication error: {0}")]
    Authentication(String),

    /// Listing folders or items against the remote store failed
    #[error("Remote access error: {0}")]
    RemoteAccess(String),

    /// Selection input was empty, malformed or out of range
    #[error("Invalid selection: {0}")]
    InvalidSelection(String),

    /// A subpath resolved outside of the backup base directory
    #[error("Path traversal rejected: '{subpath}' resolves outside {}", base.display())]
    PathTraversal {
        /// The offending user-supplied subpath
        subpath: String,
        /// The base directory the path had to stay within
        base: PathBuf,
    },

    /// I/O errors (directory creation, package writes)
    #[error("I/O error: {0}")]
    Io(String),

    /// The remote export of a single item failed
    #[error("Export error: {0}")]
    Export(String),

    /// Serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Interactive prompt could not read input
    #[error("Prompt error: {0}")]
    Prompt(String),

    /// The user declined to start the run
    #[error("Cancelled: {0}")]
    Cancelled(String),
}

/// Category of a per-item failure, as shown in the backup report
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    /// Session rejected while exporting
    Authentication,
    /// Remote store unreachable or returned an error
    RemoteAccess,
    /// Destination escaped the base directory
    PathTraversal,
    /// Local disk failure
    Io,
    /// The export job itself failed
    Export,
    /// Anything else
    Other,
}

impl BackupError {
    /// Classifies the error for per-item reporting
    pub fn failure_kind(&self) -> FailureKind {
        match self {
            BackupError::Authentication(_) => FailureKind::Authentication,
            BackupError::RemoteAccess(_) => FailureKind::RemoteAccess,
            BackupError::PathTraversal { .. } => FailureKind::PathTraversal,
            BackupError::Io(_) => FailureKind::Io,
            BackupError::Export(_) => FailureKind::Export,
            _ => FailureKind::Other,
        }
    }

    /// Whether the caller should re-prompt rather than abort
    pub fn is_recoverable(&self) -> bool {
        matches!(self, BackupError::InvalidSelection(_))
    }
}

impl std::fmt::Display for FailureKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            FailureKind::Authentication => "authentication",
            FailureKind::RemoteAccess => "remote access",
            FailureKind::PathTraversal => "path traversal",
            FailureKind::Io => "i/o",
            FailureKind::Export => "export",
            FailureKind::Other => "other",
        };
        f.write_str(label)
    }
}

// Conversion from std::io::Error
impl From<std::io::Error> for BackupError {
    fn from(err: std::io::Error) -> Self {
        BackupError::Io(err.to_string())
    }
}

// Conversion from serde_json::Error
impl From<serde_json::Error> for BackupError {
    fn from(err: serde_json::Error) -> Self {
        BackupError::Serialization(err.to_string())
    }
}

// Conversion from toml parse errors
impl From<toml::de::Error> for BackupError {
    fn from(err: toml::de::Error) -> Self {
        BackupError::Configuration(format!("TOML parse error: {err}"))
    }
}
