//! Error context extension trait
//!
//! Works like `anyhow::Context` but keeps the [`BackupError`] category, so a
//! failed directory creation stays an `Io` error after context is attached.
//!
//! # Examples
//!
//! ```rust
//! use ago_backup::domain::{BackupError, Result};
//! use ago_backup::domain::context::ResultExt;
//!
//! fn read_listing(path: &str) -> Result<String> {
//!     std::fs::read_to_string(path)
//!         .with_context(|| format!("Failed to read listing {path}"))
//! }
//!
//! let err = read_listing("/nonexistent/listing.json").unwrap_err();
//! assert!(matches!(err, BackupError::Io(_)));
//! ```

use crate::domain::errors::BackupError;
use crate::domain::result::Result;

/// Extension trait for adding context to `Result` types
pub trait ResultExt<T> {
    /// Add context to an error
    fn context<C>(self, context: C) -> Result<T>
    where
        C: std::fmt::Display + Send + Sync + 'static;

    /// Add context to an error using a closure, evaluated only on error
    fn with_context<C, F>(self, f: F) -> Result<T>
    where
        C: std::fmt::Display + Send + Sync + 'static,
        F: FnOnce() -> C;
}

impl<T, E> ResultExt<T> for std::result::Result<T, E>
where
    E: Into<BackupError>,
{
    fn context<C>(self, context: C) -> Result<T>
    where
        C: std::fmt::Display + Send + Sync + 'static,
    {
        self.map_err(|e| prefix(e.into(), &context))
    }

    fn with_context<C, F>(self, f: F) -> Result<T>
    where
        C: std::fmt::Display + Send + Sync + 'static,
        F: FnOnce() -> C,
    {
        self.map_err(|e| {
            let context = f();
            prefix(e.into(), &context)
        })
    }
}

fn prefix(error: BackupError, context: &dyn std::fmt::Display) -> BackupError {
    let wrap = |message: String| format!("{context}: {message}");
    match error {
        BackupError::Configuration(m) => BackupError::Configuration(wrap(m)),
        BackupError::Authentication(m) => BackupError::Authentication(wrap(m)),
        BackupError::RemoteAccess(m) => BackupError::RemoteAccess(wrap(m)),
        BackupError::InvalidSelection(m) => BackupError::InvalidSelection(wrap(m)),
        BackupError::Io(m) => BackupError::Io(wrap(m)),
        BackupError::Export(m) => BackupError::Export(wrap(m)),
        BackupError::Serialization(m) => BackupError::Serialization(wrap(m)),
        BackupError::Prompt(m) => BackupError::Prompt(wrap(m)),
        BackupError::Cancelled(m) => BackupError::Cancelled(wrap(m)),
        // Traversal errors carry structured fields and are reported as-is
        traversal @ BackupError::PathTraversal { .. } => traversal,
    }
}
