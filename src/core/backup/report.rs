//! Backup results and reporting
//!
//! One [`ExportResult`] per selected item, in selection order, collected into
//! a [`BackupReport`] that distinguishes succeeded, failed and not-attempted
//! items.

use crate::domain::{FailureKind, Item};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// What happened to one item
#[derive(Debug, Clone, PartialEq)]
pub enum ExportOutcome {
    /// Package written
    Exported {
        /// Absolute path of the package
        package: PathBuf,
        /// Package size, if it could be read back
        size_bytes: Option<u64>,
        /// Hex SHA-256 of the package, if it could be read back
        sha256: Option<String>,
    },

    /// Destination or export failed
    Failed {
        /// Failure category
        kind: FailureKind,
        /// Error message
        message: String,
    },

    /// The run stopped before this item was reached
    NotAttempted {
        /// Why the item was skipped
        reason: String,
    },
}

/// Outcome of exporting a single item
#[derive(Debug, Clone)]
pub struct ExportResult {
    /// The selected item
    pub item: Item,

    /// Resolved destination directory, if resolution got that far
    pub destination: Option<PathBuf>,

    /// Outcome
    pub outcome: ExportOutcome,
}

impl ExportResult {
    /// Whether the item was exported
    pub fn succeeded(&self) -> bool {
        matches!(self.outcome, ExportOutcome::Exported { .. })
    }

    /// Whether the item was attempted and failed
    pub fn failed(&self) -> bool {
        matches!(self.outcome, ExportOutcome::Failed { .. })
    }

    /// Package path for exported items
    pub fn package(&self) -> Option<&Path> {
        match &self.outcome {
            ExportOutcome::Exported { package, .. } => Some(package),
            _ => None,
        }
    }
}

/// Report of a backup run
#[derive(Debug, Clone, Default)]
pub struct BackupReport {
    /// Per-item results in selection order
    pub results: Vec<ExportResult>,

    /// Wall time of the run
    pub duration: Duration,

    /// Whether a shutdown signal stopped the run early
    pub interrupted: bool,
}

impl BackupReport {
    /// Create an empty report
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the duration
    pub fn with_duration(mut self, duration: Duration) -> Self {
        self.duration = duration;
        self
    }

    /// Append a result
    pub fn push(&mut self, result: ExportResult) {
        self.results.push(result);
    }

    /// Number of exported items
    pub fn succeeded_count(&self) -> usize {
        self.results.iter().filter(|r| r.succeeded()).count()
    }

    /// Number of failed items
    pub fn failed_count(&self) -> usize {
        self.results.iter().filter(|r| r.failed()).count()
    }

    /// Number of items never attempted
    pub fn not_attempted_count(&self) -> usize {
        self.results
            .iter()
            .filter(|r| matches!(r.outcome, ExportOutcome::NotAttempted { .. }))
            .count()
    }

    /// Every item was exported
    pub fn is_successful(&self) -> bool {
        !self.interrupted && self.results.iter().all(ExportResult::succeeded)
    }

    /// Log the summary
    pub fn log_summary(&self) {
        tracing::info!(
            total = self.results.len(),
            succeeded = self.succeeded_count(),
            failed = self.failed_count(),
            not_attempted = self.not_attempted_count(),
            interrupted = self.interrupted,
            duration_secs = self.duration.as_secs(),
            "Backup completed"
        );

        for result in &self.results {
            match &result.outcome {
                ExportOutcome::Exported { package, .. } => tracing::debug!(
                    item_id = %result.item.id,
                    package = %package.display(),
                    "Item exported"
                ),
                ExportOutcome::Failed { kind, message } => tracing::warn!(
                    item_id = %result.item.id,
                    title = %result.item.display_name(),
                    kind = %kind,
                    message = %message,
                    "Item failed"
                ),
                ExportOutcome::NotAttempted { reason } => tracing::warn!(
                    item_id = %result.item.id,
                    reason = %reason,
                    "Item not attempted"
                ),
            }
        }
    }
}
