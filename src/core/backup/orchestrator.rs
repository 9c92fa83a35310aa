//! Backup orchestrator - runs the exports for one selection
//!
//! Items are exported one at a time, in selection order. A failure on one
//! item is recorded in its [`ExportResult`] and the next item is still
//! attempted; only a shared destination that fails validation aborts the run
//! before any export starts.

use super::report::{BackupReport, ExportOutcome, ExportResult};
use super::shutdown::{ExportActivity, ShutdownHandle};
use crate::adapters::{ContentStore, Session};
use crate::core::sandbox::PathSandbox;
use crate::core::verification::digest_file;
use crate::domain::{BackupError, FailureKind, Item, Result, Selection};
use chrono::{Local, NaiveDate};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::watch;

/// Backup orchestrator
pub struct BackupOrchestrator {
    store: Arc<dyn ContentStore>,
    sandbox: PathSandbox,
    shutdown_signal: Option<watch::Receiver<bool>>,
    activity: ExportActivity,
    run_date: NaiveDate,
}

impl BackupOrchestrator {
    /// Create an orchestrator exporting through `store` into `sandbox`
    ///
    /// The run date for default naming is captured here, as today's local
    /// date.
    pub fn new(store: Arc<dyn ContentStore>, sandbox: PathSandbox) -> Self {
        Self {
            store,
            sandbox,
            shutdown_signal: None,
            activity: ExportActivity::new(),
            run_date: Local::now().date_naive(),
        }
    }

    /// Stop between items once `shutdown_signal` turns true
    pub fn with_shutdown_signal(mut self, shutdown_signal: watch::Receiver<bool>) -> Self {
        self.shutdown_signal = Some(shutdown_signal);
        self
    }

    /// Report export activity through `activity`
    pub fn with_activity(mut self, activity: ExportActivity) -> Self {
        self.activity = activity;
        self
    }

    /// Wire both halves of a [`ShutdownHandle`]
    pub fn with_shutdown(self, handle: ShutdownHandle) -> Self {
        self.with_shutdown_signal(handle.signal)
            .with_activity(handle.activity)
    }

    /// Use a fixed run date for default naming
    pub fn with_run_date(mut self, run_date: NaiveDate) -> Self {
        self.run_date = run_date;
        self
    }

    /// The sandbox destinations are resolved in
    pub fn sandbox(&self) -> &PathSandbox {
        &self.sandbox
    }

    /// Date used for default naming
    pub fn run_date(&self) -> NaiveDate {
        self.run_date
    }

    /// Check if shutdown has been requested
    fn is_shutdown_requested(&self) -> bool {
        self.shutdown_signal
            .as_ref()
            .map(|rx| *rx.borrow())
            .unwrap_or(false)
    }

    /// Export every item in `selection`
    ///
    /// With a non-blank `user_subpath` all items share that directory; it is
    /// resolved once before any export. Without one, each item gets its own
    /// default directory from the naming policy, and a resolution failure is
    /// recorded against that item only.
    ///
    /// The returned report holds one result per item, in order, whether or
    /// not the exports succeeded. An authentication failure during an export
    /// ends the run: the remaining items are reported as not attempted.
    ///
    /// # Errors
    ///
    /// Returns `PathTraversal` or `Io` if the shared destination is rejected
    /// or cannot be created. Nothing has been exported in that case.
    pub async fn run_backup(
        &self,
        session: &Session,
        selection: &Selection,
        user_subpath: Option<&str>,
    ) -> Result<BackupReport> {
        let start_time = Instant::now();
        let run_date = self.run_date;
        let mut report = BackupReport::new();

        let shared_destination = match user_subpath.map(str::trim).filter(|s| !s.is_empty()) {
            Some(subpath) => Some(self.sandbox.prepare(subpath)?),
            None => None,
        };

        tracing::info!(
            items = selection.len(),
            base = %self.sandbox.base(),
            subpath = user_subpath.unwrap_or(""),
            run_date = %run_date,
            "Starting backup"
        );

        let _exporting = self.activity.enter();
        let mut stop_reason: Option<String> = None;

        for (index, item) in selection.items().iter().enumerate() {
            if stop_reason.is_none() && self.is_shutdown_requested() {
                tracing::warn!(
                    remaining = selection.len() - index,
                    "Shutdown requested, skipping remaining items"
                );
                report.interrupted = true;
                stop_reason = Some("Backup interrupted before this item".to_string());
            }

            if let Some(reason) = &stop_reason {
                report.push(ExportResult {
                    item: item.clone(),
                    destination: None,
                    outcome: ExportOutcome::NotAttempted {
                        reason: reason.clone(),
                    },
                });
                continue;
            }

            tracing::info!(
                position = index + 1,
                total = selection.len(),
                item_id = %item.id,
                title = %item.display_name(),
                kind = %item.kind,
                "Exporting item"
            );

            let destination = match &shared_destination {
                Some(shared) => Ok(shared.clone()),
                None => self.sandbox.resolve_destination(None, item, run_date),
            };

            let result = match destination {
                Ok(destination) => self.export_one(session, item, destination).await,
                Err(e) => failed(item, None, &e),
            };

            if let ExportOutcome::Failed {
                kind: FailureKind::Authentication,
                ..
            } = result.outcome
            {
                stop_reason = Some("Session rejected by the portal".to_string());
            }

            report.push(result);
        }

        let report = report.with_duration(start_time.elapsed());
        report.log_summary();
        Ok(report)
    }

    async fn export_one(&self, session: &Session, item: &Item, destination: PathBuf) -> ExportResult {
        match self.store.export_item(session, item, &destination).await {
            Ok(package) => {
                let (size_bytes, sha256) = match digest_file(&package) {
                    Ok(digest) => (Some(digest.size_bytes), Some(digest.sha256)),
                    Err(e) => {
                        tracing::warn!(
                            item_id = %item.id,
                            package = %package.display(),
                            error = %e,
                            "Could not checksum exported package"
                        );
                        (None, None)
                    }
                };

                tracing::info!(
                    item_id = %item.id,
                    package = %package.display(),
                    size_bytes = size_bytes.unwrap_or_default(),
                    "Item exported"
                );

                ExportResult {
                    item: item.clone(),
                    destination: Some(destination),
                    outcome: ExportOutcome::Exported {
                        package,
                        size_bytes,
                        sha256,
                    },
                }
            }
            Err(e) => failed(item, Some(destination), &e),
        }
    }
}

fn failed(item: &Item, destination: Option<PathBuf>, error: &BackupError) -> ExportResult {
    tracing::error!(
        item_id = %item.id,
        title = %item.display_name(),
        error = %error,
        "Item backup failed"
    );

    ExportResult {
        item: item.clone(),
        destination,
        outcome: ExportOutcome::Failed {
            kind: error.failure_kind(),
            message: error.to_string(),
        },
    }
}
