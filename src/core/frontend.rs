//! Selection front ends
//!
//! A front end turns user input into a [`Selection`] and an optional subpath,
//! and presents the final report. [`submit_selection`] is the one driver both
//! the interactive console and the identifier-list mode run through, so the
//! orchestration is never duplicated per front end.

use crate::adapters::Session;
use crate::core::backup::{BackupOrchestrator, BackupReport};
use crate::core::directory::ContentDirectory;
use crate::core::sandbox::PathSandbox;
use crate::domain::{Result, Selection};
use async_trait::async_trait;
use chrono::NaiveDate;

/// User-facing half of a backup run
#[async_trait]
pub trait SelectionFrontEnd: Send {
    /// Let the user pick the items to back up
    ///
    /// Implementations that can re-prompt should do so on
    /// `InvalidSelection`; others return it.
    async fn select_folders_and_items(
        &mut self,
        directory: &ContentDirectory,
        session: &Session,
    ) -> Result<Selection>;

    /// Optional subpath under the base; `None` uses per-item default naming
    ///
    /// `run_date` is the date default names will use, for previews.
    fn choose_subpath(
        &mut self,
        sandbox: &PathSandbox,
        selection: &Selection,
        run_date: NaiveDate,
    ) -> Result<Option<String>>;

    /// Show the outcome of the run
    fn present_report(&mut self, report: &BackupReport) -> Result<()>;
}

/// Run selection, orchestration and reporting through `front_end`
///
/// # Errors
///
/// Returns selection errors the front end does not recover from, listing
/// failures, and shared-destination errors from the orchestrator. Per-item
/// failures are part of the report, not errors.
pub async fn submit_selection<F>(
    front_end: &mut F,
    directory: &ContentDirectory,
    orchestrator: &BackupOrchestrator,
    session: &Session,
) -> Result<BackupReport>
where
    F: SelectionFrontEnd + ?Sized,
{
    let selection = front_end
        .select_folders_and_items(directory, session)
        .await?;

    tracing::info!(items = selection.len(), "Selection confirmed");

    let subpath = front_end.choose_subpath(
        orchestrator.sandbox(),
        &selection,
        orchestrator.run_date(),
    )?;

    let report = orchestrator
        .run_backup(session, &selection, subpath.as_deref())
        .await?;

    front_end.present_report(&report)?;
    Ok(report)
}
