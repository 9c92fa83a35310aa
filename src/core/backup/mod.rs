//! Backup orchestration
//!
//! [`BackupOrchestrator`] exports a [`Selection`](crate::domain::Selection)
//! item by item and returns a [`BackupReport`].

pub mod orchestrator;
pub mod report;
pub mod shutdown;

pub use orchestrator::BackupOrchestrator;
pub use report::{BackupReport, ExportOutcome, ExportResult};
pub use shutdown::{ExportActivity, InterruptAction, ShutdownHandle};
