//! Console output and exit codes shared by the CLI commands

use crate::core::backup::{BackupReport, ExportOutcome};
use crate::domain::{BackupError, FailureKind};

/// All items exported
pub const EXIT_OK: i32 = 0;
/// At least one item failed or was not attempted
pub const EXIT_ITEM_FAILURES: i32 = 1;
/// Configuration, selection or destination error
pub const EXIT_USAGE: i32 = 2;
/// Credentials or session rejected
pub const EXIT_AUTH: i32 = 3;
/// Listing against the portal failed
pub const EXIT_REMOTE: i32 = 4;
/// Anything else
pub const EXIT_FATAL: i32 = 5;
/// Stopped by SIGINT/SIGTERM
pub const EXIT_INTERRUPTED: i32 = 130;

/// Exit code for an error that ended a command before or instead of a report
pub fn exit_code_for_error(error: &BackupError) -> i32 {
    match error {
        BackupError::Configuration(_)
        | BackupError::InvalidSelection(_)
        | BackupError::PathTraversal { .. } => EXIT_USAGE,
        BackupError::Authentication(_) => EXIT_AUTH,
        BackupError::RemoteAccess(_) => EXIT_REMOTE,
        BackupError::Cancelled(_) => EXIT_OK,
        BackupError::Io(_)
        | BackupError::Export(_)
        | BackupError::Serialization(_)
        | BackupError::Prompt(_) => EXIT_FATAL,
    }
}

/// Exit code for a finished run
pub fn exit_code_for_report(report: &BackupReport) -> i32 {
    if report.interrupted {
        EXIT_INTERRUPTED
    } else if report.is_successful() {
        EXIT_OK
    } else if report.results.iter().any(|r| {
        matches!(
            r.outcome,
            ExportOutcome::Failed {
                kind: FailureKind::Authentication,
                ..
            }
        )
    }) {
        EXIT_AUTH
    } else {
        EXIT_ITEM_FAILURES
    }
}

/// Print an error the way every command does before exiting
pub fn print_error(error: &BackupError) {
    match error {
        BackupError::Cancelled(message) => println!("{message}"),
        BackupError::PathTraversal { .. } => {
            eprintln!("❌ {error}");
            eprintln!("   Choose a subpath inside the backup base directory");
        }
        _ => eprintln!("❌ {error}"),
    }
}

/// Print the per-item outcome of a run followed by the totals
pub fn print_report(report: &BackupReport) {
    println!();
    println!("📊 Backup Summary:");

    for result in &report.results {
        let item = &result.item;
        match &result.outcome {
            ExportOutcome::Exported {
                package,
                size_bytes,
                ..
            } => {
                println!("  ✅ {} ({})", item.display_name(), item.kind);
                match size_bytes {
                    Some(size) => println!("     {} ({size} bytes)", package.display()),
                    None => println!("     {}", package.display()),
                }
            }
            ExportOutcome::Failed { kind, message } => {
                println!("  ❌ {} ({})", item.display_name(), item.kind);
                println!("     {kind}: {message}");
            }
            ExportOutcome::NotAttempted { reason } => {
                println!("  ⏭️  {} ({})", item.display_name(), item.kind);
                println!("     {reason}");
            }
        }
    }

    println!();
    println!("  Succeeded: {}", report.succeeded_count());
    println!("  Failed: {}", report.failed_count());
    if report.not_attempted_count() > 0 {
        println!("  Not attempted: {}", report.not_attempted_count());
    }
    println!("  Duration: {:.2}s", report.duration.as_secs_f64());
    println!();

    if report.interrupted {
        println!("⚠️  Backup interrupted. Items not attempted can be backed up in a new run.");
    } else if report.is_successful() {
        println!("✅ Backup completed successfully!");
    } else {
        println!("⚠️  Backup completed with failures");
    }
}
