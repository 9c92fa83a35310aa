//! Interrupt handling for backup runs
//!
//! A signal handler and the orchestrator share a [`ShutdownHandle`]. While a
//! run is exporting items an interrupt only asks it to stop after the current
//! item; at any other time (prompts, sign-in, listing) the process should end
//! at once, as it would without a handler installed.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::watch;

/// What a signal handler should do with an interrupt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InterruptAction {
    /// No export is running; end the process
    ExitNow,
    /// Let the current item finish, then stop the run
    FinishCurrentItem,
}

/// Flag that is set while a run is inside its export loop
#[derive(Debug, Clone, Default)]
pub struct ExportActivity(Arc<AtomicBool>);

impl ExportActivity {
    /// Create an idle flag
    pub fn new() -> Self {
        Self::default()
    }

    /// True while items are being exported
    pub fn is_exporting(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }

    /// Mark the export loop as running until the guard drops
    pub(crate) fn enter(&self) -> ExportingGuard<'_> {
        self.0.store(true, Ordering::SeqCst);
        ExportingGuard(&self.0)
    }
}

/// Clears the activity flag on drop, including early returns
pub(crate) struct ExportingGuard<'a>(&'a AtomicBool);

impl Drop for ExportingGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::SeqCst);
    }
}

/// Shutdown request plus export activity, as seen by a backup run
#[derive(Debug, Clone)]
pub struct ShutdownHandle {
    /// Turns true once graceful shutdown is requested
    pub signal: watch::Receiver<bool>,
    /// Set while exports are running
    pub activity: ExportActivity,
}

impl ShutdownHandle {
    /// Create a handle and the sender that requests shutdown
    pub fn channel() -> (watch::Sender<bool>, Self) {
        let (tx, rx) = watch::channel(false);
        (
            tx,
            Self {
                signal: rx,
                activity: ExportActivity::new(),
            },
        )
    }

    /// Decide how to handle an interrupt right now
    pub fn interrupt_action(&self) -> InterruptAction {
        if self.activity.is_exporting() {
            InterruptAction::FinishCurrentItem
        } else {
            InterruptAction::ExitNow
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_idle_interrupt_exits_now() {
        let (_tx, handle) = ShutdownHandle::channel();
        assert_eq!(handle.interrupt_action(), InterruptAction::ExitNow);
    }

    #[test]
    fn test_interrupt_while_exporting_finishes_item() {
        let (_tx, handle) = ShutdownHandle::channel();
        let observer = handle.clone();

        {
            let _guard = handle.activity.enter();
            assert!(observer.activity.is_exporting());
            assert_eq!(
                observer.interrupt_action(),
                InterruptAction::FinishCurrentItem
            );
        }

        assert!(!observer.activity.is_exporting());
        assert_eq!(observer.interrupt_action(), InterruptAction::ExitNow);
    }
}
