//! Backup command implementation
//!
//! This module implements the `backup` command: browse folders, pick items by
//! number and export them.

use super::session::start_runtime;
use crate::cli::console::ConsoleFrontEnd;
use crate::config::BackupConfig;
use crate::core::backup::ShutdownHandle;
use clap::Args;

/// Arguments for the backup command
#[derive(Args, Debug)]
pub struct BackupArgs {
    /// Subpath under the backup base shared by all items (skips the prompt)
    #[arg(short, long)]
    pub subpath: Option<String>,

    /// Skip confirmation prompt
    #[arg(short, long)]
    pub yes: bool,
}

impl BackupArgs {
    /// Execute the backup command
    pub async fn execute(
        &self,
        config: &BackupConfig,
        shutdown: ShutdownHandle,
    ) -> anyhow::Result<i32> {
        tracing::info!(
            base_path = %config.backup.base_path,
            portal = %config.portal.url,
            "Starting interactive backup"
        );

        println!("💾 ago-backup");
        println!();

        let runtime = match start_runtime(config, shutdown).await {
            Ok(runtime) => runtime,
            Err(code) => return Ok(code),
        };

        let mut front_end = ConsoleFrontEnd::new(self.subpath.clone(), self.yes);
        Ok(runtime.run(&mut front_end).await)
    }
}
