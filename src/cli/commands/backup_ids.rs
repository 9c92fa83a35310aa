//! Backup-ids command implementation
//!
//! This module implements the `backup-ids` command: back up items named by
//! ID without any browsing. IDs come from `--ids`, `--ids-file` or stdin.

use super::session::start_runtime;
use crate::cli::id_list::IdListFrontEnd;
use crate::cli::output::{exit_code_for_error, print_error};
use crate::config::BackupConfig;
use crate::core::backup::ShutdownHandle;
use crate::domain::{Result, ResultExt};
use clap::Args;
use std::io::Read;

/// Arguments for the backup-ids command
#[derive(Args, Debug)]
pub struct BackupIdsArgs {
    /// Item IDs separated by commas or whitespace
    #[arg(long, conflicts_with = "ids_file")]
    pub ids: Option<String>,

    /// File with item IDs, separated by commas or whitespace
    #[arg(long)]
    pub ids_file: Option<String>,

    /// Subpath under the backup base shared by all items
    #[arg(short, long)]
    pub subpath: Option<String>,
}

impl BackupIdsArgs {
    /// Execute the backup-ids command
    pub async fn execute(
        &self,
        config: &BackupConfig,
        shutdown: ShutdownHandle,
    ) -> anyhow::Result<i32> {
        let input = match self.read_input() {
            Ok(input) => input,
            Err(e) => {
                print_error(&e);
                return Ok(exit_code_for_error(&e));
            }
        };

        tracing::info!(
            base_path = %config.backup.base_path,
            portal = %config.portal.url,
            "Starting backup by item ID"
        );

        let runtime = match start_runtime(config, shutdown).await {
            Ok(runtime) => runtime,
            Err(code) => return Ok(code),
        };

        let mut front_end = IdListFrontEnd::new(input, self.subpath.clone());
        Ok(runtime.run(&mut front_end).await)
    }

    /// Raw ID text from the first source given
    fn read_input(&self) -> Result<String> {
        if let Some(ids) = &self.ids {
            return Ok(ids.clone());
        }

        if let Some(path) = &self.ids_file {
            return std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read item ID file {path}"));
        }

        tracing::debug!("Reading item IDs from stdin");
        let mut input = String::new();
        std::io::stdin()
            .read_to_string(&mut input)
            .context("Failed to read item IDs from stdin")?;
        Ok(input)
    }
}
