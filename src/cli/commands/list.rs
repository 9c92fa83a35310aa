//! List command implementation
//!
//! This module implements the `list` command: a read-only view of the
//! folders and backupable items of the signed-in user.

use super::session::connect;
use crate::cli::output::{exit_code_for_error, print_error};
use crate::config::BackupConfig;
use crate::core::directory::ContentDirectory;
use crate::domain::Result;
use clap::Args;

/// Arguments for the list command
#[derive(Args, Debug)]
pub struct ListArgs {
    /// Also list the backupable items of every folder
    #[arg(short, long)]
    pub items: bool,

    /// Print item IDs next to item titles
    #[arg(long, requires = "items")]
    pub show_ids: bool,
}

impl ListArgs {
    /// Execute the list command
    pub async fn execute(&self, config: &BackupConfig) -> anyhow::Result<i32> {
        tracing::info!(portal = %config.portal.url, "Listing content");

        match self.list(config).await {
            Ok(()) => Ok(0),
            Err(e) => {
                tracing::error!(error = %e, "Listing failed");
                print_error(&e);
                Ok(exit_code_for_error(&e))
            }
        }
    }

    async fn list(&self, config: &BackupConfig) -> Result<()> {
        let connection = connect(config).await?;
        let directory = ContentDirectory::new(connection.store.clone());
        let folders = directory.list_folders(&connection.session).await?;

        println!();
        if folders.is_empty() {
            println!("No folders found for {}", connection.session.username);
            return Ok(());
        }

        println!("📁 Folders of {}:", connection.session.username);
        for (i, folder) in folders.iter().enumerate() {
            println!("  {:>3}. {}", i + 1, folder.display_name());

            if !self.items {
                continue;
            }

            let items = directory.list_items(&connection.session, folder).await?;
            if items.is_empty() {
                println!("       (no feature layers or web maps)");
            }
            for item in &items {
                if self.show_ids {
                    println!(
                        "       - {} [{}] {}",
                        item.display_name(),
                        item.kind.tag(),
                        item.id
                    );
                } else {
                    println!("       - {} [{}]", item.display_name(), item.kind.tag());
                }
            }
        }
        println!();

        Ok(())
    }
}
