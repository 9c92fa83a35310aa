//! Validate config command implementation
//!
//! This module implements the `validate-config` command for validating
//! the ago-backup configuration file.

use crate::cli::output::{EXIT_OK, EXIT_USAGE};
use crate::config::load_config_or_default;
use clap::Args;
use std::path::Path;

/// Arguments for the validate-config command
#[derive(Args, Debug)]
pub struct ValidateArgs {}

impl ValidateArgs {
    /// Execute the validate-config command
    ///
    /// Loading applies environment overrides and validation, so a loaded
    /// configuration is a valid one.
    pub async fn execute(&self, config_path: &str, explicit: bool) -> anyhow::Result<i32> {
        tracing::info!(config_path = %config_path, "Validating configuration");

        if Path::new(config_path).exists() {
            println!("🔍 Validating configuration file: {config_path}");
        } else if !explicit {
            println!("🔍 No {config_path} found, validating built-in defaults");
        }
        println!();

        let config = match load_config_or_default(config_path, explicit) {
            Ok(c) => c,
            Err(e) => {
                println!("❌ Configuration validation failed");
                println!("   Error: {e}");
                println!();
                return Ok(EXIT_USAGE);
            }
        };

        println!("✅ Configuration is valid");
        println!();
        println!("Configuration Summary:");
        println!("  Log Level: {}", config.application.log_level);
        println!("  Portal: {}", config.portal.url);
        println!(
            "  Username: {}",
            config.portal.username.as_deref().unwrap_or("(prompt)")
        );
        println!(
            "  Credentials File: {}",
            config.portal.credentials_file.as_deref().unwrap_or("(none)")
        );
        println!("  Timeout: {}s", config.portal.timeout_seconds);
        println!("  Retry Attempts: {}", config.portal.retry.max_attempts);
        println!("  Export Format: {}", config.portal.export.format);
        println!("  Backup Base: {}", config.backup.base_path);
        println!("  Naming: {}", config.backup.naming);
        if config.logging.local_enabled {
            println!(
                "  File Logging: {} ({})",
                config.logging.local_path, config.logging.local_rotation
            );
        }
        println!();

        Ok(EXIT_OK)
    }
}
