//! Init command implementation
//!
//! This module implements the `init` command for generating a sample
//! configuration file.

use crate::cli::DEFAULT_CONFIG_PATH;
use clap::Args;
use std::fs;
use std::path::Path;

/// Arguments for the init command
#[derive(Args, Debug)]
pub struct InitArgs {
    /// Path where to create the configuration file
    #[arg(short, long, default_value = DEFAULT_CONFIG_PATH)]
    pub output: String,

    /// Include example values and comments
    #[arg(long)]
    pub with_examples: bool,

    /// Overwrite existing file
    #[arg(long)]
    pub force: bool,
}

impl InitArgs {
    /// Execute the init command
    pub async fn execute(&self) -> anyhow::Result<i32> {
        tracing::info!(output = %self.output, "Initializing configuration file");

        println!("📝 Initializing ago-backup configuration");
        println!();

        if Path::new(&self.output).exists() && !self.force {
            println!("❌ Configuration file already exists: {}", self.output);
            println!("   Use --force to overwrite");
            return Ok(2);
        }

        let config_content = if self.with_examples {
            Self::generate_config_with_examples()
        } else {
            Self::generate_minimal_config()
        };

        match fs::write(&self.output, config_content) {
            Ok(_) => {
                println!("✅ Configuration file created: {}", self.output);
                println!();
                println!("Next steps:");
                println!("  1. Edit {} with your settings", self.output);
                println!("  2. Optionally create a credentials file with USERNAME and PASSWORD");
                println!("     lines and point portal.credentials_file at it");
                println!("  3. Validate configuration: ago-backup validate-config");
                println!("  4. Run a backup: ago-backup backup");
                println!();
                Ok(0)
            }
            Err(e) => {
                println!("❌ Failed to write configuration file");
                println!("   Error: {e}");
                Ok(5)
            }
        }
    }

    /// Generate minimal configuration
    fn generate_minimal_config() -> String {
        r#"# ago-backup Configuration File
# ArcGIS Online content backup

[application]
log_level = "info"

[portal]
url = "https://www.arcgis.com"
# credentials_file = "credentials.env"
# username = "your-username"

[backup]
base_path = "./backups"
naming = "dated"

[logging]
local_enabled = false
local_path = "./logs"
local_rotation = "daily"
"#
        .to_string()
    }

    /// Generate configuration with examples and comments
    fn generate_config_with_examples() -> String {
        r#"# ago-backup Configuration File
# ArcGIS Online content backup
#
# Every setting has a default; this file only needs the values you change.
# ${VAR} references are replaced with environment variables when loading.

# ============================================================================
# Application Settings
# ============================================================================
[application]
# Log level (trace, debug, info, warn, error)
# Override with --log-level or AGO_BACKUP_LOG_LEVEL
log_level = "info"

# ============================================================================
# Portal Connection
# ============================================================================
[portal]
# Portal base URL (env: AGO_URL)
url = "https://www.arcgis.com"

# File with USERNAME=... and PASSWORD=... lines (env: AGO_CREDENTIALS_FILE)
# When missing or incomplete you are prompted to sign in.
# credentials_file = "credentials.env"

# Default username for the sign-in prompt (env: AGO_USERNAME)
# username = "${AGO_USERNAME}"

# HTTP request timeout in seconds
timeout_seconds = 60

# TLS certificate verification
tls_verify = true

# Retries for read-only listing calls
[portal.retry]
max_attempts = 3
initial_delay_ms = 1000
max_delay_ms = 30000
backoff_multiplier = 2.0

# Feature layer export settings
[portal.export]
# File Geodatabase | Shapefile | CSV | GeoJson | Feature Collection
format = "File Geodatabase"

# Delay between export job status checks
poll_interval_ms = 5000

# Give up on an export job after this many seconds
timeout_seconds = 1800

# Delete the temporary export item from the portal after download
cleanup_remote_exports = true

# ============================================================================
# Backup Destination
# ============================================================================
[backup]
# All backups stay under this directory (env: BACKUP_BASE_PATH)
base_path = "./backups"

# Default layout when no subpath is given (env: AGO_BACKUP_NAMING)
# - dated:   2026FEB11/<Folder>/<layer|map>/<Title>
# - undated: <Folder>/<layer|map>/<Title>
naming = "dated"

# ============================================================================
# Logging Configuration
# ============================================================================
[logging]
# Enable JSON file logging in addition to the console
local_enabled = false

# Log directory
local_path = "./logs"

# Log rotation (daily, hourly, never)
local_rotation = "daily"
"#
        .to_string()
    }
}
