//! Configuration management for ago-backup.
//!
//! This module provides TOML-based configuration loading, parsing and
//! validation, plus the credentials file reader.
//!
//! # Overview
//!
//! ago-backup runs with no configuration file at all; when one is present it
//! supports:
//! - Environment variable substitution (`${VAR_NAME}`)
//! - Default values for every setting
//! - Environment overrides for the settings operators change most
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use ago_backup::config::load_config;
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = load_config("ago-backup.toml")?;
//!
//! println!("Portal: {}", config.portal.url);
//! println!("Backups under: {}", config.backup.base_path);
//! # Ok(())
//! # }
//! ```
//!
//! # Configuration Structure
//!
//! - [`ApplicationConfig`] - Log level
//! - [`PortalConfig`] - Portal URL, credentials source, retries and export jobs
//! - [`StorageConfig`] - Backup base directory and naming layout
//! - [`LoggingConfig`] - Optional JSON file logging
//!
//! # Example Configuration
//!
//! ```toml
//! [application]
//! log_level = "info"
//!
//! [portal]
//! url = "https://www.arcgis.com"
//! credentials_file = "${HOME}/.config/ago-backup/credentials"
//!
//! [portal.export]
//! format = "File Geodatabase"
//! cleanup_remote_exports = true
//!
//! [backup]
//! base_path = "/srv/gis-backups"
//! naming = "dated"
//! ```

pub mod credentials;
pub mod loader;
pub mod schema;
pub mod secret;

// Re-export commonly used types
pub use credentials::{load_credentials_from_file, Credentials};
pub use loader::{load_config, load_config_or_default};
pub use schema::{
    ApplicationConfig, BackupConfig, ExportConfig, LoggingConfig, PortalConfig, RetryConfig,
    StorageConfig, DEFAULT_BACKUP_BASE_PATH, DEFAULT_PORTAL_URL,
};
pub use secret::{secret_string, SecretString, SecretValue};
