//! Configuration schema types
//!
//! Every section has serde defaults, so an empty file (or no file at all)
//! yields a working configuration pointed at ArcGIS Online.

use crate::core::naming::NamingScheme;
use serde::{Deserialize, Serialize};

/// Public ArcGIS Online endpoint
pub const DEFAULT_PORTAL_URL: &str = "https://www.arcgis.com";

/// Default backup base directory, relative to the working directory
pub const DEFAULT_BACKUP_BASE_PATH: &str = "./backups";

/// Main ago-backup configuration
///
/// This is the root configuration structure that maps to the TOML file.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct BackupConfig {
    /// Application-level settings
    #[serde(default)]
    pub application: ApplicationConfig,

    /// Portal connection settings
    #[serde(default)]
    pub portal: PortalConfig,

    /// Local backup destination settings
    #[serde(default)]
    pub backup: StorageConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl BackupConfig {
    /// Validates the configuration
    ///
    /// # Errors
    ///
    /// Returns an error if any configuration values are invalid
    pub fn validate(&self) -> Result<(), String> {
        self.application.validate()?;
        self.portal.validate()?;
        self.backup.validate()?;
        self.logging.validate()?;
        Ok(())
    }
}

/// Application-level configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApplicationConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl ApplicationConfig {
    fn validate(&self) -> Result<(), String> {
        let valid_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_levels.contains(&self.log_level.as_str()) {
            return Err(format!(
                "Invalid log_level '{}'. Must be one of: {}",
                self.log_level,
                valid_levels.join(", ")
            ));
        }
        Ok(())
    }
}

impl Default for ApplicationConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
        }
    }
}

/// Retry policy for read-only listing calls
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetryConfig {
    /// Maximum number of attempts (1 disables retries)
    #[serde(default = "default_max_attempts")]
    pub max_attempts: usize,

    /// Initial delay in milliseconds
    #[serde(default = "default_initial_delay_ms")]
    pub initial_delay_ms: u64,

    /// Maximum delay in milliseconds
    #[serde(default = "default_max_delay_ms")]
    pub max_delay_ms: u64,

    /// Backoff multiplier
    #[serde(default = "default_backoff_multiplier")]
    pub backoff_multiplier: f64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: default_max_attempts(),
            initial_delay_ms: default_initial_delay_ms(),
            max_delay_ms: default_max_delay_ms(),
            backoff_multiplier: default_backoff_multiplier(),
        }
    }
}

/// Remote export settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportConfig {
    /// Server-side export format for feature layers
    #[serde(default = "default_export_format")]
    pub format: String,

    /// Delay between export job status checks
    #[serde(default = "default_poll_interval_ms")]
    pub poll_interval_ms: u64,

    /// Give up on an export job after this many seconds
    #[serde(default = "default_export_timeout_seconds")]
    pub timeout_seconds: u64,

    /// Delete the temporary export item from the portal after download
    #[serde(default = "default_true")]
    pub cleanup_remote_exports: bool,
}

impl ExportConfig {
    fn validate(&self) -> Result<(), String> {
        let valid_formats = [
            "File Geodatabase",
            "Shapefile",
            "CSV",
            "GeoJson",
            "Feature Collection",
        ];
        if !valid_formats.contains(&self.format.as_str()) {
            return Err(format!(
                "Invalid portal.export.format '{}'. Must be one of: {}",
                self.format,
                valid_formats.join(", ")
            ));
        }

        if self.timeout_seconds == 0 {
            return Err("portal.export.timeout_seconds must be > 0".to_string());
        }

        Ok(())
    }
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            format: default_export_format(),
            poll_interval_ms: default_poll_interval_ms(),
            timeout_seconds: default_export_timeout_seconds(),
            cleanup_remote_exports: true,
        }
    }
}

/// Portal connection configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PortalConfig {
    /// Portal base URL (env: `AGO_URL`)
    #[serde(default = "default_portal_url")]
    pub url: String,

    /// Path to a `KEY=VALUE` credentials file (env: `AGO_CREDENTIALS_FILE`)
    #[serde(default)]
    pub credentials_file: Option<String>,

    /// User name to pre-fill when prompting
    #[serde(default)]
    pub username: Option<String>,

    /// HTTP timeout in seconds
    #[serde(default = "default_timeout_seconds")]
    pub timeout_seconds: u64,

    /// TLS certificate verification enabled
    ///
    /// Only disable this against a test portal with a self-signed certificate.
    #[serde(default = "default_true")]
    pub tls_verify: bool,

    /// Retry configuration for listing calls
    #[serde(default)]
    pub retry: RetryConfig,

    /// Export job configuration
    #[serde(default)]
    pub export: ExportConfig,
}

impl PortalConfig {
    fn validate(&self) -> Result<(), String> {
        if self.url.is_empty() {
            return Err("portal.url cannot be empty".to_string());
        }

        let parsed = url::Url::parse(&self.url)
            .map_err(|e| format!("portal.url '{}' is not a valid URL: {e}", self.url))?;
        if parsed.scheme() != "http" && parsed.scheme() != "https" {
            return Err("portal.url must start with http:// or https://".to_string());
        }

        if self.timeout_seconds == 0 {
            return Err("portal.timeout_seconds must be > 0".to_string());
        }

        if self.retry.max_attempts == 0 || self.retry.max_attempts > 10 {
            return Err(format!(
                "portal.retry.max_attempts must be between 1 and 10, got {}",
                self.retry.max_attempts
            ));
        }

        self.export.validate()?;
        Ok(())
    }
}

impl Default for PortalConfig {
    fn default() -> Self {
        Self {
            url: default_portal_url(),
            credentials_file: None,
            username: None,
            timeout_seconds: default_timeout_seconds(),
            tls_verify: true,
            retry: RetryConfig::default(),
            export: ExportConfig::default(),
        }
    }
}

/// Local storage configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Base directory all backups stay under (env: `BACKUP_BASE_PATH`)
    #[serde(default = "default_base_path")]
    pub base_path: String,

    /// Default destination layout when no subpath is given
    #[serde(default)]
    pub naming: NamingScheme,
}

impl StorageConfig {
    fn validate(&self) -> Result<(), String> {
        if self.base_path.trim().is_empty() {
            return Err("backup.base_path cannot be empty".to_string());
        }
        Ok(())
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            base_path: default_base_path(),
            naming: NamingScheme::default(),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Enable local JSON file logging
    #[serde(default)]
    pub local_enabled: bool,

    /// Local log directory
    #[serde(default = "default_local_path")]
    pub local_path: String,

    /// Log rotation strategy
    #[serde(default = "default_local_rotation")]
    pub local_rotation: String,
}

impl LoggingConfig {
    fn validate(&self) -> Result<(), String> {
        let valid_rotations = ["daily", "hourly", "never"];
        if !valid_rotations.contains(&self.local_rotation.as_str()) {
            return Err(format!(
                "Invalid logging.local_rotation '{}'. Must be one of: {}",
                self.local_rotation,
                valid_rotations.join(", ")
            ));
        }

        if self.local_enabled && self.local_path.trim().is_empty() {
            return Err("logging.local_path cannot be empty when file logging is enabled".to_string());
        }

        Ok(())
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            local_enabled: false,
            local_path: default_local_path(),
            local_rotation: default_local_rotation(),
        }
    }
}

// Default value functions
fn default_log_level() -> String {
    "info".to_string()
}

fn default_portal_url() -> String {
    DEFAULT_PORTAL_URL.to_string()
}

fn default_base_path() -> String {
    DEFAULT_BACKUP_BASE_PATH.to_string()
}

fn default_true() -> bool {
    true
}

fn default_timeout_seconds() -> u64 {
    60
}

fn default_max_attempts() -> usize {
    3
}

fn default_initial_delay_ms() -> u64 {
    1000
}

fn default_max_delay_ms() -> u64 {
    30000
}

fn default_backoff_multiplier() -> f64 {
    2.0
}

fn default_export_format() -> String {
    "File Geodatabase".to_string()
}

fn default_poll_interval_ms() -> u64 {
    5000
}

fn default_export_timeout_seconds() -> u64 {
    1800
}

fn default_local_path() -> String {
    "./logs".to_string()
}

fn default_local_rotation() -> String {
    "daily".to_string()
}
