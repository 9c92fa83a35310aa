//! Integration tests for configuration loading and validation
//!
//! Note: Tests that modify environment variables share a mutex so they do not
//! interfere with each other.

use ago_backup::config::{load_config, load_config_or_default, DEFAULT_PORTAL_URL};
use ago_backup::core::naming::NamingScheme;
use std::io::Write;
use std::sync::Mutex;
use tempfile::NamedTempFile;

// Mutex to serialize tests that modify environment variables
static ENV_MUTEX: Mutex<()> = Mutex::new(());

/// Helper function to clean up environment variables
fn cleanup_env_vars() {
    std::env::remove_var("AGO_BACKUP_LOG_LEVEL");
    std::env::remove_var("AGO_URL");
    std::env::remove_var("AGO_CREDENTIALS_FILE");
    std::env::remove_var("AGO_USERNAME");
    std::env::remove_var("BACKUP_BASE_PATH");
    std::env::remove_var("AGO_BACKUP_NAMING");
    std::env::remove_var("TEST_AGO_USERNAME");
}

fn write_config(contents: &str) -> NamedTempFile {
    let mut temp_file = NamedTempFile::new().unwrap();
    temp_file.write_all(contents.as_bytes()).unwrap();
    temp_file.flush().unwrap();
    temp_file
}

#[test]
fn test_load_complete_config() {
    let _lock = ENV_MUTEX.lock().unwrap_or_else(|e| e.into_inner());
    cleanup_env_vars();

    let temp_file = write_config(
        r#"
[application]
log_level = "debug"

[portal]
url = "https://gis.example.com/portal"
credentials_file = "/etc/ago-backup/credentials.env"
username = "gis_admin"
timeout_seconds = 120
tls_verify = false

[portal.retry]
max_attempts = 5
initial_delay_ms = 500
max_delay_ms = 10000
backoff_multiplier = 1.5

[portal.export]
format = "Shapefile"
poll_interval_ms = 2000
timeout_seconds = 600
cleanup_remote_exports = false

[backup]
base_path = "/srv/backups"
naming = "undated"

[logging]
local_enabled = true
local_path = "/var/log/ago-backup"
local_rotation = "hourly"
"#,
    );

    let config = load_config(temp_file.path()).unwrap();

    assert_eq!(config.application.log_level, "debug");
    assert_eq!(config.portal.url, "https://gis.example.com/portal");
    assert_eq!(
        config.portal.credentials_file.as_deref(),
        Some("/etc/ago-backup/credentials.env")
    );
    assert_eq!(config.portal.username.as_deref(), Some("gis_admin"));
    assert_eq!(config.portal.timeout_seconds, 120);
    assert!(!config.portal.tls_verify);
    assert_eq!(config.portal.retry.max_attempts, 5);
    assert_eq!(config.portal.export.format, "Shapefile");
    assert!(!config.portal.export.cleanup_remote_exports);
    assert_eq!(config.backup.base_path, "/srv/backups");
    assert_eq!(config.backup.naming, NamingScheme::Undated);
    assert!(config.logging.local_enabled);
    assert_eq!(config.logging.local_rotation, "hourly");
}

#[test]
fn test_empty_file_yields_defaults() {
    let _lock = ENV_MUTEX.lock().unwrap_or_else(|e| e.into_inner());
    cleanup_env_vars();

    let temp_file = write_config("");
    let config = load_config(temp_file.path()).unwrap();

    assert_eq!(config.application.log_level, "info");
    assert_eq!(config.portal.url, DEFAULT_PORTAL_URL);
    assert_eq!(config.portal.retry.max_attempts, 3);
    assert_eq!(config.portal.export.format, "File Geodatabase");
    assert_eq!(config.backup.base_path, "./backups");
    assert_eq!(config.backup.naming, NamingScheme::Dated);
}

#[test]
fn test_env_var_substitution() {
    let _lock = ENV_MUTEX.lock().unwrap_or_else(|e| e.into_inner());
    cleanup_env_vars();
    std::env::set_var("TEST_AGO_USERNAME", "substituted_user");

    let temp_file = write_config(
        r#"
[portal]
# username = "${NOT_SET_BUT_COMMENTED}"
username = "${TEST_AGO_USERNAME}"
"#,
    );

    let config = load_config(temp_file.path()).unwrap();
    assert_eq!(config.portal.username.as_deref(), Some("substituted_user"));

    cleanup_env_vars();
}

#[test]
fn test_missing_env_vars_reported_together() {
    let _lock = ENV_MUTEX.lock().unwrap_or_else(|e| e.into_inner());
    cleanup_env_vars();

    let temp_file = write_config(
        r#"
[portal]
username = "${MISSING_AGO_USER}"
credentials_file = "${MISSING_AGO_CREDENTIALS}"
"#,
    );

    let err = load_config(temp_file.path()).unwrap_err().to_string();
    assert!(err.contains("MISSING_AGO_USER"));
    assert!(err.contains("MISSING_AGO_CREDENTIALS"));
}

#[test]
fn test_env_overrides() {
    let _lock = ENV_MUTEX.lock().unwrap_or_else(|e| e.into_inner());
    cleanup_env_vars();
    std::env::set_var("BACKUP_BASE_PATH", "/data/override");
    std::env::set_var("AGO_URL", "https://override.example.com");
    std::env::set_var("AGO_BACKUP_LOG_LEVEL", "warn");
    std::env::set_var("AGO_BACKUP_NAMING", "undated");

    let temp_file = write_config(
        r#"
[application]
log_level = "debug"

[portal]
url = "https://www.arcgis.com"

[backup]
base_path = "./backups"
"#,
    );

    let config = load_config(temp_file.path()).unwrap();
    assert_eq!(config.backup.base_path, "/data/override");
    assert_eq!(config.portal.url, "https://override.example.com");
    assert_eq!(config.application.log_level, "warn");
    assert_eq!(config.backup.naming, NamingScheme::Undated);

    cleanup_env_vars();
}

#[test]
fn test_invalid_naming_override_rejected() {
    let _lock = ENV_MUTEX.lock().unwrap_or_else(|e| e.into_inner());
    cleanup_env_vars();
    std::env::set_var("AGO_BACKUP_NAMING", "weekly");

    let temp_file = write_config("");
    let result = load_config(temp_file.path());
    assert!(result.is_err());

    cleanup_env_vars();
}

#[test]
fn test_validation_errors() {
    let _lock = ENV_MUTEX.lock().unwrap_or_else(|e| e.into_inner());
    cleanup_env_vars();

    let cases = [
        "[application]\nlog_level = \"verbose\"\n",
        "[portal]\nurl = \"ftp://example.com\"\n",
        "[portal.retry]\nmax_attempts = 0\n",
        "[portal.export]\nformat = \"KML\"\n",
        "[backup]\nbase_path = \"  \"\n",
        "[logging]\nlocal_rotation = \"size\"\n",
    ];

    for toml in cases {
        let temp_file = write_config(toml);
        let err = load_config(temp_file.path()).unwrap_err();
        assert!(
            err.to_string().contains("validation failed"),
            "expected validation failure for {toml:?}, got {err}"
        );
    }
}

#[test]
fn test_missing_file_handling() {
    let _lock = ENV_MUTEX.lock().unwrap_or_else(|e| e.into_inner());
    cleanup_env_vars();

    let missing = "/nonexistent/ago-backup.toml";
    assert!(load_config(missing).is_err());
    assert!(load_config_or_default(missing, true).is_err());

    let config = load_config_or_default(missing, false).unwrap();
    assert_eq!(config.portal.url, DEFAULT_PORTAL_URL);
}
