//! Configuration loader with TOML parsing and environment variable overrides

use super::schema::BackupConfig;
use crate::domain::errors::BackupError;
use crate::domain::result::Result;
use regex::Regex;
use std::fs;
use std::path::Path;

/// Loads configuration from a TOML file
///
/// This function:
/// 1. Reads the TOML file
/// 2. Performs environment variable substitution (${VAR} syntax)
/// 3. Parses the TOML into BackupConfig
/// 4. Applies environment variable overrides
/// 5. Validates the configuration
///
/// # Errors
///
/// Returns an error if:
/// - File cannot be read
/// - TOML parsing fails
/// - Environment variable substitution fails
/// - Configuration validation fails
///
/// # Examples
///
/// ```no_run
/// use ago_backup::config::loader::load_config;
///
/// let config = load_config("ago-backup.toml").expect("Failed to load config");
/// ```
pub fn load_config(path: impl AsRef<Path>) -> Result<BackupConfig> {
    let path = path.as_ref();

    if !path.exists() {
        return Err(BackupError::Configuration(format!(
            "Configuration file not found: {}",
            path.display()
        )));
    }

    let contents = fs::read_to_string(path).map_err(|e| {
        BackupError::Configuration(format!(
            "Failed to read configuration file {}: {}",
            path.display(),
            e
        ))
    })?;

    let contents = substitute_env_vars(&contents)?;

    let config: BackupConfig = toml::from_str(&contents)
        .map_err(|e| BackupError::Configuration(format!("Failed to parse TOML: {}", e)))?;

    finish(config)
}

/// Loads configuration, falling back to defaults when the file is absent
///
/// A missing file is only tolerated when `explicit` is false, i.e. the path
/// is the built-in default rather than one the user asked for. Environment
/// overrides and validation apply either way.
///
/// # Errors
///
/// Same as [`load_config`], plus a missing file when `explicit` is true.
pub fn load_config_or_default(path: impl AsRef<Path>, explicit: bool) -> Result<BackupConfig> {
    let path = path.as_ref();

    if !explicit && !path.exists() {
        tracing::debug!(path = %path.display(), "No configuration file, using defaults");
        return finish(BackupConfig::default());
    }

    load_config(path)
}

fn finish(mut config: BackupConfig) -> Result<BackupConfig> {
    apply_env_overrides(&mut config)?;

    config.validate().map_err(|e| {
        BackupError::Configuration(format!("Configuration validation failed: {}", e))
    })?;

    Ok(config)
}

/// Substitutes environment variables in the format ${VAR_NAME}
///
/// # Errors
///
/// Returns an error if a referenced environment variable is not set
fn substitute_env_vars(input: &str) -> Result<String> {
    let re = Regex::new(r"\$\{([A-Z_][A-Z0-9_]*)\}")
        .map_err(|e| BackupError::Configuration(format!("Invalid substitution pattern: {e}")))?;
    let mut result = String::new();
    let mut missing_vars = Vec::new();

    for line in input.lines() {
        let trimmed = line.trim_start();

        // Comments are passed through untouched
        if trimmed.starts_with('#') {
            result.push_str(line);
            result.push('\n');
            continue;
        }

        let mut processed_line = line.to_string();
        for cap in re.captures_iter(line) {
            let var_name = &cap[1];
            match std::env::var(var_name) {
                Ok(value) => {
                    let placeholder = format!("${{{}}}", var_name);
                    processed_line = processed_line.replace(&placeholder, &value);
                }
                Err(_) => {
                    if !missing_vars.contains(&var_name.to_string()) {
                        missing_vars.push(var_name.to_string());
                    }
                }
            }
        }
        result.push_str(&processed_line);
        result.push('\n');
    }

    if !missing_vars.is_empty() {
        return Err(BackupError::Configuration(format!(
            "Missing required environment variables: {}",
            missing_vars.join(", ")
        )));
    }

    Ok(result)
}

/// Applies environment variable overrides
///
/// | Variable                | Setting                   |
/// |-------------------------|---------------------------|
/// | `BACKUP_BASE_PATH`      | `backup.base_path`        |
/// | `AGO_BACKUP_NAMING`     | `backup.naming`           |
/// | `AGO_URL`               | `portal.url`              |
/// | `AGO_CREDENTIALS_FILE`  | `portal.credentials_file` |
/// | `AGO_USERNAME`          | `portal.username`         |
/// | `AGO_BACKUP_LOG_LEVEL`  | `application.log_level`   |
fn apply_env_overrides(config: &mut BackupConfig) -> Result<()> {
    if let Some(val) = non_empty_var("AGO_BACKUP_LOG_LEVEL") {
        config.application.log_level = val;
    }

    if let Some(val) = non_empty_var("AGO_URL") {
        config.portal.url = val;
    }
    if let Some(val) = non_empty_var("AGO_CREDENTIALS_FILE") {
        config.portal.credentials_file = Some(val);
    }
    if let Some(val) = non_empty_var("AGO_USERNAME") {
        config.portal.username = Some(val);
    }

    if let Some(val) = non_empty_var("BACKUP_BASE_PATH") {
        config.backup.base_path = val;
    }
    if let Some(val) = non_empty_var("AGO_BACKUP_NAMING") {
        config.backup.naming = val.parse()?;
    }

    Ok(())
}

fn non_empty_var(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.trim().is_empty())
}
