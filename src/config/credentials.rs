//! Credentials file loading
//!
//! The file holds `KEY=VALUE` lines; `USERNAME` and `PASSWORD` are recognized,
//! `#` lines and blank lines are ignored and whitespace around `=` is allowed.
//!
//! ```text
//! # ArcGIS Online account
//! USERNAME = alice
//! PASSWORD = s3cret
//! ```

use super::secret::{secret_string, SecretString};
use crate::domain::{BackupError, Result};
use std::fs;
use std::io::ErrorKind;
use std::path::Path;

/// Portal sign-in credentials
#[derive(Debug, Clone)]
pub struct Credentials {
    /// Portal user name
    pub username: String,

    /// Portal password
    pub password: SecretString,
}

impl Credentials {
    /// Create credentials, rejecting blank values
    ///
    /// # Errors
    ///
    /// Returns `Authentication` if the username or password is empty.
    pub fn new(username: impl Into<String>, password: String) -> Result<Self> {
        let username = username.into().trim().to_string();
        if username.is_empty() {
            return Err(BackupError::Authentication(
                "Username is required".to_string(),
            ));
        }
        if password.is_empty() {
            return Err(BackupError::Authentication(
                "Password is required".to_string(),
            ));
        }
        Ok(Self {
            username,
            password: secret_string(password),
        })
    }
}

/// Load credentials from a `KEY=VALUE` file
///
/// Returns `Ok(None)` when the file does not exist, is empty or lacks either
/// key; the caller is expected to prompt instead.
///
/// # Errors
///
/// Returns `Io` if the file exists but cannot be read.
pub fn load_credentials_from_file(path: impl AsRef<Path>) -> Result<Option<Credentials>> {
    let path = path.as_ref();

    let contents = match fs::read_to_string(path) {
        Ok(contents) => contents,
        Err(e) if e.kind() == ErrorKind::NotFound => {
            tracing::warn!(path = %path.display(), "Credentials file not found");
            return Ok(None);
        }
        Err(e) => {
            return Err(BackupError::Io(format!(
                "Failed to read credentials file {}: {e}",
                path.display()
            )))
        }
    };

    let mut username = None;
    let mut password = None;

    for line in contents.lines() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let Some((key, value)) = line.split_once('=') else {
            continue;
        };
        let value = value.trim();
        match key.trim().to_uppercase().as_str() {
            "USERNAME" => username = Some(value.to_string()),
            "PASSWORD" => password = Some(value.to_string()),
            _ => {}
        }
    }

    match (username, password) {
        (Some(username), Some(password)) if !username.is_empty() && !password.is_empty() => {
            tracing::debug!(path = %path.display(), "Loaded credentials from file");
            Ok(Some(Credentials::new(username, password)?))
        }
        _ => {
            tracing::warn!(
                path = %path.display(),
                "Credentials file is missing USERNAME or PASSWORD"
            );
            Ok(None)
        }
    }
}
