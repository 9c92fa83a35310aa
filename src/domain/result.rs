//! Result type alias for ago-backup

use super::errors::BackupError;

/// Result type alias for ago-backup operations
///
/// # Examples
///
/// ```
/// use ago_backup::domain::result::Result;
/// use ago_backup::domain::errors::BackupError;
///
/// fn pick() -> Result<usize> {
///     Err(BackupError::InvalidSelection("nothing selected".to_string()))
/// }
/// assert!(pick().is_err());
/// ```
pub type Result<T> = std::result::Result<T, BackupError>;
