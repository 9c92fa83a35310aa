//! Domain identifier types with validation
//!
//! Newtype wrappers for the opaque identifiers handed out by the remote content
//! store. They keep item and folder identifiers from being mixed up and reject
//! obviously malformed input early.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Item identifier newtype wrapper
///
/// Portal item identifiers are opaque strings (32 hex characters on ArcGIS
/// Online). Only emptiness and embedded whitespace are rejected.
///
/// # Examples
///
/// ```
/// use ago_backup::domain::ids::ItemId;
/// use std::str::FromStr;
///
/// let id = ItemId::from_str("7d44b88c41994bad97dcd78268e01398").unwrap();
/// assert_eq!(id.as_str(), "7d44b88c41994bad97dcd78268e01398");
/// assert!(ItemId::from_str("abc def").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ItemId(String);

impl ItemId {
    /// Creates a new ItemId from a string
    ///
    /// # Returns
    ///
    /// Returns `Ok(ItemId)` if the ID is valid, `Err` with a reason otherwise
    pub fn new(id: impl Into<String>) -> Result<Self, String> {
        let id = id.into();
        if id.trim().is_empty() {
            return Err("Item ID cannot be empty".to_string());
        }
        if id.chars().any(|c| c.is_whitespace() || c.is_control()) {
            return Err(format!("Item ID '{id}' contains whitespace"));
        }
        Ok(Self(id))
    }

    /// Returns the item ID as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consumes self and returns the inner String
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for ItemId {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl AsRef<str> for ItemId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Folder identifier newtype wrapper
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FolderId(String);

impl FolderId {
    /// Creates a new FolderId from a string
    pub fn new(id: impl Into<String>) -> Result<Self, String> {
        let id = id.into();
        if id.trim().is_empty() {
            return Err("Folder ID cannot be empty".to_string());
        }
        Ok(Self(id))
    }

    /// Returns the folder ID as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for FolderId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for FolderId {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl AsRef<str> for FolderId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
