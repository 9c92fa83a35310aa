//! Remote content store capability
//!
//! The backup core only consumes this trait: authenticate, enumerate folders
//! and items, look up single items and export one item to a local directory.
//! How the remote service packages an item is its own business.

use crate::config::{Credentials, SecretString};
use crate::domain::{Folder, Item, ItemId, Result};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::path::{Path, PathBuf};

/// Authenticated session handle
///
/// Passed explicitly to every remote call; never stored globally. The core
/// treats it as read-only.
#[derive(Debug, Clone)]
pub struct Session {
    /// Portal the session belongs to
    pub portal_url: String,

    /// Authenticated user name
    pub username: String,

    /// Access token; redacted in debug output
    pub token: SecretString,

    /// Token expiry reported by the portal, if any
    pub expires_at: Option<DateTime<Utc>>,
}

impl Session {
    /// Create a new session
    pub fn new(
        portal_url: impl Into<String>,
        username: impl Into<String>,
        token: SecretString,
        expires_at: Option<DateTime<Utc>>,
    ) -> Self {
        Self {
            portal_url: portal_url.into(),
            username: username.into(),
            token,
            expires_at,
        }
    }

    /// Whether the portal-reported expiry has passed
    pub fn is_expired(&self) -> bool {
        self.expires_at
            .map(|expires| expires <= Utc::now())
            .unwrap_or(false)
    }
}

/// Remote content store operations consumed by the backup core
///
/// Implementations translate transport failures into the domain taxonomy:
/// `Authentication` for rejected credentials or sessions, `RemoteAccess` for
/// listing failures and `Export` for failed exports.
#[async_trait]
pub trait ContentStore: Send + Sync {
    /// Sign in and return a session handle
    async fn authenticate(&self, credentials: &Credentials) -> Result<Session>;

    /// Folders of the authenticated user, in the order the store returns them
    async fn list_folders(&self, session: &Session) -> Result<Vec<Folder>>;

    /// All items in `folder`, unfiltered, in store order
    async fn list_items(&self, session: &Session, folder: &Folder) -> Result<Vec<Item>>;

    /// Look up a single item; `Ok(None)` if it does not exist or is not
    /// accessible to this session
    async fn get_item(&self, session: &Session, id: &ItemId) -> Result<Option<Item>>;

    /// Export `item` into `destination` and return the path of the written
    /// package
    async fn export_item(
        &self,
        session: &Session,
        item: &Item,
        destination: &Path,
    ) -> Result<PathBuf>;

    /// Base URL of the store, for display
    fn base_url(&self) -> &str;
}
