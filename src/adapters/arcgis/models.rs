//! ArcGIS REST API models
//!
//! Wire structures for the sharing API. They are kept separate from the domain
//! models; `to_domain` conversions live here so the client only deals with
//! transport.

use crate::domain::{BackupError, Folder, FolderId, FolderRef, Item, ItemId, ItemKind, Result};
use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::Deserialize;

/// Error envelope returned with HTTP 200 by most sharing endpoints
#[derive(Debug, Clone, Deserialize)]
pub struct ErrorEnvelope {
    /// Error body
    pub error: PortalError,
}

/// Error body inside [`ErrorEnvelope`]
#[derive(Debug, Clone, Deserialize)]
pub struct PortalError {
    /// Portal error code (498 invalid token, 499 token required, ...)
    #[serde(default)]
    pub code: i64,

    /// Human-readable message
    #[serde(default)]
    pub message: String,

    /// Additional detail lines
    #[serde(default)]
    pub details: Vec<String>,
}

impl PortalError {
    /// Whether the portal rejected the token or credentials
    pub fn is_auth_failure(&self) -> bool {
        matches!(self.code, 498 | 499)
    }

    /// Whether the error means the item is unknown or not shared with the user
    pub fn is_not_found(&self) -> bool {
        self.code == 404
            || self
                .message
                .to_ascii_lowercase()
                .contains("does not exist or is inaccessible")
    }

    /// Message with details appended
    pub fn describe(&self) -> String {
        if self.details.is_empty() {
            format!("{} (code {})", self.message, self.code)
        } else {
            format!(
                "{} (code {}): {}",
                self.message,
                self.code,
                self.details.join("; ")
            )
        }
    }
}

/// Parsed portal response: either the payload or a portal error
#[derive(Debug)]
pub enum PortalResponse<T> {
    /// Successful payload
    Ok(T),
    /// Error envelope
    Err(PortalError),
}

/// Parse a JSON body that may carry an error envelope instead of the payload
///
/// # Errors
///
/// Returns `Serialization` if the body is neither.
pub fn parse_response<T: DeserializeOwned>(body: &str) -> Result<PortalResponse<T>> {
    let value: serde_json::Value = serde_json::from_str(body)?;

    if value.get("error").is_some() {
        let envelope: ErrorEnvelope = serde_json::from_value(value)?;
        return Ok(PortalResponse::Err(envelope.error));
    }

    Ok(PortalResponse::Ok(serde_json::from_value(value)?))
}

/// `generateToken` response
#[derive(Debug, Clone, Deserialize)]
pub struct TokenResponse {
    /// Access token
    pub token: String,

    /// Expiry in milliseconds since the epoch
    #[serde(default)]
    pub expires: Option<i64>,
}

impl TokenResponse {
    /// Expiry as a UTC timestamp
    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        self.expires.and_then(DateTime::from_timestamp_millis)
    }
}

/// Folder entry in a user content listing
#[derive(Debug, Clone, Deserialize)]
pub struct FolderModel {
    /// Folder identifier
    pub id: String,

    /// Folder title
    #[serde(default)]
    pub title: String,
}

impl FolderModel {
    /// Convert to domain Folder
    ///
    /// # Errors
    ///
    /// Returns `RemoteAccess` if the identifier is empty.
    pub fn to_domain(&self) -> Result<Folder> {
        let id = FolderId::new(self.id.clone())
            .map_err(|e| BackupError::RemoteAccess(format!("Invalid folder in listing: {e}")))?;
        Ok(Folder::new(id, self.title.clone()))
    }
}

/// Item entry, as returned by listings and by `content/items/{id}`
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemModel {
    /// Item identifier
    pub id: String,

    /// Item title
    #[serde(default)]
    pub title: String,

    /// Portal item type, e.g. `Feature Service`
    #[serde(rename = "type", default)]
    pub item_type: String,

    /// Owning folder identifier, absent for the root folder
    #[serde(default)]
    pub owner_folder: Option<String>,
}

impl ItemModel {
    /// Convert to a domain Item in `folder`
    ///
    /// # Errors
    ///
    /// Returns `RemoteAccess` if the identifier is malformed.
    pub fn to_domain(&self, folder: FolderRef) -> Result<Item> {
        let id = ItemId::new(self.id.clone())
            .map_err(|e| BackupError::RemoteAccess(format!("Invalid item in listing: {e}")))?;
        Ok(Item::new(
            id,
            self.title.clone(),
            ItemKind::from_portal_type(&self.item_type),
            folder,
        ))
    }

    /// Folder reference derived from `ownerFolder`
    ///
    /// Only the identifier is known here; the title is the identifier until
    /// the caller fills it in from a folder listing.
    pub fn folder_ref(&self) -> FolderRef {
        match self
            .owner_folder
            .as_deref()
            .filter(|id| !id.trim().is_empty() && *id != "/")
            .and_then(|id| FolderId::new(id).ok())
        {
            Some(id) => FolderRef {
                title: id.as_str().to_string(),
                id: Some(id),
            },
            None => FolderRef::root(),
        }
    }
}

/// `content/users/{user}[/{folderId}]` response page
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserContentResponse {
    /// Folders (only present on the root listing)
    #[serde(default)]
    pub folders: Vec<FolderModel>,

    /// Items on this page
    #[serde(default)]
    pub items: Vec<ItemModel>,

    /// Start index of the next page, `-1` when done
    #[serde(default = "no_next_page")]
    pub next_start: i64,
}

fn no_next_page() -> i64 {
    -1
}

/// Response of the `export` operation
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportJobResponse {
    /// Identifier of the temporary export item
    pub export_item_id: String,

    /// Job identifier for status polling
    pub job_id: String,
}

/// Export job state
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JobStatus {
    /// Still running
    Processing,
    /// Finished and downloadable
    Completed,
    /// Failed on the server
    Failed,
    /// Queued or anything else the portal reports
    #[serde(other)]
    Pending,
}

/// Response of the item `status` operation
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobStatusResponse {
    /// Current job state
    pub status: JobStatus,

    /// Server-provided message, mostly on failure
    #[serde(default)]
    pub status_message: Option<String>,
}

/// Response of the item `delete` operation
#[derive(Debug, Clone, Deserialize)]
pub struct DeleteResponse {
    /// Whether the item was removed
    #[serde(default)]
    pub success: bool,
}
