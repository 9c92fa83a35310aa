//! Remote content models
//!
//! Folders and items as enumerated from the user's content. These are fetched
//! fresh per session and never mutated by the backup core.

use super::ids::{FolderId, ItemId};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Display name used for items that live in the user's root content folder
pub const ROOT_FOLDER_TITLE: &str = "root";

/// A named container in the user's content
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Folder {
    /// Opaque folder identifier
    pub id: FolderId,

    /// Display name
    pub title: String,
}

impl Folder {
    /// Create a new folder
    pub fn new(id: FolderId, title: impl Into<String>) -> Self {
        Self {
            id,
            title: title.into(),
        }
    }

    /// Title shown in listings; falls back to the identifier when blank
    pub fn display_name(&self) -> &str {
        if self.title.trim().is_empty() {
            self.id.as_str()
        } else {
            &self.title
        }
    }
}

/// Weak reference from an item to its owning folder (lookup only)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FolderRef {
    /// Folder identifier, `None` for the root content folder
    pub id: Option<FolderId>,

    /// Folder display name at the time the item was listed
    pub title: String,
}

impl FolderRef {
    /// Reference to the root content folder
    pub fn root() -> Self {
        Self {
            id: None,
            title: ROOT_FOLDER_TITLE.to_string(),
        }
    }
}

impl From<&Folder> for FolderRef {
    fn from(folder: &Folder) -> Self {
        Self {
            id: Some(folder.id.clone()),
            title: folder.display_name().to_string(),
        }
    }
}

/// Kind of item as reported by the remote store
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ItemKind {
    /// Hosted feature layer ("Feature Service")
    FeatureLayer,
    /// Web map ("Web Map")
    WebMap,
    /// Any other portal item type; never offered for backup
    Other(String),
}

impl ItemKind {
    /// Map the portal's `type` string onto an item kind
    pub fn from_portal_type(portal_type: &str) -> Self {
        match portal_type.trim() {
            "Feature Service" => ItemKind::FeatureLayer,
            "Web Map" => ItemKind::WebMap,
            other => ItemKind::Other(other.to_string()),
        }
    }

    /// Whether items of this kind can be exported
    pub fn is_backupable(&self) -> bool {
        !matches!(self, ItemKind::Other(_))
    }

    /// Short type tag used in destination paths (`layer` / `map`)
    pub fn tag(&self) -> &str {
        match self {
            ItemKind::FeatureLayer => "layer",
            ItemKind::WebMap => "map",
            ItemKind::Other(portal_type) => portal_type,
        }
    }
}

impl fmt::Display for ItemKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ItemKind::FeatureLayer => f.write_str("Feature Service"),
            ItemKind::WebMap => f.write_str("Web Map"),
            ItemKind::Other(portal_type) => f.write_str(portal_type),
        }
    }
}

/// A unit of content that may be backed up
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Item {
    /// Opaque item identifier
    pub id: ItemId,

    /// Display name
    pub title: String,

    /// Item kind
    pub kind: ItemKind,

    /// Owning folder
    pub folder: FolderRef,
}

impl Item {
    /// Create a new item
    pub fn new(id: ItemId, title: impl Into<String>, kind: ItemKind, folder: FolderRef) -> Self {
        Self {
            id,
            title: title.into(),
            kind,
            folder,
        }
    }

    /// Title shown in listings and used for naming; falls back to the identifier
    pub fn display_name(&self) -> &str {
        if self.title.trim().is_empty() {
            self.id.as_str()
        } else {
            &self.title
        }
    }
}
