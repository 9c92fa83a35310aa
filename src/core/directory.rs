//! Content enumeration for selection
//!
//! Wraps a [`ContentStore`] with the rules the front ends rely on: folders in
//! store order, items filtered to backupable kinds, and identifier lookups
//! validated as a batch.

use crate::adapters::{ContentStore, Session};
use crate::domain::{BackupError, Folder, FolderId, Item, ItemId, Result, ROOT_FOLDER_TITLE};
use std::collections::HashMap;
use std::sync::Arc;

/// Read-only view of the user's content
#[derive(Clone)]
pub struct ContentDirectory {
    store: Arc<dyn ContentStore>,
}

impl ContentDirectory {
    /// Create a directory over `store`
    pub fn new(store: Arc<dyn ContentStore>) -> Self {
        Self { store }
    }

    /// The underlying store
    pub fn store(&self) -> &Arc<dyn ContentStore> {
        &self.store
    }

    /// Folders of the authenticated user, in store order
    ///
    /// An empty list is a valid result; callers decide how to report it.
    ///
    /// # Errors
    ///
    /// Propagates `RemoteAccess` / `Authentication` from the store.
    pub async fn list_folders(&self, session: &Session) -> Result<Vec<Folder>> {
        let folders = self.store.list_folders(session).await?;
        tracing::debug!(count = folders.len(), "Folders available");
        Ok(folders)
    }

    /// Backupable items in `folder`, in store order
    ///
    /// Items of other kinds are dropped here so no front end can offer them.
    ///
    /// # Errors
    ///
    /// Propagates `RemoteAccess` / `Authentication` from the store.
    pub async fn list_items(&self, session: &Session, folder: &Folder) -> Result<Vec<Item>> {
        let all = self.store.list_items(session, folder).await?;
        let total = all.len();

        let items: Vec<Item> = all
            .into_iter()
            .filter(|item| item.kind.is_backupable())
            .collect();

        tracing::debug!(
            folder = %folder.display_name(),
            total = total,
            backupable = items.len(),
            "Listed folder items"
        );

        Ok(items)
    }

    /// Look up pasted identifiers and return the matching items in input order
    ///
    /// Folder titles are filled in from the folder listing; items in the root
    /// content folder are placed in a folder named `root`.
    ///
    /// # Errors
    ///
    /// Returns one `InvalidSelection` listing every identifier that does not
    /// exist, is inaccessible or names a kind that cannot be backed up.
    /// Store failures propagate unchanged.
    pub async fn resolve_identifiers(&self, session: &Session, ids: &[ItemId]) -> Result<Vec<Item>> {
        let mut resolved = Vec::with_capacity(ids.len());
        let mut missing = Vec::new();
        let mut unsupported = Vec::new();

        for id in ids {
            match self.store.get_item(session, id).await? {
                Some(item) if item.kind.is_backupable() => resolved.push(item),
                Some(item) => unsupported.push(format!("{id} ({})", item.kind)),
                None => missing.push(id.to_string()),
            }
        }

        if !missing.is_empty() || !unsupported.is_empty() {
            let mut problems = Vec::new();
            if !missing.is_empty() {
                problems.push(format!("not found or inaccessible: {}", missing.join(", ")));
            }
            if !unsupported.is_empty() {
                problems.push(format!(
                    "not a feature layer or web map: {}",
                    unsupported.join(", ")
                ));
            }
            return Err(BackupError::InvalidSelection(format!(
                "Item IDs {}",
                problems.join("; ")
            )));
        }

        let titles: HashMap<FolderId, String> =
            if resolved.iter().any(|item| item.folder.id.is_some()) {
                self.store
                    .list_folders(session)
                    .await?
                    .into_iter()
                    .map(|folder| (folder.id.clone(), folder.display_name().to_string()))
                    .collect()
            } else {
                HashMap::new()
            };

        for item in &mut resolved {
            item.folder.title = match &item.folder.id {
                Some(id) => titles
                    .get(id)
                    .cloned()
                    .unwrap_or_else(|| id.as_str().to_string()),
                None => ROOT_FOLDER_TITLE.to_string(),
            };
        }

        Ok(resolved)
    }
}
