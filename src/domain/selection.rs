//! The set of items chosen for one backup run

use super::content::Item;
use super::errors::BackupError;
use super::result::Result;
use std::collections::{BTreeSet, HashSet};

/// Ordered, duplicate-free set of items for a single backup run
///
/// Built once per invocation and immutable afterwards. Items keep the order
/// they were chosen in; an item appearing twice is kept at its first position.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selection {
    items: Vec<Item>,
}

impl Selection {
    /// Build a selection from items, collapsing duplicate identifiers
    ///
    /// # Errors
    ///
    /// Returns `InvalidSelection` if no items remain.
    pub fn new(items: impl IntoIterator<Item = Item>) -> Result<Self> {
        let mut seen = HashSet::new();
        let items: Vec<Item> = items
            .into_iter()
            .filter(|item| seen.insert(item.id.clone()))
            .collect();

        if items.is_empty() {
            return Err(BackupError::InvalidSelection(
                "No items selected".to_string(),
            ));
        }

        Ok(Self { items })
    }

    /// Pick items out of a 1-indexed listing
    ///
    /// # Errors
    ///
    /// Returns `InvalidSelection` if an index is outside the listing or no
    /// index was given.
    pub fn from_indices(listing: &[Item], indices: &BTreeSet<usize>) -> Result<Self> {
        let mut picked = Vec::with_capacity(indices.len());
        for &index in indices {
            let item = index
                .checked_sub(1)
                .and_then(|i| listing.get(i))
                .ok_or_else(|| {
                    BackupError::InvalidSelection(format!(
                        "Number {index} out of range (1-{})",
                        listing.len()
                    ))
                })?;
            picked.push(item.clone());
        }
        Self::new(picked)
    }

    /// Items in selection order
    pub fn items(&self) -> &[Item] {
        &self.items
    }

    /// Number of selected items
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Always false for a constructed selection
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

impl<'a> IntoIterator for &'a Selection {
    type Item = &'a Item;
    type IntoIter = std::slice::Iter<'a, Item>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::content::{FolderRef, ItemKind};
    use crate::domain::ids::ItemId;

    fn item(id: &str) -> Item {
        Item::new(
            ItemId::new(id).unwrap(),
            id.to_uppercase(),
            ItemKind::FeatureLayer,
            FolderRef::root(),
        )
    }

    #[test]
    fn test_selection_collapses_duplicates_keeping_first_position() {
        let selection = Selection::new(vec![item("a"), item("b"), item("a")]).unwrap();
        let ids: Vec<&str> = selection.items().iter().map(|i| i.id.as_str()).collect();
        assert_eq!(ids, vec!["a", "b"]);
    }

    #[test]
    fn test_empty_selection_rejected() {
        let result = Selection::new(Vec::new());
        assert!(matches!(result, Err(BackupError::InvalidSelection(_))));
    }

    #[test]
    fn test_from_indices_is_one_based() {
        let listing = vec![item("a"), item("b"), item("c")];
        let indices: BTreeSet<usize> = [1, 3].into_iter().collect();
        let selection = Selection::from_indices(&listing, &indices).unwrap();
        let ids: Vec<&str> = selection.into_iter().map(|i| i.id.as_str()).collect();
        assert_eq!(ids, vec!["a", "c"]);
    }

    #[test]
    fn test_from_indices_out_of_range() {
        let listing = vec![item("a")];
        let indices: BTreeSet<usize> = [0].into_iter().collect();
        assert!(Selection::from_indices(&listing, &indices).is_err());

        let indices: BTreeSet<usize> = [2].into_iter().collect();
        let err = Selection::from_indices(&listing, &indices).unwrap_err();
        assert!(err.to_string().contains("2"));
    }
}
