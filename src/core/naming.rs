//! Default destination naming
//!
//! When the user gives no subpath, each item is backed up into a directory
//! derived from the run date and the item's folder, type and name. The layout
//! is a replaceable policy; the sandbox check applies to whatever it produces.

use crate::domain::{BackupError, Item, Result};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

/// Characters that are not allowed inside a path segment
const INVALID_SEGMENT_CHARS: &[char] = &['/', '\\', ':', '*', '?', '"', '<', '>', '|'];

/// Placeholder for segments that sanitize to nothing
const UNNAMED: &str = "unnamed";

/// Produces the relative subpath an item lands in when none was supplied
pub trait NamingPolicy: Send + Sync + fmt::Debug {
    /// Relative subpath (forward-slash separated) for `item` on `run_date`
    fn default_subpath(&self, item: &Item, run_date: NaiveDate) -> String;
}

/// `YYYYMONDD/<Folder>/<Type>/<Name>`, e.g. `2026FEB11/FieldWork/layer/Roads`
#[derive(Debug, Clone, Copy, Default)]
pub struct DatedLayout;

impl NamingPolicy for DatedLayout {
    fn default_subpath(&self, item: &Item, run_date: NaiveDate) -> String {
        format!(
            "{}/{}",
            date_segment(run_date),
            UndatedLayout.default_subpath(item, run_date)
        )
    }
}

/// `<Folder>/<Type>/<Name>`; repeated runs land in the same directory
#[derive(Debug, Clone, Copy, Default)]
pub struct UndatedLayout;

impl NamingPolicy for UndatedLayout {
    fn default_subpath(&self, item: &Item, _run_date: NaiveDate) -> String {
        format!(
            "{}/{}/{}",
            sanitize_segment(&item.folder.title),
            sanitize_segment(item.kind.tag()),
            sanitize_segment(item.display_name())
        )
    }
}

/// Naming scheme selectable from configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NamingScheme {
    /// [`DatedLayout`]
    #[default]
    Dated,
    /// [`UndatedLayout`]
    Undated,
}

impl NamingScheme {
    /// Instantiate the policy for this scheme
    pub fn policy(self) -> Arc<dyn NamingPolicy> {
        match self {
            NamingScheme::Dated => Arc::new(DatedLayout),
            NamingScheme::Undated => Arc::new(UndatedLayout),
        }
    }
}

impl FromStr for NamingScheme {
    type Err = BackupError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "dated" => Ok(NamingScheme::Dated),
            "undated" => Ok(NamingScheme::Undated),
            other => Err(BackupError::Configuration(format!(
                "Invalid naming scheme '{other}'. Must be one of: dated, undated"
            ))),
        }
    }
}

impl fmt::Display for NamingScheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NamingScheme::Dated => f.write_str("dated"),
            NamingScheme::Undated => f.write_str("undated"),
        }
    }
}

/// `2026FEB11`: four-digit year, upper-case English month abbreviation, day
pub fn date_segment(date: NaiveDate) -> String {
    date.format("%Y%b%d").to_string().to_uppercase()
}

/// Make a display name safe to use as a single path segment
///
/// Trims whitespace, replaces separators, reserved and control characters with
/// `_`, turns dot-only names (`.`, `..`) into underscores and maps empty names
/// to `unnamed`.
pub fn sanitize_segment(name: &str) -> String {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return UNNAMED.to_string();
    }
    if trimmed.chars().all(|c| c == '.') {
        return "_".repeat(trimmed.len());
    }
    trimmed
        .chars()
        .map(|c| {
            if INVALID_SEGMENT_CHARS.contains(&c) || c.is_control() {
                '_'
            } else {
                c
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{FolderId, FolderRef, ItemId, ItemKind};

    fn item(folder: &str, kind: ItemKind, title: &str) -> Item {
        Item::new(
            ItemId::new("abc123").unwrap(),
            title,
            kind,
            FolderRef {
                id: Some(FolderId::new("f1").unwrap()),
                title: folder.to_string(),
            },
        )
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_dated_layout_layer() {
        let roads = item("FieldWork", ItemKind::FeatureLayer, "Roads");
        assert_eq!(
            DatedLayout.default_subpath(&roads, date(2026, 2, 11)),
            "2026FEB11/FieldWork/layer/Roads"
        );
    }

    #[test]
    fn test_dated_layout_map_keeps_spaces() {
        let map = item("My Maps", ItemKind::WebMap, "My Map");
        assert_eq!(
            DatedLayout.default_subpath(&map, date(2026, 2, 11)),
            "2026FEB11/My Maps/map/My Map"
        );
    }

    #[test]
    fn test_date_segment_pads_day_and_uppercases_month() {
        assert_eq!(date_segment(date(2025, 12, 3)), "2025DEC03");
        assert_eq!(date_segment(date(2026, 1, 15)), "2026JAN15");
    }

    #[test]
    fn test_undated_layout_ignores_date() {
        let roads = item("FieldWork", ItemKind::FeatureLayer, "Roads");
        assert_eq!(
            UndatedLayout.default_subpath(&roads, date(2026, 2, 11)),
            UndatedLayout.default_subpath(&roads, date(2030, 7, 1))
        );
    }

    #[test]
    fn test_sanitize_invalid_characters() {
        assert_eq!(sanitize_segment("My/Folder:Name"), "My_Folder_Name");
        assert_eq!(
            sanitize_segment("Layer with?invalid*chars"),
            "Layer with_invalid_chars"
        );
        assert_eq!(sanitize_segment("a\\b|c<d>e\"f"), "a_b_c_d_e_f");
    }

    #[test]
    fn test_sanitize_empty_and_whitespace() {
        assert_eq!(sanitize_segment(""), "unnamed");
        assert_eq!(sanitize_segment("   "), "unnamed");
        assert_eq!(sanitize_segment("  Folder  "), "Folder");
    }

    #[test]
    fn test_sanitize_dot_segments() {
        assert_eq!(sanitize_segment(".."), "__");
        assert_eq!(sanitize_segment("."), "_");
        assert_eq!(sanitize_segment("v1.2"), "v1.2");
    }

    #[test]
    fn test_empty_folder_title_becomes_unnamed() {
        let map = item("", ItemKind::WebMap, "My Map");
        assert_eq!(
            DatedLayout.default_subpath(&map, date(2026, 2, 11)),
            "2026FEB11/unnamed/map/My Map"
        );
    }

    #[test]
    fn test_naming_scheme_parse() {
        assert_eq!("dated".parse::<NamingScheme>().unwrap(), NamingScheme::Dated);
        assert_eq!(
            "Undated".parse::<NamingScheme>().unwrap(),
            NamingScheme::Undated
        );
        assert!("weekly".parse::<NamingScheme>().is_err());
        assert_eq!(NamingScheme::default(), NamingScheme::Dated);
    }
}
