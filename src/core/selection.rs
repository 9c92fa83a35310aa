//! Parsing of free-form selection input
//!
//! Two input styles are supported: comma-separated 1-based indices for the
//! numbered-list flow, and comma/newline-separated identifiers for the pasted
//! identifier flow. Both reject empty or malformed input instead of silently
//! proceeding with zero items.

use crate::domain::{BackupError, ItemId, Result};
use std::collections::{BTreeSet, HashSet};

/// Parse `1,3,5` style input against a listing of `upper_bound` entries
///
/// Tokens are trimmed; empty tokens between commas are skipped. Duplicate
/// indices collapse.
///
/// # Errors
///
/// Returns `InvalidSelection` naming the offending token when a token is not
/// a number, is below 1 or above `upper_bound`, and when no index was given.
///
/// # Examples
///
/// ```
/// use ago_backup::core::selection::parse_indices;
///
/// let picked = parse_indices("1, 3,5", 5).unwrap();
/// assert_eq!(picked.into_iter().collect::<Vec<_>>(), vec![1, 3, 5]);
/// assert!(parse_indices("1,9", 5).is_err());
/// ```
pub fn parse_indices(input: &str, upper_bound: usize) -> Result<BTreeSet<usize>> {
    let mut indices = BTreeSet::new();

    for token in input.split(',').map(str::trim).filter(|t| !t.is_empty()) {
        let value: i64 = token.parse().map_err(|_| {
            BackupError::InvalidSelection(format!("Invalid number: '{token}'"))
        })?;

        if value < 1 || value as u64 > upper_bound as u64 {
            return Err(BackupError::InvalidSelection(format!(
                "Number '{token}' out of range (1-{upper_bound})"
            )));
        }

        indices.insert(value as usize);
    }

    if indices.is_empty() {
        return Err(BackupError::InvalidSelection(
            "No items selected".to_string(),
        ));
    }

    Ok(indices)
}

/// Parse a single 1-based index, e.g. a folder number
///
/// # Errors
///
/// Returns `InvalidSelection` if the input is not exactly one index in range.
pub fn parse_single_index(input: &str, upper_bound: usize) -> Result<usize> {
    let indices = parse_indices(input, upper_bound)?;
    let mut iter = indices.into_iter();
    match (iter.next(), iter.next()) {
        (Some(index), None) => Ok(index),
        _ => Err(BackupError::InvalidSelection(format!(
            "Enter a single number between 1 and {upper_bound}"
        ))),
    }
}

/// Parse pasted identifiers separated by commas or any whitespace
///
/// Tokens are trimmed, empty tokens dropped and duplicates collapsed; the
/// first occurrence keeps its position.
///
/// # Errors
///
/// Returns `InvalidSelection` if no identifier remains, or naming the token
/// if one is not a well-formed identifier.
///
/// # Examples
///
/// ```
/// use ago_backup::core::selection::parse_identifiers;
///
/// let ids = parse_identifiers("abc123\nabc123, def456").unwrap();
/// let ids: Vec<&str> = ids.iter().map(|id| id.as_str()).collect();
/// assert_eq!(ids, vec!["abc123", "def456"]);
/// ```
pub fn parse_identifiers(input: &str) -> Result<Vec<ItemId>> {
    let mut seen = HashSet::new();
    let mut identifiers = Vec::new();

    for token in input
        .split(|c: char| c == ',' || c.is_whitespace())
        .filter(|t| !t.is_empty())
    {
        let id = ItemId::new(token).map_err(|e| {
            BackupError::InvalidSelection(format!("Invalid item ID '{token}': {e}"))
        })?;
        if seen.insert(id.clone()) {
            identifiers.push(id);
        }
    }

    if identifiers.is_empty() {
        return Err(BackupError::InvalidSelection(
            "Enter at least one item ID to back up".to_string(),
        ));
    }

    Ok(identifiers)
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test]
    fn test_parse_indices_basic() {
        let picked = parse_indices("1,3,5", 5).unwrap();
        assert_eq!(picked, BTreeSet::from([1, 3, 5]));
    }

    #[test]
    fn test_parse_indices_duplicates_and_spaces() {
        let picked = parse_indices(" 2 , 2,1 ,", 3).unwrap();
        assert_eq!(picked, BTreeSet::from([1, 2]));
    }

    #[test_case("1,9", "9" ; "above upper bound")]
    #[test_case("0", "0" ; "below one")]
    #[test_case("-2", "-2" ; "negative")]
    #[test_case("1,x", "x" ; "not a number")]
    #[test_case("2.5", "2.5" ; "fraction")]
    fn test_parse_indices_names_offending_token(input: &str, token: &str) {
        let err = parse_indices(input, 5).unwrap_err();
        assert!(matches!(err, BackupError::InvalidSelection(_)));
        assert!(err.to_string().contains(&format!("'{token}'")));
    }

    #[test_case("" ; "empty")]
    #[test_case("   " ; "blank")]
    #[test_case(",," ; "only separators")]
    fn test_parse_indices_empty_rejected(input: &str) {
        assert!(matches!(
            parse_indices(input, 5),
            Err(BackupError::InvalidSelection(_))
        ));
    }

    #[test]
    fn test_parse_indices_empty_listing_rejects_everything() {
        assert!(parse_indices("1", 0).is_err());
    }

    #[test]
    fn test_parse_single_index() {
        assert_eq!(parse_single_index(" 2 ", 3).unwrap(), 2);
        assert!(parse_single_index("1,2", 3).is_err());
        assert!(parse_single_index("4", 3).is_err());
    }

    #[test]
    fn test_parse_identifiers_dedup_across_separators() {
        let ids = parse_identifiers("abc123\nabc123, def456").unwrap();
        let ids: Vec<&str> = ids.iter().map(ItemId::as_str).collect();
        assert_eq!(ids, vec!["abc123", "def456"]);
    }

    #[test]
    fn test_parse_identifiers_windows_line_endings() {
        let ids = parse_identifiers("a1\r\nb2\r\n").unwrap();
        assert_eq!(ids.len(), 2);
    }

    #[test_case("" ; "empty")]
    #[test_case(" , \n ," ; "only separators")]
    fn test_parse_identifiers_empty_rejected(input: &str) {
        assert!(matches!(
            parse_identifiers(input),
            Err(BackupError::InvalidSelection(_))
        ));
    }

    #[test]
    fn test_parse_identifiers_spaces_and_tabs_separate() {
        let ids = parse_identifiers("abc123 def456\tghi789").unwrap();
        let ids: Vec<&str> = ids.iter().map(ItemId::as_str).collect();
        assert_eq!(ids, vec!["abc123", "def456", "ghi789"]);
    }

    #[test]
    fn test_parse_identifiers_pasted_table_row() {
        let ids = parse_identifiers("  a1 ,\tb2   c3\r\n a1").unwrap();
        assert_eq!(ids.len(), 3);
    }

    #[test]
    fn test_parse_identifiers_names_malformed_token() {
        let err = parse_identifiers("abc123 bad\u{7}id").unwrap_err();
        assert!(matches!(err, BackupError::InvalidSelection(_)));
        assert!(err.to_string().contains("'bad\u{7}id'"));
    }
}
