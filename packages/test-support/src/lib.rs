//! Test support utilities for generating unique test data
//!
//! This crate provides helpers to generate unique player names and peer
//! identifiers using ULIDs, so tests never collide on display names or
//! transport addresses between runs.

use ulid::Ulid;

/// Generate a unique string with the given prefix
///
/// # Examples
/// ```
/// use test_support::unique_str;
///
/// let id1 = unique_str("peer");
/// let id2 = unique_str("peer");
/// assert_ne!(id1, id2);
/// assert!(id1.starts_with("peer-"));
/// ```
pub fn unique_str(prefix: &str) -> String {
    format!("{}-{}", prefix, Ulid::new())
}

/// Generate a unique player display name.
///
/// Display names must be short enough for the lobby roster, so the ULID
/// is truncated to its random tail.
///
/// # Examples
/// ```
/// use test_support::unique_player_name;
///
/// let name1 = unique_player_name();
/// let name2 = unique_player_name();
/// assert_ne!(name1, name2);
/// ```
pub fn unique_player_name() -> String {
    let ulid = Ulid::new().to_string();
    format!("player-{}", &ulid[ulid.len() - 8..])
}
