//! Click counters keyed by normalized short name.

use std::collections::HashMap;

/// The number of clicks a set of links have received.
///
/// Keyed by normalized link ID (see [`crate::utils::link_id::link_id`]). Used
/// both for totals and for the pending deltas awaiting a flush.
pub type ClickStats = HashMap<String, u64>;

/// A single row of the click leaderboard.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClickCount {
    pub short: String,
    pub clicks: u64,
}
