//! Core domain entities.
//!
//! - [`Link`] - A short name and its destination pattern
//! - [`ClickStats`] - Click counters keyed by normalized short name
//! - [`ClickCount`] - One leaderboard row

pub mod click_stats;
pub mod link;

pub use click_stats::{ClickCount, ClickStats};
pub use link::Link;
