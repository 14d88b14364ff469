//! DTOs for the home endpoint.

use serde::Serialize;

use crate::domain::entities::ClickCount;

/// Number of leaderboard rows on the home endpoint.
pub const HOME_CLICK_LIMIT: usize = 200;

/// Most clicked links, highest first.
#[derive(Debug, Serialize)]
pub struct HomeResponse {
    pub clicks: Vec<ClickCountDto>,
}

#[derive(Debug, Serialize)]
pub struct ClickCountDto {
    pub short: String,
    pub clicks: u64,
}

impl From<ClickCount> for ClickCountDto {
    fn from(count: ClickCount) -> Self {
        Self {
            short: count.short,
            clicks: count.clicks,
        }
    }
}
