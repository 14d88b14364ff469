#![allow(dead_code)]

use chrono::Utc;
use golinks::domain::entities::Link;
use golinks::infrastructure::persistence::{MemoryLinkRepository, MemoryStatsRepository};
use golinks::state::{AppState, Identity};
use std::sync::Arc;

pub const HOSTNAME: &str = "go";
pub const USER_HEADER: &str = "X-Forwarded-User";

/// State over in-memory storage, reading the user from [`USER_HEADER`].
pub fn create_test_state() -> AppState {
    AppState::new(
        Arc::new(MemoryLinkRepository::new()),
        Arc::new(MemoryStatsRepository::new()),
        HOSTNAME,
        Identity {
            user_header: Some(USER_HEADER.to_string()),
            fallback_user: None,
        },
    )
}

/// State over in-memory storage in dev mode.
pub fn create_dev_state() -> AppState {
    AppState::new(
        Arc::new(MemoryLinkRepository::new()),
        Arc::new(MemoryStatsRepository::new()),
        HOSTNAME,
        Identity::dev(None),
    )
}

pub async fn create_test_link(state: &AppState, short: &str, long: &str) {
    state
        .links
        .save(Link::new(short, long, "owner@example.com", Utc::now()))
        .await
        .unwrap();
}
