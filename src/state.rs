//! Shared application state for Axum handlers.

use std::sync::Arc;

use crate::application::services::{ClickStatsAggregator, LinkService, Resolver};
use crate::domain::repositories::{LinkRepository, StatsRepository};

/// Identity used in dev mode, where no proxy supplies a user header.
pub const DEV_USER: &str = "foo@example.com";

/// How the current user is determined for a request.
#[derive(Debug, Clone, Default)]
pub struct Identity {
    /// Header set by the authenticating proxy in front of the service.
    pub user_header: Option<String>,
    /// Fallback user when the header is absent.
    pub fallback_user: Option<String>,
}

impl Identity {
    /// Identity for dev mode: every request without a header is [`DEV_USER`].
    pub fn dev(user_header: Option<String>) -> Self {
        Self {
            user_header,
            fallback_user: Some(DEV_USER.to_string()),
        }
    }
}

/// Application state shared across all HTTP handlers.
///
/// Cloned per request by Axum; every field is behind an `Arc`. Storage is
/// held as trait objects so the same state works with the PostgreSQL and the
/// in-memory backends.
#[derive(Clone)]
pub struct AppState {
    pub links: Arc<dyn LinkRepository>,
    pub resolver: Arc<Resolver<dyn LinkRepository>>,
    pub link_service: Arc<LinkService<dyn LinkRepository, dyn StatsRepository>>,
    pub click_stats: Arc<ClickStatsAggregator<dyn StatsRepository>>,
    pub identity: Identity,
}

impl AppState {
    /// Wires services on top of the given storage.
    pub fn new(
        links: Arc<dyn LinkRepository>,
        stats: Arc<dyn StatsRepository>,
        hostname: impl Into<String>,
        identity: Identity,
    ) -> Self {
        let click_stats = Arc::new(ClickStatsAggregator::new(stats));
        let resolver = Arc::new(Resolver::new(links.clone(), hostname));
        let link_service = Arc::new(LinkService::new(links.clone(), click_stats.clone()));

        Self {
            links,
            resolver,
            link_service,
            click_stats,
            identity,
        }
    }
}
