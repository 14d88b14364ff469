//! Business logic services for the application layer.

pub mod click_stats;
pub mod link_service;
pub mod resolver;

pub use click_stats::ClickStatsAggregator;
pub use link_service::{LinkService, LinkServiceError, SaveLink};
pub use resolver::{MAX_ALIAS_HOPS, ResolveError, Resolver};
