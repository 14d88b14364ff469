//! Application layer services implementing business logic.
//!
//! Services consume repository traits and provide a clean API for HTTP
//! handlers and the command line.
//!
//! # Available Services
//!
//! - [`services::resolver::Resolver`] - Short name to destination URL
//! - [`services::click_stats::ClickStatsAggregator`] - Batched click counters
//! - [`services::link_service::LinkService`] - Save, delete, list and export links

pub mod services;
