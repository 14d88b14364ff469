//! Link management route configuration.
//!
//! Management endpoints live under dot-prefixed paths, which can never be
//! short names.

use crate::api::handlers::{
    all_links_handler, delete_link_handler, export_handler, health_handler, home_handler,
    link_detail_handler, save_link_handler,
};
use crate::state::AppState;
use axum::{
    Router,
    routing::{get, post},
};

/// Routes for the home page and link management.
///
/// # Endpoints
///
/// - `GET  /`                 - Most clicked links
/// - `POST /`                 - Create or update a link (form)
/// - `GET  /.detail/{short}`  - A stored link
/// - `POST /.delete/{short}`  - Delete a link and its click counts
/// - `GET  /.all`             - All links, ordered by short name
/// - `GET  /.export`          - All links as JSON lines
/// - `GET  /.health`          - Storage and click stats health
pub fn management_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(home_handler).post(save_link_handler))
        .route("/.detail/{short}", get(link_detail_handler))
        .route("/.delete/{short}", post(delete_link_handler))
        .route("/.all", get(all_links_handler))
        .route("/.export", get(export_handler))
        .route("/.health", get(health_handler))
}
