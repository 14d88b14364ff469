//! Handler for the service root.

use axum::{Json, extract::State};

use crate::api::dto::home::{ClickCountDto, HOME_CLICK_LIMIT, HomeResponse};
use crate::state::AppState;

/// Returns the most clicked links.
///
/// # Endpoint
///
/// `GET /`
///
/// Counts come from memory and include clicks not yet flushed.
pub async fn home_handler(State(state): State<AppState>) -> Json<HomeResponse> {
    let clicks = state
        .click_stats
        .top(HOME_CLICK_LIMIT)
        .into_iter()
        .map(ClickCountDto::from)
        .collect();

    Json(HomeResponse { clicks })
}
