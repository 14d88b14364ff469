//! Handler for short link redirects.

use axum::{
    extract::State,
    http::{StatusCode, Uri, header},
    response::{IntoResponse, Response},
};
use tracing::debug;

use crate::api::middleware::CurrentUser;
use crate::error::AppError;
use crate::state::AppState;

/// Redirects a short link to its destination.
///
/// # Endpoint
///
/// `GET /{short}[/{rest}]`
///
/// # Request Flow
///
/// 1. Split the raw request URI into the short name and the remainder
/// 2. `{short}+` redirects to the detail endpoint instead
/// 3. Resolve the link, expanding templates and following aliases
/// 4. Record a click for the short name
/// 5. Return 302 Found
///
/// The remainder is taken from the undecoded request URI, query included,
/// so `/search/a%2Fb?x=1` expands `{{.Path}}` to `a%2Fb?x=1`.
///
/// # Errors
///
/// - 404 Not Found if the link (or an alias target) does not exist
/// - 401 Unauthorized if the destination needs `{{.User}}` and there is no user
/// - 500 Internal Server Error for failing templates, alias loops and
///   storage failures
pub async fn redirect_handler(
    State(state): State<AppState>,
    user: CurrentUser,
    uri: Uri,
) -> Result<Response, AppError> {
    let request_uri = uri.path_and_query().map_or("/", |pq| pq.as_str());
    let (short, remainder) = split_request_uri(request_uri);

    if let Some(name) = short.strip_suffix('+') {
        return Ok(found(&format!("/.detail/{name}")));
    }

    let destination = state
        .resolver
        .resolve_short(short, remainder, user.as_deref())
        .await
        .inspect_err(|e| debug!(short, error = %e, "Failed to resolve link"))?;

    state.click_stats.record_click(short);
    debug!(short, destination = %destination, "Redirecting");

    Ok(found(&destination))
}

/// `/meet/a/b?x=1` -> (`meet`, `a/b?x=1`)
fn split_request_uri(request_uri: &str) -> (&str, &str) {
    let uri = request_uri.strip_prefix('/').unwrap_or(request_uri);
    uri.split_once('/').unwrap_or((uri, ""))
}

fn found(location: &str) -> Response {
    (StatusCode::FOUND, [(header::LOCATION, location.to_string())]).into_response()
}
