//! Handlers for creating, inspecting, deleting and exporting links.

use axum::{
    Form, Json,
    extract::{Path, State},
    http::header,
    response::IntoResponse,
};
use validator::Validate;

use crate::api::dto::link::SaveLinkRequest;
use crate::api::middleware::CurrentUser;
use crate::domain::entities::Link;
use crate::error::AppError;
use crate::state::AppState;

/// Creates or updates a link from a form post.
///
/// # Endpoint
///
/// `POST /` with `application/x-www-form-urlencoded` fields `short`, `long`
/// and optional `owner`.
///
/// The owner defaults to the current user. Saving an existing link keeps
/// its creation time.
///
/// # Errors
///
/// - 400 Bad Request for a missing or malformed short name, a missing
///   destination or a destination template that does not parse
/// - 500 Internal Server Error on storage failures
pub async fn save_link_handler(
    State(state): State<AppState>,
    user: CurrentUser,
    Form(payload): Form<SaveLinkRequest>,
) -> Result<Json<Link>, AppError> {
    payload.validate()?;

    let link = state
        .link_service
        .save(payload.into(), user.as_deref())
        .await?;

    Ok(Json(link))
}

/// Returns a stored link.
///
/// # Endpoint
///
/// `GET /.detail/{short}`
///
/// # Errors
///
/// Returns 404 Not Found if no link has this name.
pub async fn link_detail_handler(
    State(state): State<AppState>,
    Path(short): Path<String>,
) -> Result<Json<Link>, AppError> {
    Ok(Json(state.link_service.get(&short).await?))
}

/// Deletes a link and its click counts, returning the deleted link.
///
/// # Endpoint
///
/// `POST /.delete/{short}`
///
/// # Errors
///
/// Returns 404 Not Found if no link has this name.
pub async fn delete_link_handler(
    State(state): State<AppState>,
    Path(short): Path<String>,
) -> Result<Json<Link>, AppError> {
    Ok(Json(state.link_service.delete(&short).await?))
}

/// Lists every link ordered by short name.
///
/// # Endpoint
///
/// `GET /.all`
///
/// Pending clicks are flushed first.
pub async fn all_links_handler(State(state): State<AppState>) -> Result<Json<Vec<Link>>, AppError> {
    Ok(Json(state.link_service.list().await?))
}

/// Exports every link as JSON lines ordered by short name.
///
/// # Endpoint
///
/// `GET /.export`
///
/// The body is the snapshot format accepted by `SNAPSHOT_PATH` at startup.
/// Pending clicks are flushed first.
pub async fn export_handler(State(state): State<AppState>) -> Result<impl IntoResponse, AppError> {
    let body = state.link_service.export().await?;
    Ok(([(header::CONTENT_TYPE, "application/x-ndjson")], body))
}
