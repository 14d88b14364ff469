//! Top-level router configuration.
//!
//! # Route Structure
//!
//! - `GET  /{short}[/rest]`  - Short link redirect
//! - `GET  /{short}+`        - Redirect to the link's detail
//! - `/` and `/.{action}`    - Link management, see [`crate::api::routes`]
//!
//! Paths are not normalized: a trailing slash is part of the remainder
//! passed to templates.
//!
//! # Middleware
//!
//! - **Tracing** - Structured request/response logging

use crate::api;
use crate::api::handlers::redirect_handler;
use crate::api::middleware::tracing;
use crate::state::AppState;
use axum::Router;
use axum::routing::get;

/// Constructs the application router with all routes and middleware.
pub fn app_router(state: AppState) -> Router {
    Router::new()
        .merge(api::routes::management_routes())
        .route("/{*path}", get(redirect_handler))
        .with_state(state)
        .layer(tracing::layer())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::persistence::{MemoryLinkRepository, MemoryStatsRepository};
    use crate::state::Identity;
    use axum::body::Body;
    use axum::http::{Request, StatusCode, header};
    use std::sync::Arc;
    use tower::ServiceExt;

    fn test_app() -> Router {
        let state = AppState::new(
            Arc::new(MemoryLinkRepository::new()),
            Arc::new(MemoryStatsRepository::new()),
            "go",
            Identity::default(),
        );
        app_router(state)
    }

    async fn get(uri: &str) -> axum::response::Response {
        test_app()
            .oneshot(Request::get(uri).body(Body::empty()).unwrap())
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn test_management_routes_win_over_links() {
        assert_eq!(get("/.health").await.status(), StatusCode::OK);
        assert_eq!(get("/").await.status(), StatusCode::OK);
        assert_eq!(get("/.all").await.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_other_paths_are_links() {
        assert_eq!(get("/health").await.status(), StatusCode::NOT_FOUND);
        assert_eq!(get("/some/deep/path/").await.status(), StatusCode::NOT_FOUND);

        let response = get("/wiki+").await;
        assert_eq!(response.status(), StatusCode::FOUND);
        assert_eq!(response.headers()[header::LOCATION], "/.detail/wiki");
    }
}
