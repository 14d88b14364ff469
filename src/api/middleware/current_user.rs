//! Extractor for the user making a request.

use std::convert::Infallible;

use axum::{extract::FromRequestParts, http::request::Parts};

use crate::state::{AppState, Identity};

/// The authenticated user, if any.
///
/// The service does no authentication of its own. The user comes from the
/// header named by [`Identity::user_header`], which the proxy in front of the
/// service is expected to set, or from [`Identity::fallback_user`] in dev
/// mode. Requests with neither are anonymous; templates that read
/// `{{.User}}` then fail with 401.
///
/// # Example
///
/// ```rust,ignore
/// async fn handler(CurrentUser(user): CurrentUser) {
///     if let Some(login) = user { /* ... */ }
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CurrentUser(pub Option<String>);

impl CurrentUser {
    pub fn as_deref(&self) -> Option<&str> {
        self.0.as_deref()
    }

    fn from_parts(parts: &Parts, identity: &Identity) -> Self {
        let from_header = identity
            .user_header
            .as_deref()
            .and_then(|name| parts.headers.get(name))
            .and_then(|value| value.to_str().ok())
            .map(str::trim)
            .filter(|login| !login.is_empty())
            .map(str::to_string);

        Self(from_header.or_else(|| identity.fallback_user.clone()))
    }
}

impl FromRequestParts<AppState> for CurrentUser {
    type Rejection = Infallible;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        Ok(Self::from_parts(parts, &state.identity))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::DEV_USER;
    use axum::http::Request;

    fn parts(headers: &[(&str, &str)]) -> Parts {
        let mut builder = Request::builder().uri("/");
        for (name, value) in headers {
            builder = builder.header(*name, *value);
        }
        builder.body(()).unwrap().into_parts().0
    }

    #[test]
    fn test_user_from_header() {
        let identity = Identity {
            user_header: Some("X-Forwarded-User".to_string()),
            fallback_user: None,
        };

        let user = CurrentUser::from_parts(&parts(&[("x-forwarded-user", "alice")]), &identity);
        assert_eq!(user.as_deref(), Some("alice"));
    }

    #[test]
    fn test_anonymous_without_header() {
        let identity = Identity {
            user_header: Some("X-Forwarded-User".to_string()),
            fallback_user: None,
        };

        assert_eq!(CurrentUser::from_parts(&parts(&[]), &identity).0, None);
        assert_eq!(
            CurrentUser::from_parts(&parts(&[("x-forwarded-user", " ")]), &identity).0,
            None
        );
    }

    #[test]
    fn test_header_ignored_when_not_configured() {
        let identity = Identity::default();
        let user = CurrentUser::from_parts(&parts(&[("x-forwarded-user", "alice")]), &identity);
        assert_eq!(user.0, None);
    }

    #[test]
    fn test_dev_fallback() {
        let identity = Identity::dev(Some("X-Forwarded-User".to_string()));

        assert_eq!(
            CurrentUser::from_parts(&parts(&[]), &identity).as_deref(),
            Some(DEV_USER)
        );
        assert_eq!(
            CurrentUser::from_parts(&parts(&[("x-forwarded-user", "bob")]), &identity).as_deref(),
            Some("bob")
        );
    }
}
