//! Short link resolution.

use std::sync::Arc;

use chrono::Utc;
use thiserror::Error;
use tracing::debug;
use url::Url;

use crate::domain::expand::{ExpandError, ExpansionContext, expand_link};
use crate::domain::repositories::{LinkRepository, StorageError};
use crate::utils::host::is_same_host;

/// Longest chain of links pointing at other links that is followed.
pub const MAX_ALIAS_HOPS: usize = 10;

#[derive(Debug, Error)]
pub enum ResolveError {
    #[error("link {0:?} not found")]
    NotFound(String),

    #[error(transparent)]
    Expand(#[from] ExpandError),

    #[error("too many alias hops (more than {hops})")]
    AliasLoop { hops: usize },

    #[error("invalid link {input:?}: {reason}")]
    InvalidLink { input: String, reason: String },

    #[error(transparent)]
    Storage(StorageError),
}

impl From<StorageError> for ResolveError {
    fn from(err: StorageError) -> Self {
        match err {
            StorageError::NotFound(short) => Self::NotFound(short),
            other => Self::Storage(other),
        }
    }
}

/// Turns short names into destination URLs.
///
/// A destination that points back at this service, either as a relative
/// reference such as `/meet` or as an absolute URL on the service host such
/// as `http://go/meet`, is resolved again, up to [`MAX_ALIAS_HOPS`] times.
pub struct Resolver<L: LinkRepository + ?Sized> {
    links: Arc<L>,
    hostname: String,
}

impl<L: LinkRepository + ?Sized> Resolver<L> {
    /// Creates a resolver for the service reachable as `hostname` (e.g. `go`).
    pub fn new(links: Arc<L>, hostname: impl Into<String>) -> Self {
        Self {
            links,
            hostname: hostname.into(),
        }
    }

    /// Resolves a link as typed by a user: `meet/foo`, `go/meet/foo` or
    /// `http://go/meet/foo`.
    ///
    /// # Errors
    ///
    /// - [`ResolveError::InvalidLink`] if `input` is not a URL reference
    /// - [`ResolveError::NotFound`] if any link on the way does not exist
    /// - [`ResolveError::Expand`] if a destination template fails
    /// - [`ResolveError::AliasLoop`] if aliases nest too deeply
    /// - [`ResolveError::Storage`] on storage failures
    pub async fn resolve(&self, input: &str, user: Option<&str>) -> Result<String, ResolveError> {
        let (short, remainder) = self.split(input)?;
        self.follow(short, remainder, user).await
    }

    /// Resolves a request path that has already been split into the short
    /// name and the rest of the path.
    ///
    /// # Errors
    ///
    /// See [`Self::resolve`].
    pub async fn resolve_short(
        &self,
        short: &str,
        remainder: &str,
        user: Option<&str>,
    ) -> Result<String, ResolveError> {
        self.follow(short.to_string(), remainder.to_string(), user)
            .await
    }

    async fn follow(
        &self,
        mut short: String,
        mut remainder: String,
        user: Option<&str>,
    ) -> Result<String, ResolveError> {
        let mut hops = 0;

        loop {
            let dest = self.expand(&short, &remainder, user).await?;
            if !self.is_alias(&dest) {
                return Ok(dest);
            }

            hops += 1;
            if hops > MAX_ALIAS_HOPS {
                return Err(ResolveError::AliasLoop {
                    hops: MAX_ALIAS_HOPS,
                });
            }

            debug!(from = %short, to = %dest, hops, "Following alias");
            (short, remainder) = self.split(&dest)?;
        }
    }

    async fn expand(
        &self,
        short: &str,
        remainder: &str,
        user: Option<&str>,
    ) -> Result<String, ResolveError> {
        let link = self.links.load(short).await?;
        let ctx = ExpansionContext::new(Utc::now(), remainder, user.map(str::to_string));
        Ok(expand_link(&link.long, &ctx)?)
    }

    fn base(&self) -> Result<Url, url::ParseError> {
        Url::parse(&format!("http://{}/", self.hostname))
    }

    /// Whether `dest` points back at this service.
    fn is_alias(&self, dest: &str) -> bool {
        self.base()
            .and_then(|base| base.join(dest))
            .ok()
            .and_then(|url| url.host_str().map(|host| is_same_host(host, &self.hostname)))
            .unwrap_or(false)
    }

    /// Splits a link into its short name and the rest of its request URI.
    fn split(&self, input: &str) -> Result<(String, String), ResolveError> {
        let trimmed = strip_hostname(input, &self.hostname);
        let url = self
            .base()
            .and_then(|base| base.join(trimmed))
            .map_err(|e| ResolveError::InvalidLink {
                input: input.to_string(),
                reason: e.to_string(),
            })?;

        let path = url.path();
        let mut uri = path.strip_prefix('/').unwrap_or(path).to_string();
        if let Some(query) = url.query() {
            uri.push('?');
            uri.push_str(query);
        }

        Ok(match uri.split_once('/') {
            Some((short, remainder)) => (short.to_string(), remainder.to_string()),
            None => (uri, String::new()),
        })
    }
}

/// Drops a leading service hostname, so `go/meet` is read as `/meet`.
fn strip_hostname<'a>(input: &'a str, hostname: &str) -> &'a str {
    match input.strip_prefix(hostname) {
        Some(rest) if rest.is_empty() || rest.starts_with('/') => rest,
        _ => input,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::Link;
    use crate::domain::repositories::MockLinkRepository;
    use crate::utils::link_id::link_id;
    use std::collections::HashMap;

    fn repo_with(links: &[(&str, &str)]) -> MockLinkRepository {
        let links: HashMap<String, Link> = links
            .iter()
            .map(|(short, long)| (link_id(short), Link::new(*short, *long, "", Utc::now())))
            .collect();

        let mut mock = MockLinkRepository::new();
        mock.expect_load().returning(move |short| {
            links
                .get(&link_id(short))
                .cloned()
                .ok_or_else(|| StorageError::NotFound(short.to_string()))
        });
        mock
    }

    fn resolver() -> Resolver<MockLinkRepository> {
        let repo = repo_with(&[
            ("meet", "https://meet.example.com/lookup/"),
            (
                "cs",
                "http://codesearch/{{with .Path}}search?q={{.}}{{end}}",
            ),
            ("m", "http://go/meet"),
            ("chat", "/meet"),
            ("me", "https://who.example.com/{{.User}}"),
            ("loop-a", "/loop-b"),
            ("loop-b", "http://go:8080/loop-a"),
            ("mail", "mailto:team@example.com"),
        ]);
        Resolver::new(Arc::new(repo), "go")
    }

    #[tokio::test]
    async fn test_resolve_direct() {
        let resolver = resolver();

        for (input, want) in [
            ("meet", "https://meet.example.com/lookup/"),
            ("meet/foo", "https://meet.example.com/lookup/foo"),
            ("go/meet/foo", "https://meet.example.com/lookup/foo"),
            ("http://go/meet/foo", "https://meet.example.com/lookup/foo"),
            ("http://mygo/meet/foo", "https://meet.example.com/lookup/foo"),
            ("cs", "http://codesearch/"),
            ("cs/term", "http://codesearch/search?q=term"),
            ("MEET", "https://meet.example.com/lookup/"),
        ] {
            let got = resolver.resolve(input, None).await.unwrap();
            assert_eq!(got, want, "resolving {input}");
        }
    }

    #[tokio::test]
    async fn test_resolve_aliases() {
        let resolver = resolver();

        assert_eq!(
            resolver.resolve("m/foo", None).await.unwrap(),
            "https://meet.example.com/lookup/foo"
        );
        assert_eq!(
            resolver.resolve("chat/foo", None).await.unwrap(),
            "https://meet.example.com/lookup/foo"
        );
    }

    #[tokio::test]
    async fn test_resolve_short() {
        let resolver = resolver();

        assert_eq!(
            resolver.resolve_short("m", "x/y", None).await.unwrap(),
            "https://meet.example.com/lookup/x/y"
        );
    }

    #[tokio::test]
    async fn test_non_http_destination_is_terminal() {
        let resolver = resolver();

        assert_eq!(
            resolver.resolve("mail", None).await.unwrap(),
            "mailto:team@example.com"
        );
    }

    #[tokio::test]
    async fn test_alias_loop() {
        let resolver = resolver();

        let err = resolver.resolve("loop-a", None).await.unwrap_err();
        assert!(matches!(err, ResolveError::AliasLoop { hops: MAX_ALIAS_HOPS }));
    }

    #[tokio::test]
    async fn test_not_found() {
        let resolver = resolver();

        let err = resolver.resolve("nope/foo", None).await.unwrap_err();
        assert!(matches!(err, ResolveError::NotFound(ref short) if short == "nope"));
    }

    #[tokio::test]
    async fn test_user() {
        let resolver = resolver();

        assert_eq!(
            resolver.resolve("me", Some("foo@example.com")).await.unwrap(),
            "https://who.example.com/foo@example.com"
        );

        let err = resolver.resolve("me", None).await.unwrap_err();
        assert!(matches!(err, ResolveError::Expand(ref e) if e.is_no_user()));
    }

    #[tokio::test]
    async fn test_storage_error() {
        let mut mock = MockLinkRepository::new();
        mock.expect_load()
            .times(1)
            .returning(|_| Err(StorageError::backend("connection reset")));
        let resolver = Resolver::new(Arc::new(mock), "go");

        let err = resolver.resolve("meet", None).await.unwrap_err();
        assert!(matches!(err, ResolveError::Storage(_)));
    }

    #[test]
    fn test_strip_hostname() {
        assert_eq!(strip_hostname("go/meet", "go"), "/meet");
        assert_eq!(strip_hostname("go", "go"), "");
        assert_eq!(strip_hostname("golang", "go"), "golang");
        assert_eq!(strip_hostname("meet", "go"), "meet");
    }
}
