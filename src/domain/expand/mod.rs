//! Link destination templates.
//!
//! A link's long URL is either a plain URL, to which the rest of the request
//! path is appended, or a template in `{{ }}` syntax evaluated against the
//! request:
//!
//! ```
//! use chrono::{TimeZone, Utc};
//! use golinks::domain::expand::{ExpansionContext, expand_link};
//!
//! let now = Utc.with_ymd_and_hms(2022, 6, 2, 1, 2, 3).unwrap();
//! let ctx = ExpansionContext::new(now, "q=rust", None);
//!
//! let dest = expand_link("https://example.com/search?{{.Path}}", &ctx).unwrap();
//! assert_eq!(dest, "https://example.com/search?q=rust");
//!
//! let dest = expand_link("https://example.com/base/", &ctx).unwrap();
//! assert_eq!(dest, "https://example.com/base/q=rust");
//! ```
//!
//! Available names: the fields `.Now`, `.Path` and `.User`; methods of
//! `.Now` such as `Format`, `Unix` and `Year`; the functions `PathEscape`,
//! `QueryEscape` and `TrimSuffix`.

mod ast;
mod error;
mod exec;
mod go_time;
mod lexer;
mod parser;
mod registry;

use chrono::{DateTime, Utc};
use url::Url;

pub use error::{ExecError, ExpandError, ParseError};

use crate::utils::escape::has_valid_escapes;

const TEMPLATE_OPEN: &str = "{{";

/// Base used to check relative destinations.
const PLACEHOLDER_BASE: &str = "http://placeholder.invalid/";

/// Values visible to a template.
#[derive(Debug, Clone)]
pub struct ExpansionContext {
    now: DateTime<Utc>,
    path: String,
    user: Option<String>,
}

impl ExpansionContext {
    /// An empty `user` counts as no user.
    pub fn new(now: DateTime<Utc>, path: impl Into<String>, user: Option<String>) -> Self {
        Self {
            now,
            path: path.into(),
            user: user.filter(|u| !u.is_empty()),
        }
    }

    pub fn now(&self) -> DateTime<Utc> {
        self.now
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn user(&self) -> Result<&str, ExecError> {
        self.user.as_deref().ok_or(ExecError::NoUser)
    }
}

/// A parsed, statically checked template.
#[derive(Debug, Clone)]
pub struct Template {
    nodes: Vec<ast::Node>,
}

impl Template {
    pub fn parse(src: &str) -> Result<Self, ParseError> {
        Ok(Self {
            nodes: parser::parse(src)?,
        })
    }

    pub fn execute(&self, ctx: &ExpansionContext) -> Result<String, ExecError> {
        exec::execute(&self.nodes, ctx)
    }
}

/// Expands a link's long URL for one request.
pub fn expand_link(long: &str, ctx: &ExpansionContext) -> Result<String, ExpandError> {
    let dest = if long.contains(TEMPLATE_OPEN) {
        Template::parse(long)?.execute(ctx)?
    } else if long.ends_with('/') || ctx.path().is_empty() {
        format!("{long}{}", ctx.path())
    } else {
        format!("{long}/{}", ctx.path())
    };

    check_destination(&dest)?;
    Ok(dest)
}

/// Checks that a long URL is a valid template without executing it.
pub fn validate_pattern(long: &str) -> Result<(), ParseError> {
    Template::parse(long).map(|_| ())
}

fn check_destination(dest: &str) -> Result<(), ExpandError> {
    let invalid = |reason: String| ExpandError::InvalidDestination {
        url: dest.to_string(),
        reason,
    };

    if dest.chars().any(|c| c.is_ascii_control()) {
        return Err(invalid("control character in URL".to_string()));
    }

    // Query strings are passed through untouched; the path and fragment must
    // not contain stray `%`.
    let (rest, fragment) = dest.split_once('#').unwrap_or((dest, ""));
    let before_query = rest.split_once('?').map_or(rest, |(path, _)| path);
    if !has_valid_escapes(before_query) || !has_valid_escapes(fragment) {
        return Err(invalid("invalid URL escape".to_string()));
    }

    match Url::parse(dest) {
        Ok(_) => Ok(()),
        Err(url::ParseError::RelativeUrlWithoutBase) => Url::parse(PLACEHOLDER_BASE)
            .and_then(|base| base.join(dest))
            .map(|_| ())
            .map_err(|e| invalid(e.to_string())),
        Err(e) => Err(invalid(e.to_string())),
    }
}
