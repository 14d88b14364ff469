use thiserror::Error;

/// A template that cannot be parsed or fails a static check.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("template: byte {offset}: {reason}")]
pub struct ParseError {
    pub offset: usize,
    pub reason: String,
}

impl ParseError {
    pub fn new(offset: usize, reason: impl Into<String>) -> Self {
        Self {
            offset,
            reason: reason.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ExecError {
    /// `.User` was evaluated for a request without an identity.
    #[error("no user")]
    NoUser,

    #[error("can't evaluate field {field} in type {kind}")]
    UnknownField { field: String, kind: &'static str },

    #[error("wrong number of args for {name}: want {want} got {got}")]
    ArgCount {
        name: String,
        want: usize,
        got: usize,
    },

    #[error("wrong type for value; expected {expected}; got {got}")]
    WrongType {
        expected: &'static str,
        got: &'static str,
    },

    #[error("can't give argument to non-function {0}")]
    NotAFunction(String),

    #[error("can't print a value of type {0}")]
    Unprintable(&'static str),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ExpandError {
    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error("template: {0}")]
    Execution(#[from] ExecError),

    #[error("invalid destination {url:?}: {reason}")]
    InvalidDestination { url: String, reason: String },
}

impl ExpandError {
    pub fn is_no_user(&self) -> bool {
        matches!(self, ExpandError::Execution(ExecError::NoUser))
    }
}
