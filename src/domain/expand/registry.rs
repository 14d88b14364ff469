//! Fixed registry of the names a link template may use.
//!
//! Templates can reach exactly three context fields, a handful of methods on
//! the `Now` timestamp and three functions. Everything else is rejected,
//! at parse time when the receiver type is statically known and at
//! execution time otherwise.

use chrono::{DateTime, Datelike, Timelike, Utc};

use super::error::ExecError;
use super::go_time;
use crate::utils::escape::{path_escape, query_escape};

/// Static type of a template value, used for parse-time checks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Kind {
    Context,
    String,
    Time,
    Int,
    /// Not known until execution.
    Unknown,
}

impl Kind {
    pub fn name(self) -> &'static str {
        match self {
            Kind::Context => "context",
            Kind::String => "string",
            Kind::Time => "time",
            Kind::Int => "int",
            Kind::Unknown => "unknown",
        }
    }
}

/// Fields of the expansion context.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    /// Current UTC time.
    Now,
    /// Remaining path after the short name.
    Path,
    /// Current user; fails when the request carries no identity.
    User,
}

impl Field {
    pub fn lookup(name: &str) -> Option<Self> {
        match name {
            "Now" => Some(Field::Now),
            "Path" => Some(Field::Path),
            "User" => Some(Field::User),
            _ => None,
        }
    }

    pub fn kind(self) -> Kind {
        match self {
            Field::Now => Kind::Time,
            Field::Path | Field::User => Kind::String,
        }
    }
}

/// Methods callable on a time value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimeMethod {
    Format,
    Unix,
    UnixMilli,
    Year,
    Month,
    Day,
    YearDay,
    Hour,
    Minute,
    Second,
    Weekday,
    Utc,
}

impl TimeMethod {
    pub fn lookup(name: &str) -> Option<Self> {
        let method = match name {
            "Format" => TimeMethod::Format,
            "Unix" => TimeMethod::Unix,
            "UnixMilli" => TimeMethod::UnixMilli,
            "Year" => TimeMethod::Year,
            "Month" => TimeMethod::Month,
            "Day" => TimeMethod::Day,
            "YearDay" => TimeMethod::YearDay,
            "Hour" => TimeMethod::Hour,
            "Minute" => TimeMethod::Minute,
            "Second" => TimeMethod::Second,
            "Weekday" => TimeMethod::Weekday,
            "UTC" => TimeMethod::Utc,
            _ => return None,
        };
        Some(method)
    }

    pub fn arity(self) -> usize {
        match self {
            TimeMethod::Format => 1,
            _ => 0,
        }
    }

    pub fn kind(self) -> Kind {
        match self {
            TimeMethod::Format | TimeMethod::Month | TimeMethod::Weekday => Kind::String,
            TimeMethod::Utc => Kind::Time,
            _ => Kind::Int,
        }
    }

    /// Calls the method; `args` have already been checked for count and type.
    pub fn call(self, t: &DateTime<Utc>, args: &[String]) -> Value {
        match self {
            TimeMethod::Format => {
                let layout = args.first().map(String::as_str).unwrap_or_default();
                Value::Str(go_time::format(t, layout))
            }
            TimeMethod::Unix => Value::Int(t.timestamp()),
            TimeMethod::UnixMilli => Value::Int(t.timestamp_millis()),
            TimeMethod::Year => Value::Int(i64::from(t.year())),
            TimeMethod::Month => Value::Str(go_time::month_name(t).to_string()),
            TimeMethod::Day => Value::Int(i64::from(t.day())),
            TimeMethod::YearDay => Value::Int(i64::from(t.ordinal())),
            TimeMethod::Hour => Value::Int(i64::from(t.hour())),
            TimeMethod::Minute => Value::Int(i64::from(t.minute())),
            TimeMethod::Second => Value::Int(i64::from(t.second())),
            TimeMethod::Weekday => Value::Str(go_time::weekday_name(t).to_string()),
            TimeMethod::Utc => Value::Time(*t),
        }
    }
}

/// Functions callable by name at the head of a command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Function {
    PathEscape,
    QueryEscape,
    TrimSuffix,
}

impl Function {
    pub fn lookup(name: &str) -> Option<Self> {
        match name {
            "PathEscape" => Some(Function::PathEscape),
            "QueryEscape" => Some(Function::QueryEscape),
            "TrimSuffix" => Some(Function::TrimSuffix),
            _ => None,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Function::PathEscape => "PathEscape",
            Function::QueryEscape => "QueryEscape",
            Function::TrimSuffix => "TrimSuffix",
        }
    }

    pub fn arity(self) -> usize {
        match self {
            Function::PathEscape | Function::QueryEscape => 1,
            Function::TrimSuffix => 2,
        }
    }

    /// Calls the function on string arguments.
    ///
    /// # Errors
    ///
    /// Returns [`ExecError::ArgCount`] if `args` does not match the arity.
    pub fn call(self, args: &[String]) -> Result<String, ExecError> {
        match (self, args) {
            (Function::PathEscape, [s]) => Ok(path_escape(s)),
            (Function::QueryEscape, [s]) => Ok(query_escape(s)),
            (Function::TrimSuffix, [s, suffix]) => {
                Ok(s.strip_suffix(suffix.as_str()).unwrap_or(s).to_string())
            }
            _ => Err(ExecError::ArgCount {
                name: self.name().to_string(),
                want: self.arity(),
                got: args.len(),
            }),
        }
    }
}

/// A runtime template value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Value {
    /// The expansion context itself, i.e. the initial `.`.
    Context,
    Str(String),
    Time(DateTime<Utc>),
    Int(i64),
}

impl Value {
    pub fn kind(&self) -> Kind {
        match self {
            Value::Context => Kind::Context,
            Value::Str(_) => Kind::String,
            Value::Time(_) => Kind::Time,
            Value::Int(_) => Kind::Int,
        }
    }

    /// Truthiness used by `if` and `with`.
    pub fn is_true(&self) -> bool {
        match self {
            Value::Str(s) => !s.is_empty(),
            Value::Int(n) => *n != 0,
            Value::Context | Value::Time(_) => true,
        }
    }
}
