use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use serde_json::{Value, json};
use tracing::error;

use crate::application::services::{LinkServiceError, ResolveError};
use crate::domain::expand::ExpandError;
use crate::domain::repositories::StorageError;

#[derive(Serialize)]
struct ErrorBody {
    error: ErrorInfo,
}

#[derive(Serialize)]
struct ErrorInfo {
    code: &'static str,
    message: String,
    details: Value,
}

#[derive(Debug)]
pub enum AppError {
    Validation { message: String, details: Value },
    Unauthorized { message: String, details: Value },
    NotFound { message: String, details: Value },
    Internal { message: String, details: Value },
}

impl AppError {
    pub fn bad_request(message: impl Into<String>, details: Value) -> Self {
        Self::Validation {
            message: message.into(),
            details,
        }
    }
    pub fn unauthorized(message: impl Into<String>, details: Value) -> Self {
        Self::Unauthorized {
            message: message.into(),
            details,
        }
    }
    pub fn not_found(message: impl Into<String>, details: Value) -> Self {
        Self::NotFound {
            message: message.into(),
            details,
        }
    }
    pub fn internal(message: impl Into<String>, details: Value) -> Self {
        Self::Internal {
            message: message.into(),
            details,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message, details) = match self {
            AppError::Validation { message, details } => (
                StatusCode::BAD_REQUEST,
                "validation_error",
                message,
                details,
            ),
            AppError::Unauthorized { message, details } => {
                (StatusCode::UNAUTHORIZED, "unauthorized", message, details)
            }
            AppError::NotFound { message, details } => {
                (StatusCode::NOT_FOUND, "not_found", message, details)
            }
            AppError::Internal { message, details } => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "internal_error",
                message,
                details,
            ),
        };

        let body = ErrorBody {
            error: ErrorInfo {
                code,
                message,
                details,
            },
        };

        (status, Json(body)).into_response()
    }
}

impl From<StorageError> for AppError {
    fn from(e: StorageError) -> Self {
        match e {
            StorageError::NotFound(short) => {
                AppError::not_found("Link not found", json!({ "short": short }))
            }
            StorageError::Backend(source) => {
                error!(error = %source, "Storage error");
                AppError::internal("Storage error", json!({}))
            }
        }
    }
}

impl From<ExpandError> for AppError {
    fn from(e: ExpandError) -> Self {
        match e {
            ExpandError::Execution(_) if e.is_no_user() => AppError::unauthorized(
                "Link requires a signed-in user",
                json!({ "reason": e.to_string() }),
            ),
            ExpandError::Parse(_) | ExpandError::Execution(_) => AppError::internal(
                "Failed to expand link",
                json!({ "reason": e.to_string() }),
            ),
            ExpandError::InvalidDestination { ref url, .. } => AppError::internal(
                "Link expands to an invalid URL",
                json!({ "url": url, "reason": e.to_string() }),
            ),
        }
    }
}

impl From<ResolveError> for AppError {
    fn from(e: ResolveError) -> Self {
        match e {
            ResolveError::NotFound(short) => {
                AppError::not_found("Link not found", json!({ "short": short }))
            }
            ResolveError::Expand(e) => e.into(),
            ResolveError::AliasLoop { hops } => AppError::internal(
                "Too many link aliases",
                json!({ "max_hops": hops }),
            ),
            ResolveError::InvalidLink { input, reason } => AppError::bad_request(
                "Invalid link",
                json!({ "link": input, "reason": reason }),
            ),
            ResolveError::Storage(e) => e.into(),
        }
    }
}

impl From<LinkServiceError> for AppError {
    fn from(e: LinkServiceError) -> Self {
        match e {
            LinkServiceError::Validation { field, message } => {
                AppError::bad_request(message, json!({ "field": field }))
            }
            LinkServiceError::Template(ref parse) => AppError::bad_request(
                e.to_string(),
                json!({ "field": "long", "offset": parse.offset }),
            ),
            LinkServiceError::NotFound(short) => {
                AppError::not_found("Link not found", json!({ "short": short }))
            }
            LinkServiceError::Snapshot { .. } => {
                AppError::bad_request("Invalid snapshot", json!({ "reason": e.to_string() }))
            }
            LinkServiceError::Storage(e) => e.into(),
        }
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(e: validator::ValidationErrors) -> Self {
        let field_errors = e.field_errors();
        let fields: Vec<&str> = field_errors.keys().map(|k| k.as_ref()).collect();
        AppError::bad_request(
            "Validation failed",
            json!({ "fields": fields, "reason": e.to_string() }),
        )
    }
}
