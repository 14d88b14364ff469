//! HTTP API layer.
//!
//! This layer translates HTTP requests into service calls and formats
//! responses.
//!
//! # Modules
//!
//! - [`dto`] - Request forms and response bodies
//! - [`handlers`] - HTTP request handlers
//! - [`middleware`] - User identification and request tracing
//! - [`routes`] - Route configuration

pub mod dto;
pub mod handlers;
pub mod middleware;
pub mod routes;
