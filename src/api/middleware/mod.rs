//! HTTP middleware and request extractors.
//!
//! Provides user identification and observability middleware.

pub mod current_user;
pub mod tracing;

pub use current_user::CurrentUser;
