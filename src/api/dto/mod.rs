//! Data Transfer Objects for HTTP requests and responses.
//!
//! Links themselves are returned in their snapshot JSON form
//! ([`crate::domain::entities::Link`]); the types here cover forms and the
//! endpoints that do not return links.

pub mod health;
pub mod home;
pub mod link;
