//! Domain layer containing business entities and logic.
//!
//! Everything here is independent of HTTP and of the storage backend.
//!
//! # Architecture
//!
//! - [`entities`] - Links and click counters
//! - [`expand`] - Destination templates evaluated on every redirect
//! - [`repositories`] - Storage trait definitions
//!
//! # Design Principles
//!
//! - Domain layer has no dependencies on infrastructure or presentation layers
//! - Repository traits define contracts implemented by infrastructure layer
//! - Business logic is encapsulated in services (see [`crate::application::services`])

pub mod entities;
pub mod expand;
pub mod repositories;
