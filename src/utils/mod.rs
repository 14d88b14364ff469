//! Utility functions for short name normalization, escaping and host handling.
//!
//! - [`link_id`] - Canonical storage keys for short names
//! - [`escape`] - Path and query percent-escaping
//! - [`host`] - Host/port helpers used for alias detection

pub mod escape;
pub mod host;
pub mod link_id;
