//! HTTP request handlers.
//!
//! Each handler module corresponds to a logical grouping of endpoints.

pub mod health;
pub mod home;
pub mod links;
pub mod redirect;

pub use health::health_handler;
pub use home::home_handler;
pub use links::{
    all_links_handler, delete_link_handler, export_handler, link_detail_handler,
    save_link_handler,
};
pub use redirect::redirect_handler;
