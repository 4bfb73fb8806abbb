//! HTTP request handlers.

pub mod account_handler;
pub mod admin_handler;

pub use account_handler::{account_routes, granter_routes};
pub use admin_handler::admin_routes;
