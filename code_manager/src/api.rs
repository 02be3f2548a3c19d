pub mod api;
pub mod auth;

pub use api::{AppState, routes};
