//! HTTP API: router, handlers, and wire types.

pub mod routes;
pub mod types;

pub use routes::{router, serve, AppState};
