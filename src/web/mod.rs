//! # Local HTTP Front Door
//!
//! In production the calling fabric turns HTTP requests into events. This
//! module does the same job for local runs so the services can be driven
//! with an ordinary HTTP client.

pub mod handlers;
pub mod response_types;
pub mod routes;
pub mod state;

pub use routes::router;
pub use state::AppState;
