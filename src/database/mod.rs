//! # Database Operations
//!
//! Pool construction for the PostgreSQL store. The schema itself lives in
//! `migrations/`; provisioning it is left to deployment tooling, while the
//! integration tests apply it through `#[sqlx::test]`.

pub mod connection;

pub use connection::DatabaseConnection;
