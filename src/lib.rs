#![allow(clippy::doc_markdown)] // Allow technical terms like PostgreSQL, SQLx in docs
#![allow(clippy::missing_errors_doc)] // Allow public functions without # Errors sections
#![allow(clippy::must_use_candidate)] // Allow methods without must_use when context is clear

//! # Gamify Core
//!
//! Request handlers for a gamified task tracker.
//!
//! ## Overview
//!
//! Three stateless services sit behind a serverless fabric, one per resource:
//!
//! - **users**: look up a user by telegram id, create-or-rename a user, and
//!   award experience with single-step level promotion
//! - **tasks**: list a user's tasks by status, create tasks, and move tasks
//!   between statuses
//! - **achievements**: list the catalog with a user's percentage progress,
//!   and add progress that unlocks an achievement once its requirement is met
//!
//! Each service accepts an HTTP-like [`HandlerEvent`] and returns a
//! [`HandlerResponse`] carrying a JSON body and permissive CORS headers.
//! Every read-modify-write runs as a single SQL statement so concurrent
//! invocations cannot lose updates.
//!
//! ## Module Organization
//!
//! - [`handlers`] - The three services and the event envelope
//! - [`store`] - Storage traits with PostgreSQL and in-memory backends
//! - [`models`] - Row types and their SQL
//! - [`progression`] - Level, percentage and unlock arithmetic
//! - [`config`] - Layered TOML and environment configuration
//! - [`logging`] - Structured logging setup
//! - [`web`] - Local axum front door for development
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use gamify_core::config::GamifyConfig;
//! use gamify_core::database::DatabaseConnection;
//! use gamify_core::handlers::{EventHandler, GamifyHandlers, HandlerEvent};
//! use gamify_core::store::PgStore;
//! use std::sync::Arc;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = GamifyConfig::load()?;
//! let connection = DatabaseConnection::connect(&config.database).await?;
//! let store = Arc::new(PgStore::new(connection.pool().clone()));
//! let handlers = GamifyHandlers::new(store, &config);
//!
//! let event = HandlerEvent::new("GET").with_query("telegram_id", "555");
//! let response = handlers.users.handle(event).await;
//! println!("{} {}", response.status_code, response.body);
//! # Ok(())
//! # }
//! ```
//!
//! ## Testing
//!
//! ```bash
//! cargo test                             # Unit tests against the in-memory store
//! cargo test --features database-tests   # PostgreSQL tests; needs DATABASE_URL
//! ```

pub mod config;
pub mod constants;
pub mod database;
pub mod error;
pub mod handlers;
pub mod logging;
pub mod models;
pub mod progression;
pub mod store;
pub mod web;

pub use config::{ConfigLoader, GamifyConfig};
pub use constants::TaskPriority;
pub use error::{GamifyError, Result};
pub use handlers::{
    AchievementService, EventHandler, GamifyHandlers, HandlerEvent, HandlerResponse, TaskService,
    UserService,
};
pub use store::{AchievementStore, PgStore, TaskStore, UserStore};
