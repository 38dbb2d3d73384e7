//! Model Tests Module
//!
//! Row-level behaviour of the SQL in `gamify_core::models`.

pub mod achievement;
pub mod task;
pub mod user;
