//! Handler Tests Module
//!
//! Drive the three services through [`gamify_core::store::PgStore`] the way
//! the calling fabric would: events in, JSON responses out.

pub mod concurrency;
pub mod flow;
