//! # Store Seams
//!
//! The handlers talk to durable state only through these traits. [`PgStore`]
//! is the production implementation; [`InMemoryStore`] mirrors its semantics
//! for unit tests and local experiments.
//!
//! Each operation is one atomic read-modify-write at the store, so the
//! handlers never hold state between calls and never lock anything
//! themselves.

pub mod postgres;

#[cfg(any(test, feature = "test-utils"))]
pub mod memory;

use async_trait::async_trait;

use crate::error::Result;
use crate::models::{AchievementProgress, NewTask, NewUser, ProgressOutcome, Task, User, XpAward};

pub use postgres::PgStore;

#[cfg(any(test, feature = "test-utils"))]
pub use memory::InMemoryStore;

#[async_trait]
pub trait UserStore: Send + Sync {
    async fn find_by_telegram_id(&self, telegram_id: i64) -> Result<Option<User>>;

    /// Insert, or update only the username when the telegram id exists
    async fn upsert_user(&self, new_user: NewUser) -> Result<User>;

    /// `None` when no user has this id
    async fn apply_award(&self, user_id: i64, award: XpAward) -> Result<Option<User>>;
}

#[async_trait]
pub trait TaskStore: Send + Sync {
    /// Tasks of `user_id` with `status`, newest first
    async fn list_tasks(&self, user_id: i64, status: &str) -> Result<Vec<Task>>;

    async fn create_task(&self, new_task: NewTask) -> Result<Task>;

    /// `None` when no task has this id
    async fn update_task_status(&self, task_id: i64, status: &str) -> Result<Option<Task>>;
}

#[async_trait]
pub trait AchievementStore: Send + Sync {
    /// Whole catalog joined with the user's progress, by achievement id
    async fn list_progress(&self, user_id: i64) -> Result<Vec<AchievementProgress>>;

    /// `None` when the achievement is not in the catalog
    async fn increment_progress(
        &self,
        user_id: i64,
        achievement_id: i64,
        increment: i32,
    ) -> Result<Option<ProgressOutcome>>;
}
