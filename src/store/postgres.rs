//! PostgreSQL-backed store
//!
//! Thin adapter from the store traits onto the model queries. Every call
//! checks a connection out of the pool for its own duration only.

use async_trait::async_trait;
use sqlx::PgPool;
use tracing::debug;

use super::{AchievementStore, TaskStore, UserStore};
use crate::error::Result;
use crate::models::{
    Achievement, AchievementProgress, NewTask, NewUser, ProgressOutcome, Task, User,
    UserAchievement, XpAward,
};

#[derive(Debug, Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

#[async_trait]
impl UserStore for PgStore {
    async fn find_by_telegram_id(&self, telegram_id: i64) -> Result<Option<User>> {
        Ok(User::find_by_telegram_id(&self.pool, telegram_id).await?)
    }

    async fn upsert_user(&self, new_user: NewUser) -> Result<User> {
        Ok(User::upsert(&self.pool, new_user).await?)
    }

    async fn apply_award(&self, user_id: i64, award: XpAward) -> Result<Option<User>> {
        Ok(User::apply_award(&self.pool, user_id, award).await?)
    }
}

#[async_trait]
impl TaskStore for PgStore {
    async fn list_tasks(&self, user_id: i64, status: &str) -> Result<Vec<Task>> {
        Ok(Task::list_for_user(&self.pool, user_id, status).await?)
    }

    async fn create_task(&self, new_task: NewTask) -> Result<Task> {
        Ok(Task::create(&self.pool, new_task).await?)
    }

    async fn update_task_status(&self, task_id: i64, status: &str) -> Result<Option<Task>> {
        Ok(Task::update_status(&self.pool, task_id, status).await?)
    }
}

#[async_trait]
impl AchievementStore for PgStore {
    async fn list_progress(&self, user_id: i64) -> Result<Vec<AchievementProgress>> {
        Ok(Achievement::list_with_progress(&self.pool, user_id).await?)
    }

    async fn increment_progress(
        &self,
        user_id: i64,
        achievement_id: i64,
        increment: i32,
    ) -> Result<Option<ProgressOutcome>> {
        // Lookup and upsert share one connection; it returns to the pool on drop
        let mut conn = self.pool.acquire().await?;

        let Some(required_count) = Achievement::find_required_count(&mut conn, achievement_id).await?
        else {
            debug!(achievement_id, "Achievement not in catalog");
            return Ok(None);
        };

        let outcome = UserAchievement::record_progress(
            &mut conn,
            user_id,
            achievement_id,
            increment,
            required_count,
        )
        .await?;

        Ok(Some(outcome))
    }
}
