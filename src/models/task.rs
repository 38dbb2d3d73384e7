use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool};

use crate::constants::{task_status, TaskPriority};

/// Task represents a recurring or one-off chore owned by a user
/// Maps to `tasks` table
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Task {
    pub id: i64,
    pub user_id: i64,
    pub title: String,
    pub description: String,
    pub interval: String,
    pub assigned_to: Option<String>,
    pub status: String,
    pub priority: String,
    pub reminder_count: i32,
    pub created_at: NaiveDateTime,
    pub completed_at: Option<NaiveDateTime>,
}

/// New Task for creation (without generated fields). Status is always
/// `active` on insert.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewTask {
    pub user_id: i64,
    pub title: String,
    pub description: String,
    pub interval: String,
    pub assigned_to: Option<String>,
    pub priority: TaskPriority,
}

impl Task {
    pub fn is_completed(&self) -> bool {
        self.status == task_status::COMPLETED
    }

    /// List a user's tasks with the given status, newest first
    pub async fn list_for_user(
        pool: &PgPool,
        user_id: i64,
        status: &str,
    ) -> Result<Vec<Task>, sqlx::Error> {
        sqlx::query_as::<_, Task>(
            r#"
            SELECT id, user_id, title, description, "interval", assigned_to,
                   status, priority, reminder_count, created_at, completed_at
            FROM tasks
            WHERE user_id = $1 AND status = $2
            ORDER BY created_at DESC, id DESC
            "#,
        )
        .bind(user_id)
        .bind(status)
        .fetch_all(pool)
        .await
    }

    /// Create a new active task
    pub async fn create(pool: &PgPool, new_task: NewTask) -> Result<Task, sqlx::Error> {
        sqlx::query_as::<_, Task>(
            r#"
            INSERT INTO tasks (user_id, title, description, "interval", assigned_to, priority, status)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING id, user_id, title, description, "interval", assigned_to,
                      status, priority, reminder_count, created_at, completed_at
            "#,
        )
        .bind(new_task.user_id)
        .bind(new_task.title)
        .bind(new_task.description)
        .bind(new_task.interval)
        .bind(new_task.assigned_to)
        .bind(new_task.priority.as_str())
        .bind(task_status::ACTIVE)
        .fetch_one(pool)
        .await
    }

    /// Set a task's status. Moving to `completed` stamps `completed_at`;
    /// any other status leaves a previous completion time in place.
    pub async fn update_status(
        pool: &PgPool,
        task_id: i64,
        status: &str,
    ) -> Result<Option<Task>, sqlx::Error> {
        sqlx::query_as::<_, Task>(
            r#"
            UPDATE tasks
            SET status = $2,
                completed_at = CASE WHEN $2 = $3 THEN CURRENT_TIMESTAMP ELSE completed_at END
            WHERE id = $1
            RETURNING id, user_id, title, description, "interval", assigned_to,
                      status, priority, reminder_count, created_at, completed_at
            "#,
        )
        .bind(task_id)
        .bind(status)
        .bind(task_status::COMPLETED)
        .fetch_optional(pool)
        .await
    }
}
