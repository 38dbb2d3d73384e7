use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool};

use crate::constants::XP_PER_LEVEL;

/// User represents a player and their progression counters
/// Maps to `users` table
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct User {
    pub id: i64,
    pub telegram_id: i64,
    pub username: Option<String>,
    pub level: i32,
    pub xp: i32,
    pub total_completed: i32,
    pub streak: i32,
    pub created_at: NaiveDateTime,
}

/// New User for creation (without generated fields)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewUser {
    pub telegram_id: i64,
    pub username: Option<String>,
}

/// Experience awarded to a user in one call
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct XpAward {
    pub xp_increment: i32,
    pub completed_task: bool,
}

impl User {
    /// Find a user by their messaging-platform identifier
    pub async fn find_by_telegram_id(
        pool: &PgPool,
        telegram_id: i64,
    ) -> Result<Option<User>, sqlx::Error> {
        sqlx::query_as::<_, User>(
            r#"
            SELECT id, telegram_id, username, level, xp, total_completed, streak, created_at
            FROM users
            WHERE telegram_id = $1
            "#,
        )
        .bind(telegram_id)
        .fetch_optional(pool)
        .await
    }

    /// Insert a user or, when the telegram id is taken, refresh the username.
    /// Progression fields of an existing row are never touched.
    pub async fn upsert(pool: &PgPool, new_user: NewUser) -> Result<User, sqlx::Error> {
        sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (telegram_id, username)
            VALUES ($1, $2)
            ON CONFLICT (telegram_id) DO UPDATE
            SET username = EXCLUDED.username
            RETURNING id, telegram_id, username, level, xp, total_completed, streak, created_at
            "#,
        )
        .bind(new_user.telegram_id)
        .bind(new_user.username)
        .fetch_one(pool)
        .await
    }

    /// Add experience, bump the completion counter and promote at most one
    /// level, all in a single statement. The right-hand sides see the row as
    /// it was before the update, matching `progression::apply_xp`.
    pub async fn apply_award(
        pool: &PgPool,
        user_id: i64,
        award: XpAward,
    ) -> Result<Option<User>, sqlx::Error> {
        sqlx::query_as::<_, User>(
            r#"
            UPDATE users
            SET xp = xp + $2,
                total_completed = total_completed + CASE WHEN $3 THEN 1 ELSE 0 END,
                level = CASE WHEN xp + $2 >= level * $4 THEN level + 1 ELSE level END
            WHERE id = $1
            RETURNING id, telegram_id, username, level, xp, total_completed, streak, created_at
            "#,
        )
        .bind(user_id)
        .bind(award.xp_increment)
        .bind(award.completed_task)
        .bind(XP_PER_LEVEL)
        .fetch_optional(pool)
        .await
    }
}
