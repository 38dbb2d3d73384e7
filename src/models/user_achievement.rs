use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgConnection};

/// UserAchievement tracks one user's advancement toward one achievement
/// Maps to `user_achievements` table, keyed on (user_id, achievement_id)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct UserAchievement {
    pub user_id: i64,
    pub achievement_id: i64,
    pub progress: i32,
    pub unlocked: bool,
    pub unlocked_at: Option<NaiveDateTime>,
}

/// Result of a progress increment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct ProgressOutcome {
    pub progress: i32,
    pub unlocked: bool,
}

impl UserAchievement {
    /// Add progress atomically. `unlocked` only ever flips to true and
    /// `unlocked_at` is written on the first crossing of `required_count`
    /// only; the row lock taken by the upsert serialises concurrent callers.
    pub async fn record_progress(
        conn: &mut PgConnection,
        user_id: i64,
        achievement_id: i64,
        increment: i32,
        required_count: i32,
    ) -> Result<ProgressOutcome, sqlx::Error> {
        sqlx::query_as::<_, ProgressOutcome>(
            r#"
            INSERT INTO user_achievements (user_id, achievement_id, progress, unlocked, unlocked_at)
            VALUES (
                $1, $2, $3,
                $3 >= $4,
                CASE WHEN $3 >= $4 THEN CURRENT_TIMESTAMP ELSE NULL END
            )
            ON CONFLICT (user_id, achievement_id) DO UPDATE
            SET progress = user_achievements.progress + EXCLUDED.progress,
                unlocked = user_achievements.unlocked
                    OR user_achievements.progress + EXCLUDED.progress >= $4,
                unlocked_at = CASE
                    WHEN user_achievements.unlocked_at IS NULL
                         AND user_achievements.progress + EXCLUDED.progress >= $4
                    THEN CURRENT_TIMESTAMP
                    ELSE user_achievements.unlocked_at
                END
            RETURNING progress, unlocked
            "#,
        )
        .bind(user_id)
        .bind(achievement_id)
        .bind(increment)
        .bind(required_count)
        .fetch_one(&mut *conn)
        .await
    }

    /// Fetch a single progress row
    pub async fn find(
        conn: &mut PgConnection,
        user_id: i64,
        achievement_id: i64,
    ) -> Result<Option<UserAchievement>, sqlx::Error> {
        sqlx::query_as::<_, UserAchievement>(
            r#"
            SELECT user_id, achievement_id, progress, unlocked, unlocked_at
            FROM user_achievements
            WHERE user_id = $1 AND achievement_id = $2
            "#,
        )
        .bind(user_id)
        .bind(achievement_id)
        .fetch_optional(&mut *conn)
        .await
    }
}
