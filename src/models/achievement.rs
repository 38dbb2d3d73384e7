use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgConnection, PgPool};

/// Achievement is an entry of the static catalog
/// Maps to `achievements` table
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Achievement {
    pub id: i64,
    pub title: String,
    pub description: String,
    pub icon: String,
    pub required_count: i32,
}

/// A catalog entry joined with one user's progress. Users without a
/// progress row read as zero progress, locked, never unlocked.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct AchievementProgress {
    pub id: i64,
    pub title: String,
    pub description: String,
    pub icon: String,
    pub required_count: i32,
    pub progress: i32,
    pub unlocked: bool,
    pub unlocked_at: Option<NaiveDateTime>,
}

impl AchievementProgress {
    /// Combine a catalog entry with an optional progress row
    pub fn from_parts(
        achievement: &Achievement,
        progress: Option<(i32, bool, Option<NaiveDateTime>)>,
    ) -> Self {
        let (progress, unlocked, unlocked_at) = progress.unwrap_or((0, false, None));
        Self {
            id: achievement.id,
            title: achievement.title.clone(),
            description: achievement.description.clone(),
            icon: achievement.icon.clone(),
            required_count: achievement.required_count,
            progress,
            unlocked,
            unlocked_at,
        }
    }
}

impl Achievement {
    /// Look up how much progress an achievement needs
    pub async fn find_required_count(
        conn: &mut PgConnection,
        achievement_id: i64,
    ) -> Result<Option<i32>, sqlx::Error> {
        sqlx::query_scalar::<_, i32>(
            r#"
            SELECT required_count
            FROM achievements
            WHERE id = $1
            "#,
        )
        .bind(achievement_id)
        .fetch_optional(&mut *conn)
        .await
    }

    /// List all catalog achievements
    pub async fn list_all(pool: &PgPool) -> Result<Vec<Achievement>, sqlx::Error> {
        sqlx::query_as::<_, Achievement>(
            r#"
            SELECT id, title, description, icon, required_count
            FROM achievements
            ORDER BY id
            "#,
        )
        .fetch_all(pool)
        .await
    }

    /// Every catalog entry with the given user's progress, by id ascending
    pub async fn list_with_progress(
        pool: &PgPool,
        user_id: i64,
    ) -> Result<Vec<AchievementProgress>, sqlx::Error> {
        sqlx::query_as::<_, AchievementProgress>(
            r#"
            SELECT
                a.id,
                a.title,
                a.description,
                a.icon,
                a.required_count,
                COALESCE(ua.progress, 0) AS progress,
                COALESCE(ua.unlocked, false) AS unlocked,
                ua.unlocked_at
            FROM achievements a
            LEFT JOIN user_achievements ua
                ON a.id = ua.achievement_id AND ua.user_id = $1
            ORDER BY a.id
            "#,
        )
        .bind(user_id)
        .fetch_all(pool)
        .await
    }
}
