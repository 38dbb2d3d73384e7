//! Concurrent invocations must not lose updates

use gamify_core::models::{NewUser, XpAward};
use gamify_core::store::{AchievementStore, PgStore, UserStore};
use sqlx::PgPool;
use tokio::task::JoinSet;

const WORKERS: i32 = 16;

#[sqlx::test]
async fn test_concurrent_awards_are_all_applied(pool: PgPool) -> sqlx::Result<()> {
    let store = PgStore::new(pool);
    let user = store
        .upsert_user(NewUser {
            telegram_id: 31,
            username: None,
        })
        .await
        .unwrap();
    let user_id = user.id;

    let mut workers = JoinSet::new();
    for _ in 0..WORKERS {
        let store = store.clone();
        workers.spawn(async move {
            store
                .apply_award(
                    user_id,
                    XpAward {
                        xp_increment: 5,
                        completed_task: true,
                    },
                )
                .await
        });
    }
    while let Some(result) = workers.join_next().await {
        result.unwrap().unwrap();
    }

    let user = store.find_by_telegram_id(31).await.unwrap().unwrap();
    assert_eq!(user.xp, WORKERS * 5);
    assert_eq!(user.total_completed, WORKERS);
    Ok(())
}

#[sqlx::test]
async fn test_concurrent_progress_unlocks_exactly_once(pool: PgPool) -> sqlx::Result<()> {
    let achievement_id: i64 = sqlx::query_scalar(
        r#"
        INSERT INTO achievements (title, description, icon, required_count)
        VALUES ('Crowd', 'Ten at once', 'Users', 10)
        RETURNING id
        "#,
    )
    .fetch_one(&pool)
    .await?;
    let store = PgStore::new(pool);
    let user = store
        .upsert_user(NewUser {
            telegram_id: 32,
            username: None,
        })
        .await
        .unwrap();
    let user_id = user.id;

    let mut workers = JoinSet::new();
    for _ in 0..WORKERS {
        let store = store.clone();
        workers.spawn(async move { store.increment_progress(user_id, achievement_id, 1).await });
    }
    let mut unlocked_responses = 0;
    while let Some(result) = workers.join_next().await {
        let outcome = result.unwrap().unwrap().unwrap();
        if outcome.unlocked {
            unlocked_responses += 1;
        }
    }
    // Responses from the tenth increment onward all report the unlock
    assert_eq!(unlocked_responses, WORKERS - 9);

    let (progress, unlocked_at): (i32, Option<chrono::NaiveDateTime>) = sqlx::query_as(
        "SELECT progress, unlocked_at FROM user_achievements WHERE user_id = $1 AND achievement_id = $2",
    )
    .bind(user_id)
    .bind(achievement_id)
    .fetch_one(store.pool())
    .await?;
    assert_eq!(progress, WORKERS);
    assert!(unlocked_at.is_some());
    Ok(())
}
