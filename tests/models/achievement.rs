//! Achievement Model Tests

use gamify_core::models::{Achievement, NewUser, User, UserAchievement};
use sqlx::PgPool;

async fn setup(pool: &PgPool) -> sqlx::Result<(User, Achievement)> {
    let user = User::upsert(
        pool,
        NewUser {
            telegram_id: 9,
            username: Some("dana".to_string()),
        },
    )
    .await?;
    let achievement = sqlx::query_as::<_, Achievement>(
        r#"
        INSERT INTO achievements (title, description, icon, required_count)
        VALUES ('Triple', 'Complete three tasks', 'Medal', 3)
        RETURNING id, title, description, icon, required_count
        "#,
    )
    .fetch_one(pool)
    .await?;
    Ok((user, achievement))
}

#[sqlx::test]
async fn test_catalog_is_seeded_in_id_order(pool: PgPool) -> sqlx::Result<()> {
    let catalog = Achievement::list_all(&pool).await?;
    assert!(!catalog.is_empty());
    assert!(catalog.windows(2).all(|pair| pair[0].id < pair[1].id));
    Ok(())
}

#[sqlx::test]
async fn test_progress_accumulates_and_unlocks_once(pool: PgPool) -> sqlx::Result<()> {
    let (user, achievement) = setup(&pool).await?;
    let mut conn = pool.acquire().await?;

    let outcome =
        UserAchievement::record_progress(&mut conn, user.id, achievement.id, 2, 3).await?;
    assert_eq!(outcome.progress, 2);
    assert!(!outcome.unlocked);
    let row = UserAchievement::find(&mut conn, user.id, achievement.id)
        .await?
        .expect("progress row missing");
    assert!(row.unlocked_at.is_none());

    let outcome =
        UserAchievement::record_progress(&mut conn, user.id, achievement.id, 1, 3).await?;
    assert_eq!(outcome.progress, 3);
    assert!(outcome.unlocked);
    let unlocked_at = UserAchievement::find(&mut conn, user.id, achievement.id)
        .await?
        .and_then(|row| row.unlocked_at)
        .expect("unlock time not set");

    let outcome =
        UserAchievement::record_progress(&mut conn, user.id, achievement.id, 5, 3).await?;
    assert_eq!(outcome.progress, 8);
    assert!(outcome.unlocked);
    let row = UserAchievement::find(&mut conn, user.id, achievement.id)
        .await?
        .expect("progress row missing");
    assert_eq!(row.unlocked_at, Some(unlocked_at));
    Ok(())
}

#[sqlx::test]
async fn test_list_with_progress_covers_whole_catalog(pool: PgPool) -> sqlx::Result<()> {
    let (user, achievement) = setup(&pool).await?;
    let catalog = Achievement::list_all(&pool).await?;

    let mut conn = pool.acquire().await?;
    UserAchievement::record_progress(&mut conn, user.id, achievement.id, 1, 3).await?;
    drop(conn);

    let listed = Achievement::list_with_progress(&pool, user.id).await?;
    assert_eq!(listed.len(), catalog.len());
    for row in &listed {
        if row.id == achievement.id {
            assert_eq!(row.progress, 1);
        } else {
            assert_eq!(row.progress, 0);
            assert!(!row.unlocked);
            assert!(row.unlocked_at.is_none());
        }
    }
    Ok(())
}

#[sqlx::test]
async fn test_required_count_lookup(pool: PgPool) -> sqlx::Result<()> {
    let (_, achievement) = setup(&pool).await?;
    let mut conn = pool.acquire().await?;
    assert_eq!(
        Achievement::find_required_count(&mut conn, achievement.id).await?,
        Some(3)
    );
    assert_eq!(Achievement::find_required_count(&mut conn, -1).await?, None);
    Ok(())
}
