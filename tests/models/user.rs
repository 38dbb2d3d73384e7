//! User Model Tests

use gamify_core::models::{NewUser, User, XpAward};
use sqlx::PgPool;

async fn create(pool: &PgPool, telegram_id: i64, username: &str) -> sqlx::Result<User> {
    User::upsert(
        pool,
        NewUser {
            telegram_id,
            username: Some(username.to_string()),
        },
    )
    .await
}

#[sqlx::test]
async fn test_user_defaults_and_lookup(pool: PgPool) -> sqlx::Result<()> {
    let created = create(&pool, 555, "alice").await?;
    assert_eq!(created.level, 1);
    assert_eq!(created.xp, 0);
    assert_eq!(created.total_completed, 0);
    assert_eq!(created.streak, 0);

    let found = User::find_by_telegram_id(&pool, 555)
        .await?
        .expect("user not found");
    assert_eq!(found.id, created.id);

    assert!(User::find_by_telegram_id(&pool, 556).await?.is_none());
    Ok(())
}

#[sqlx::test]
async fn test_upsert_renames_without_resetting_progress(pool: PgPool) -> sqlx::Result<()> {
    let created = create(&pool, 777, "bob").await?;
    User::apply_award(
        &pool,
        created.id,
        XpAward {
            xp_increment: 60,
            completed_task: true,
        },
    )
    .await?;

    let renamed = create(&pool, 777, "robert").await?;
    assert_eq!(renamed.id, created.id);
    assert_eq!(renamed.username.as_deref(), Some("robert"));
    assert_eq!(renamed.xp, 60);
    assert_eq!(renamed.total_completed, 1);
    Ok(())
}

#[sqlx::test]
async fn test_award_promotes_one_level_at_most(pool: PgPool) -> sqlx::Result<()> {
    let user = create(&pool, 1, "carol").await?;

    let awarded = User::apply_award(
        &pool,
        user.id,
        XpAward {
            xp_increment: 350,
            completed_task: false,
        },
    )
    .await?
    .expect("user not found");
    assert_eq!(awarded.xp, 350);
    assert_eq!(awarded.level, 2);
    assert_eq!(awarded.total_completed, 0);

    // 350 >= 2 * 100, so the next award promotes again even with no xp
    let awarded = User::apply_award(
        &pool,
        user.id,
        XpAward {
            xp_increment: 0,
            completed_task: true,
        },
    )
    .await?
    .expect("user not found");
    assert_eq!(awarded.level, 3);
    assert_eq!(awarded.total_completed, 1);
    Ok(())
}

#[sqlx::test]
async fn test_award_for_missing_user(pool: PgPool) -> sqlx::Result<()> {
    let result = User::apply_award(
        &pool,
        424242,
        XpAward {
            xp_increment: 10,
            completed_task: true,
        },
    )
    .await?;
    assert!(result.is_none());
    Ok(())
}
