//! Task Model Tests

use gamify_core::constants::TaskPriority;
use gamify_core::models::{NewTask, NewUser, Task, User};
use sqlx::PgPool;

async fn owner(pool: &PgPool) -> sqlx::Result<User> {
    User::upsert(
        pool,
        NewUser {
            telegram_id: 100,
            username: None,
        },
    )
    .await
}

fn new_task(user_id: i64, title: &str) -> NewTask {
    NewTask {
        user_id,
        title: title.to_string(),
        description: String::new(),
        interval: "daily".to_string(),
        assigned_to: None,
        priority: TaskPriority::default(),
    }
}

#[sqlx::test]
async fn test_create_and_list(pool: PgPool) -> sqlx::Result<()> {
    let user = owner(&pool).await?;
    let first = Task::create(&pool, new_task(user.id, "Dishes")).await?;
    let second = Task::create(
        &pool,
        NewTask {
            assigned_to: Some("Sam".to_string()),
            priority: TaskPriority::High,
            ..new_task(user.id, "Laundry")
        },
    )
    .await?;

    assert_eq!(first.status, "active");
    assert_eq!(first.priority, "medium");
    assert_eq!(first.reminder_count, 0);
    assert!(first.completed_at.is_none());
    assert_eq!(second.priority, "high");
    assert_eq!(second.assigned_to.as_deref(), Some("Sam"));

    let active = Task::list_for_user(&pool, user.id, "active").await?;
    let ids: Vec<i64> = active.iter().map(|task| task.id).collect();
    assert_eq!(ids, vec![second.id, first.id]);

    assert!(Task::list_for_user(&pool, user.id, "completed").await?.is_empty());
    Ok(())
}

#[sqlx::test]
async fn test_status_changes_keep_completion_time(pool: PgPool) -> sqlx::Result<()> {
    let user = owner(&pool).await?;
    let task = Task::create(&pool, new_task(user.id, "Trash")).await?;

    let completed = Task::update_status(&pool, task.id, "completed")
        .await?
        .expect("task not found");
    assert!(completed.is_completed());
    let completed_at = completed.completed_at.expect("completion time not set");

    let reopened = Task::update_status(&pool, task.id, "active")
        .await?
        .expect("task not found");
    assert_eq!(reopened.status, "active");
    assert_eq!(reopened.completed_at, Some(completed_at));

    assert!(Task::update_status(&pool, 987654, "completed").await?.is_none());
    Ok(())
}

#[sqlx::test]
async fn test_task_requires_owner(pool: PgPool) -> sqlx::Result<()> {
    let result = Task::create(&pool, new_task(31337, "Orphan")).await;
    let err = result.expect_err("foreign key should reject the task");
    let code = err
        .as_database_error()
        .and_then(|db| db.code())
        .map(|code| code.into_owned());
    assert_eq!(code.as_deref(), Some("23503"));
    Ok(())
}
