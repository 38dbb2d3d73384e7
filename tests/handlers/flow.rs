//! End-to-end flows across the three services

use gamify_core::config::GamifyConfig;
use gamify_core::handlers::{EventHandler, GamifyHandlers, HandlerEvent};
use gamify_core::store::PgStore;
use serde_json::{json, Value};
use sqlx::PgPool;
use std::sync::Arc;

fn handlers(pool: PgPool) -> GamifyHandlers {
    GamifyHandlers::new(Arc::new(PgStore::new(pool)), &GamifyConfig::default())
}

async fn first_achievement_id(pool: &PgPool) -> sqlx::Result<i64> {
    sqlx::query_scalar::<_, i64>("SELECT id FROM achievements WHERE required_count = 1 ORDER BY id LIMIT 1")
        .fetch_one(pool)
        .await
}

#[sqlx::test]
async fn test_complete_task_earns_level_and_achievement(pool: PgPool) -> sqlx::Result<()> {
    let achievement_id = first_achievement_id(&pool).await?;
    let handlers = handlers(pool);

    let response = handlers
        .users
        .handle(
            HandlerEvent::new("POST")
                .with_json_body(&json!({"telegram_id": 555, "username": "alice"})),
        )
        .await;
    assert_eq!(response.status_code, 201);
    let user: Value = response.body_json().unwrap()["user"].clone();
    let user_id = user["id"].as_i64().unwrap();
    assert_eq!(user["level"], 1);

    let response = handlers
        .tasks
        .handle(HandlerEvent::new("POST").with_json_body(&json!({
            "user_id": user_id,
            "title": "Vacuum",
            "interval": "weekly",
            "priority": "high"
        })))
        .await;
    assert_eq!(response.status_code, 201);
    let task_id = response.body_json().unwrap()["task"]["id"]
        .as_str()
        .unwrap()
        .to_string();

    let response = handlers
        .tasks
        .handle(
            HandlerEvent::new("PUT")
                .with_path_param("id", task_id)
                .with_json_body(&json!({"status": "completed"})),
        )
        .await;
    assert_eq!(response.status_code, 200);
    let task = response.body_json().unwrap()["task"].clone();
    assert_eq!(task["status"], "completed");
    assert!(task["completedAt"].is_string());

    let response = handlers
        .users
        .handle(HandlerEvent::new("PUT").with_json_body(&json!({
            "user_id": user_id,
            "xp_increment": 150,
            "complete_task": true
        })))
        .await;
    assert_eq!(response.status_code, 200);
    let user = response.body_json().unwrap()["user"].clone();
    assert_eq!(user["level"], 2);
    assert_eq!(user["xp"], 150);
    assert_eq!(user["totalCompleted"], 1);

    let response = handlers
        .achievements
        .handle(HandlerEvent::new("POST").with_json_body(&json!({
            "user_id": user_id,
            "achievement_id": achievement_id
        })))
        .await;
    assert_eq!(response.status_code, 200);
    assert_eq!(
        response.body_json().unwrap(),
        json!({"progress": 1, "unlocked": true})
    );

    let response = handlers
        .achievements
        .handle(HandlerEvent::new("GET").with_query("user_id", user_id.to_string()))
        .await;
    assert_eq!(response.status_code, 200);
    let achievements = response.body_json().unwrap()["achievements"].clone();
    let unlocked = achievements
        .as_array()
        .unwrap()
        .iter()
        .find(|entry| entry["id"] == achievement_id.to_string())
        .expect("achievement missing from listing")
        .clone();
    assert_eq!(unlocked["progress"], 100);
    assert_eq!(unlocked["unlocked"], true);
    assert!(unlocked["unlockedAt"].is_string());
    Ok(())
}

#[sqlx::test]
async fn test_lookup_errors_are_reported_as_json(pool: PgPool) -> sqlx::Result<()> {
    let handlers = handlers(pool);

    let response = handlers
        .users
        .handle(HandlerEvent::new("GET").with_query("telegram_id", "12345"))
        .await;
    assert_eq!(response.status_code, 404);
    assert_eq!(response.body_json().unwrap(), json!({"error": "User not found"}));

    let response = handlers
        .achievements
        .handle(HandlerEvent::new("POST").with_json_body(&json!({
            "user_id": 1,
            "achievement_id": 999999
        })))
        .await;
    assert_eq!(response.status_code, 404);

    let response = handlers
        .tasks
        .handle(HandlerEvent::new("POST").with_json_body(&json!({
            "user_id": 999999,
            "title": "Nobody's chore",
            "interval": "daily"
        })))
        .await;
    assert_eq!(response.status_code, 409);
    assert_eq!(response.headers["Access-Control-Allow-Origin"], "*");
    Ok(())
}

#[sqlx::test]
async fn test_xp_overflow_is_a_client_error(pool: PgPool) -> sqlx::Result<()> {
    let handlers = handlers(pool);
    let response = handlers
        .users
        .handle(HandlerEvent::new("POST").with_json_body(&json!({"telegram_id": 90})))
        .await;
    let user_id = response.body_json().unwrap()["user"]["id"].as_i64().unwrap();
    let award = |xp: i32| {
        HandlerEvent::new("PUT").with_json_body(&json!({"user_id": user_id, "xp_increment": xp}))
    };

    let response = handlers.users.handle(award(i32::MAX - 1)).await;
    assert_eq!(response.status_code, 200);

    let response = handlers.users.handle(award(2)).await;
    assert_eq!(response.status_code, 400);
    assert_eq!(
        response.body_json().unwrap(),
        json!({"error": "integer out of range"})
    );
    Ok(())
}
