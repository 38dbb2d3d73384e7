//! Database Connection Tests

use gamify_core::database::DatabaseConnection;
use sqlx::PgPool;

#[sqlx::test]
async fn test_health_check_on_existing_pool(pool: PgPool) -> sqlx::Result<()> {
    let connection = DatabaseConnection::from_pool(pool);
    assert!(connection.health_check().await.unwrap());
    Ok(())
}
