//! Tests for database initialization
//!
//! Covers automatic database creation, idempotent reopen, and the
//! reference data seeded into a fresh file.

use cropwise_common::db::init_database;

#[tokio::test]
async fn test_database_creation_when_missing() {
    let dir = tempfile::tempdir().unwrap();
    let db_path = dir.path().join("nested").join("cropwise.db");

    let result = init_database(&db_path).await;

    assert!(result.is_ok(), "Database initialization failed: {:?}", result.err());
    assert!(db_path.exists(), "Database file was not created");
}

#[tokio::test]
async fn test_database_opens_existing() {
    let dir = tempfile::tempdir().unwrap();
    let db_path = dir.path().join("cropwise.db");

    let pool1 = init_database(&db_path).await.expect("first open");
    pool1.close().await;

    let pool2 = init_database(&db_path).await;
    assert!(pool2.is_ok(), "Failed to open existing database: {:?}", pool2.err());
}

#[tokio::test]
async fn test_tables_created_and_seeded() {
    let dir = tempfile::tempdir().unwrap();
    let db_path = dir.path().join("cropwise.db");
    let pool = init_database(&db_path).await.unwrap();

    let tables: Vec<(String,)> = sqlx::query_as(
        "SELECT name FROM sqlite_master WHERE type = 'table' AND name NOT LIKE 'sqlite_%' ORDER BY name",
    )
    .fetch_all(&pool)
    .await
    .unwrap();
    let names: Vec<&str> = tables.iter().map(|(n,)| n.as_str()).collect();
    assert_eq!(names, vec!["crops", "planner", "soil_types"]);

    let soils: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM soil_types")
        .fetch_one(&pool)
        .await
        .unwrap();
    assert!(soils > 0);

    let planner: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM planner")
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(planner, 0);
}

#[tokio::test]
async fn test_reopen_does_not_duplicate_seed() {
    let dir = tempfile::tempdir().unwrap();
    let db_path = dir.path().join("cropwise.db");

    let pool = init_database(&db_path).await.unwrap();
    let before: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM crops")
        .fetch_one(&pool)
        .await
        .unwrap();
    pool.close().await;

    let pool = init_database(&db_path).await.unwrap();
    let after: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM crops")
        .fetch_one(&pool)
        .await
        .unwrap();

    assert_eq!(before, after);
}
