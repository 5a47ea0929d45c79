use super::*;
use tempfile::TempDir;

#[tokio::test]
async fn creates_database_file_and_runs_migrations() {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let db_path = dir.path().join("culturebuddy.db");

    let database = Database::new(&db_path).await.expect("Failed to open database");
    assert!(db_path.exists());

    // Migrations are idempotent
    database
        .run_migrations()
        .await
        .expect("Re-running migrations failed");
}

#[tokio::test]
async fn in_memory_database_starts_empty() {
    let database = Database::in_memory().await.expect("Failed to open database");
    let users = UserQueries::list_all(database.pool())
        .await
        .expect("Failed to list users");
    assert!(users.is_empty());
}
