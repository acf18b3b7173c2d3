use sqlx::{postgres::PgPoolOptions, PgPool};

/// Creates a uniquely named throwaway database and returns a pool connected
/// to it with the schema applied. Tests that use this are `#[ignore]`d so
/// the suite passes without a Postgres around.
pub async fn test_pool() -> PgPool {
    let db_url = std::env::var("TEST_DATABASE_URL")
        .unwrap_or_else(|_| "postgres://localhost/vote_test".to_string());

    let test_db_name = format!(
        "test_{}_{}",
        std::process::id(),
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap()
            .as_nanos()
    );
    let base_url = db_url.rsplit_once('/').unwrap().0;
    let test_db_url = format!("{base_url}/{test_db_name}");

    let maintenance_pool = PgPoolOptions::new()
        .max_connections(1)
        .connect(&db_url)
        .await
        .expect("Failed to connect to postgres");

    sqlx::query(&format!("CREATE DATABASE \"{test_db_name}\""))
        .execute(&maintenance_pool)
        .await
        .expect("Failed to create test database");

    let pool = PgPoolOptions::new()
        .max_connections(5)
        .connect(&test_db_url)
        .await
        .expect("Failed to connect to test database");

    crate::schema::ensure_schema(&pool)
        .await
        .expect("Failed to apply schema");

    pool
}
