#![cfg(test)]
use tokio::sync::OnceCell;
use sea_orm::DatabaseConnection;
use migration::MigratorTrait;
use models::db::{connect_with_config, DatabaseConfig, DATABASE_URL};

// Ensure migrations run only once across the entire test process
static MIGRATED: OnceCell<()> = OnceCell::const_new();

/// DB-backed tests run only when a database is configured.
pub fn skip_db_tests() -> bool {
    std::env::var("SKIP_DB_TESTS").is_ok() || std::env::var("DATABASE_URL").is_err()
}

fn test_config() -> DatabaseConfig {
    DatabaseConfig {
        url: DATABASE_URL.clone(),
        max_connections: 20,
        min_connections: 1,
        acquire_timeout_secs: 10,
        ..DatabaseConfig::default()
    }
}

pub async fn get_db() -> Result<DatabaseConnection, anyhow::Error> {
    // Run migrations exactly once, with a throwaway connection
    MIGRATED
        .get_or_init(|| async {
            let db = connect_with_config(&test_config()).await.expect("connect db for migration");
            migration::Migrator::up(&db, None).await.expect("migrate up");
            drop(db);
        })
        .await;

    // Return a fresh connection for the current test's runtime
    let db = connect_with_config(&test_config()).await?;
    Ok(db)
}
