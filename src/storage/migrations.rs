//! # Database Migration Management
//!
//! Schema files under `migrations/` are embedded in the binary at compile time and
//! applied on startup when `auto_migrate` is enabled, or through the `migrate`
//! subcommand.

use crate::errors::Result;
use crate::storage::DbPool;
use serde::Serialize;
use sqlx::migrate::Migrator;
use tracing::{error, info};

static MIGRATOR: Migrator = sqlx::migrate!("./migrations");

/// An applied migration as recorded by sqlx
#[derive(Debug, Clone, Serialize)]
pub struct MigrationInfo {
    pub version: i64,
    pub description: String,
    pub installed_on: chrono::DateTime<chrono::Utc>,
    pub execution_time: i64,
}

/// Run all pending database migrations
pub async fn run_migrations(pool: &DbPool) -> Result<()> {
    info!(available = MIGRATOR.iter().count(), "Starting database migration process");

    MIGRATOR.run(pool).await.map_err(|e| {
        error!(error = %e, "Database migration failed");
        e
    })?;

    info!(version = ?get_migration_version(pool).await?, "Database migrations complete");
    Ok(())
}

/// Highest applied migration version, `None` on a fresh database
pub async fn get_migration_version(pool: &DbPool) -> Result<Option<i64>> {
    Ok(list_applied_migrations(pool).await?.last().map(|m| m.version))
}

/// List applied migrations in version order
pub async fn list_applied_migrations(pool: &DbPool) -> Result<Vec<MigrationInfo>> {
    let table_exists: i64 = sqlx::query_scalar(
        "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table' AND name = '_sqlx_migrations'",
    )
    .fetch_one(pool)
    .await?;

    if table_exists == 0 {
        return Ok(Vec::new());
    }

    let rows: Vec<(i64, String, chrono::DateTime<chrono::Utc>, i64)> = sqlx::query_as(
        "SELECT version, description, installed_on, execution_time \
         FROM _sqlx_migrations WHERE success = 1 ORDER BY version",
    )
    .fetch_all(pool)
    .await?;

    Ok(rows
        .into_iter()
        .map(|(version, description, installed_on, execution_time)| MigrationInfo {
            version,
            description,
            installed_on,
            execution_time,
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DatabaseConfig;
    use crate::storage::create_pool;

    #[tokio::test]
    async fn migrations_are_idempotent() {
        let config = DatabaseConfig { auto_migrate: false, ..DatabaseConfig::in_memory() };
        let pool = create_pool(&config).await.unwrap();

        assert_eq!(get_migration_version(&pool).await.unwrap(), None);

        run_migrations(&pool).await.unwrap();
        run_migrations(&pool).await.unwrap();

        let applied = list_applied_migrations(&pool).await.unwrap();
        assert_eq!(applied.len(), MIGRATOR.iter().count());
        assert_eq!(get_migration_version(&pool).await.unwrap(), Some(20250101000001));
    }
}
