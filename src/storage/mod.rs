//! # Storage and Persistence
//!
//! SQLite connectivity, embedded migrations, the repositories backing every entity,
//! and the blob store for uploaded files.

pub mod blob;
pub mod migrations;
pub mod pool;
pub mod repositories;

#[cfg(test)]
pub mod test_helpers;

pub use crate::config::DatabaseConfig;

pub use blob::{BlobConstraints, BlobStore, LocalBlobStore};
pub use migrations::{get_migration_version, list_applied_migrations, MigrationInfo};
pub use pool::{create_pool, get_pool_stats, DbPool, PoolStats};
pub use repositories::{
    AnnotationRepository, RecruitmentRepository, ResumeRepository, SqlxAnnotationRepository,
    SqlxRecruitmentRepository, SqlxResumeRepository, SqlxTeamRepository, SqlxUserRepository,
    TeamRepository, UserRepository,
};

use crate::errors::{Result, StaffdeskError};

/// Run database migrations
pub async fn run_migrations(pool: &DbPool) -> Result<()> {
    migrations::run_migrations(pool).await
}

/// Check database connectivity
pub async fn check_connection(pool: &DbPool) -> Result<()> {
    sqlx::query("SELECT 1").fetch_one(pool).await.map_err(|e| StaffdeskError::Database {
        source: e,
        context: "Database connectivity check failed".to_string(),
    })?;

    Ok(())
}
