//! Test database utilities for in-library tests.
//!
//! Every call to [`test_pool`] returns a fresh single-connection in-memory SQLite
//! database with all migrations applied, so tests are fully isolated.

use crate::config::DatabaseConfig;
use crate::domain::{NewUser, Role, User};
use crate::storage::{create_pool, DbPool, SqlxUserRepository, UserRepository};

pub async fn test_pool() -> DbPool {
    create_pool(&DatabaseConfig::in_memory()).await.expect("in-memory test database")
}

/// Insert an account directly, bypassing registration rules.
pub async fn seed_user(pool: &DbPool, email: &str, role: Role) -> User {
    let name = email.split('@').next().unwrap_or(email).to_string();
    SqlxUserRepository::new(pool.clone())
        .create_user(NewUser::new(name, email.to_string(), "not-a-real-hash".to_string(), role))
        .await
        .expect("seed user")
}
