//! Application wiring
//!
//! Builds every long-lived component from an [`AppConfig`]: pool, blob store,
//! token service, services and the router.

use std::sync::Arc;

use axum::Router;
use tracing::info;

use crate::api::{build_router, ApiState};
use crate::auth::{DecisionTable, SessionResolver, TokenService};
use crate::config::AppConfig;
use crate::errors::Result;
use crate::observability::HealthChecker;
use crate::services::AppServices;
use crate::storage::{create_pool, DbPool, LocalBlobStore};

/// Connect to the configured database and build the router.
pub async fn build_app(config: &AppConfig) -> Result<Router> {
    let pool = create_pool(&config.database).await?;
    build_app_with_pool(config, pool).await
}

/// Build the router over an existing pool. Creates the upload directory.
pub async fn build_app_with_pool(config: &AppConfig, pool: DbPool) -> Result<Router> {
    let blobs = LocalBlobStore::new(config.uploads.root_dir.clone());
    blobs.ensure_dirs().await?;

    let tokens =
        Arc::new(TokenService::new(config.auth.jwt_secret.as_bytes(), config.auth.token_ttl()));
    let resolver = SessionResolver::new(tokens.clone());

    let services = AppServices::with_sqlx(
        pool.clone(),
        tokens,
        Arc::new(blobs),
        config.uploads.clone(),
        config.policies,
    );
    let health = HealthChecker::new(pool, config.uploads.root_dir.clone());

    info!(
        upload_dir = %config.uploads.root_dir.display(),
        team_creation = ?config.policies.team_creation,
        "application components initialized"
    );

    let decisions = DecisionTable::new(config.policies.team_creation);

    Ok(build_router(ApiState { services, health, decisions }, resolver, config))
}
