//! # Health Checking
//!
//! Liveness report covering the database and the upload directory.

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::path::PathBuf;
use utoipa::ToSchema;

use crate::storage::{check_connection, get_pool_stats, DbPool};

/// Health status for a component
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum HealthStatus {
    Healthy,
    Degraded,
    Unhealthy,
}

impl HealthStatus {
    pub fn is_operational(&self) -> bool {
        matches!(self, HealthStatus::Healthy | HealthStatus::Degraded)
    }
}

/// Health check result for a component
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct HealthCheck {
    pub component: String,
    pub status: HealthStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl HealthCheck {
    pub fn healthy(component: &str) -> Self {
        Self { component: component.to_string(), status: HealthStatus::Healthy, message: None }
    }

    pub fn degraded<S: Into<String>>(component: &str, message: S) -> Self {
        Self {
            component: component.to_string(),
            status: HealthStatus::Degraded,
            message: Some(message.into()),
        }
    }

    pub fn unhealthy<S: Into<String>>(component: &str, message: S) -> Self {
        Self {
            component: component.to_string(),
            status: HealthStatus::Unhealthy,
            message: Some(message.into()),
        }
    }
}

/// Aggregated report returned by `/health`
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct HealthReport {
    pub status: HealthStatus,
    pub version: String,
    pub checked_at: DateTime<Utc>,
    pub components: Vec<HealthCheck>,
}

#[derive(Debug, Clone)]
pub struct HealthChecker {
    pool: DbPool,
    upload_dir: PathBuf,
}

impl HealthChecker {
    pub fn new(pool: DbPool, upload_dir: impl Into<PathBuf>) -> Self {
        Self { pool, upload_dir: upload_dir.into() }
    }

    pub async fn check(&self) -> HealthReport {
        let components = vec![self.check_database().await, self.check_uploads().await];

        let status = if components.iter().any(|c| c.status == HealthStatus::Unhealthy) {
            HealthStatus::Unhealthy
        } else if components.iter().any(|c| c.status == HealthStatus::Degraded) {
            HealthStatus::Degraded
        } else {
            HealthStatus::Healthy
        };

        HealthReport {
            status,
            version: crate::VERSION.to_string(),
            checked_at: Utc::now(),
            components,
        }
    }

    async fn check_database(&self) -> HealthCheck {
        if let Err(e) = check_connection(&self.pool).await {
            return HealthCheck::unhealthy("database", e.to_string());
        }

        let stats = get_pool_stats(&self.pool);
        crate::observability::metrics::update_db_connections(stats.active());
        HealthCheck::healthy("database")
    }

    async fn check_uploads(&self) -> HealthCheck {
        match tokio::fs::metadata(&self.upload_dir).await {
            Ok(meta) if meta.is_dir() => HealthCheck::healthy("uploads"),
            Ok(_) => HealthCheck::unhealthy("uploads", "upload path is not a directory"),
            Err(_) => HealthCheck::degraded("uploads", "upload directory not created yet"),
        }
    }
}
