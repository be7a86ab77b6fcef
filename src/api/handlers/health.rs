//! Health check endpoint for monitoring and readiness probes

use axum::{extract::State, http::StatusCode, Json};

use crate::api::routes::ApiState;
use crate::observability::{HealthReport, HealthStatus};

/// Health check endpoint
///
/// Returns 200 while the service can answer requests, including when the upload
/// directory has not been created yet, and 503 when the database is unreachable.
#[utoipa::path(
    get,
    path = "/health",
    tag = "Health",
    responses(
        (status = 200, description = "Service is operational", body = HealthReport),
        (status = 503, description = "A required component is down", body = HealthReport)
    )
)]
pub async fn health_handler(State(state): State<ApiState>) -> (StatusCode, Json<HealthReport>) {
    let report = state.health.check().await;
    let status = match report.status {
        HealthStatus::Unhealthy => StatusCode::SERVICE_UNAVAILABLE,
        _ => StatusCode::OK,
    };
    (status, Json(report))
}
