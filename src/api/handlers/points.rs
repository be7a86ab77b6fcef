use axum::{extract::rejection::JsonRejection, extract::State, Extension, Json};
use tracing::instrument;

use crate::api::error::{ApiError, ErrorBody};
use crate::api::routes::ApiState;
use crate::auth::models::Session;
use crate::services::{AwardPointsRequest, PointsBalance};

/// Add points to an employee's balance
#[utoipa::path(
    post,
    path = "/api/v1/points",
    request_body = AwardPointsRequest,
    responses(
        (status = 200, description = "New balance", body = PointsBalance),
        (status = 400, description = "Invalid amount or target", body = ErrorBody),
        (status = 403, description = "Leaders only", body = ErrorBody),
        (status = 404, description = "Employee not found", body = ErrorBody)
    ),
    security(("bearer_auth" = [])),
    tag = "Points"
)]
#[instrument(skip(state, session, payload), fields(user_id = %session.user_id))]
pub async fn award_points_handler(
    State(state): State<ApiState>,
    Extension(session): Extension<Session>,
    payload: Result<Json<AwardPointsRequest>, JsonRejection>,
) -> Result<Json<PointsBalance>, ApiError> {
    let Json(request) = payload?;
    let balance = state.services.points.award_points(&session, request).await?;
    Ok(Json(balance))
}
