use axum::{extract::rejection::JsonRejection, extract::State, http::StatusCode, Extension, Json};
use tracing::instrument;

use crate::api::error::{ApiError, ErrorBody};
use crate::api::routes::ApiState;
use crate::auth::models::Session;
use crate::domain::Recruitment;
use crate::services::CreateRecruitmentRequest;

#[utoipa::path(
    post,
    path = "/api/v1/recruitments",
    request_body = CreateRecruitmentRequest,
    responses(
        (status = 201, description = "Recruitment created", body = Recruitment),
        (status = 400, description = "Validation error or unknown resume", body = ErrorBody),
        (status = 403, description = "Managers only", body = ErrorBody)
    ),
    security(("bearer_auth" = [])),
    tag = "Recruitments"
)]
#[instrument(skip(state, session, payload), fields(user_id = %session.user_id))]
pub async fn create_recruitment_handler(
    State(state): State<ApiState>,
    Extension(session): Extension<Session>,
    payload: Result<Json<CreateRecruitmentRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<Recruitment>), ApiError> {
    let Json(request) = payload?;
    let recruitment = state.services.recruitments.create_recruitment(&session, request).await?;
    Ok((StatusCode::CREATED, Json(recruitment)))
}

#[utoipa::path(
    get,
    path = "/api/v1/recruitments",
    responses(
        (status = 200, description = "Recruitments owned by the caller", body = [Recruitment]),
        (status = 403, description = "Managers only", body = ErrorBody)
    ),
    security(("bearer_auth" = [])),
    tag = "Recruitments"
)]
#[instrument(skip(state, session), fields(user_id = %session.user_id))]
pub async fn list_recruitments_handler(
    State(state): State<ApiState>,
    Extension(session): Extension<Session>,
) -> Result<Json<Vec<Recruitment>>, ApiError> {
    let recruitments = state.services.recruitments.list_own_recruitments(&session).await?;
    Ok(Json(recruitments))
}
