use axum::{extract::rejection::JsonRejection, extract::State, http::StatusCode, Extension, Json};
use tracing::instrument;

use crate::api::error::{ApiError, ErrorBody};
use crate::api::routes::ApiState;
use crate::auth::models::Session;
use crate::domain::AnnotationView;
use crate::services::CreateAnnotationRequest;

#[utoipa::path(
    post,
    path = "/api/v1/annotations",
    request_body = CreateAnnotationRequest,
    responses(
        (status = 201, description = "Annotation created", body = AnnotationView),
        (status = 400, description = "Validation error", body = ErrorBody),
        (status = 403, description = "Leaders only", body = ErrorBody),
        (status = 404, description = "Employee not found", body = ErrorBody)
    ),
    security(("bearer_auth" = [])),
    tag = "Annotations"
)]
#[instrument(skip(state, session, payload), fields(user_id = %session.user_id))]
pub async fn create_annotation_handler(
    State(state): State<ApiState>,
    Extension(session): Extension<Session>,
    payload: Result<Json<CreateAnnotationRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<AnnotationView>), ApiError> {
    let Json(request) = payload?;
    let annotation = state.services.annotations.create_annotation(&session, request).await?;
    Ok((StatusCode::CREATED, Json(annotation)))
}

#[utoipa::path(
    get,
    path = "/api/v1/annotations",
    responses(
        (status = 200, description = "Annotations written by the caller", body = [AnnotationView]),
        (status = 403, description = "Leaders only", body = ErrorBody)
    ),
    security(("bearer_auth" = [])),
    tag = "Annotations"
)]
#[instrument(skip(state, session), fields(user_id = %session.user_id))]
pub async fn list_annotations_handler(
    State(state): State<ApiState>,
    Extension(session): Extension<Session>,
) -> Result<Json<Vec<AnnotationView>>, ApiError> {
    let annotations = state.services.annotations.list_own_annotations(&session).await?;
    Ok(Json(annotations))
}
