use axum::{extract::State, Extension, Json};
use tracing::instrument;

use crate::api::error::{ApiError, ErrorBody};
use crate::api::routes::ApiState;
use crate::auth::models::Session;
use crate::services::Profile;

/// The caller's account with role-specific sections
#[utoipa::path(
    get,
    path = "/api/v1/profile",
    responses(
        (status = 200, description = "Caller profile", body = Profile),
        (status = 401, description = "Missing or invalid session", body = ErrorBody),
        (status = 404, description = "Account no longer exists", body = ErrorBody)
    ),
    security(("bearer_auth" = [])),
    tag = "Profile"
)]
#[instrument(skip(state, session), fields(user_id = %session.user_id))]
pub async fn get_profile_handler(
    State(state): State<ApiState>,
    Extension(session): Extension<Session>,
) -> Result<Json<Profile>, ApiError> {
    let profile = state.services.profiles.get_own_profile(&session).await?;
    Ok(Json(profile))
}
