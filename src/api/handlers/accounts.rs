//! Registration and login.

use axum::{extract::rejection::JsonRejection, extract::State, http::StatusCode, Extension, Json};
use tracing::instrument;

use crate::api::error::{ApiError, ErrorBody};
use crate::api::routes::ApiState;
use crate::auth::models::Session;
use crate::auth::user::{LoginRequest, LoginResponse, RegisterEmployeeRequest, RegisterRequest};
use crate::domain::PublicUser;

#[utoipa::path(
    post,
    path = "/api/v1/auth/register",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "Account registered", body = PublicUser),
        (status = 400, description = "Validation error", body = ErrorBody),
        (status = 403, description = "Employees cannot self-register", body = ErrorBody),
        (status = 409, description = "Email already registered", body = ErrorBody)
    ),
    tag = "Accounts"
)]
#[instrument(skip(state, payload))]
pub async fn register_handler(
    State(state): State<ApiState>,
    payload: Result<Json<serde_json::Value>, JsonRejection>,
) -> Result<(StatusCode, Json<PublicUser>), ApiError> {
    let Json(body) = payload?;
    let user = state.services.accounts.register_self_json(body).await?;
    Ok((StatusCode::CREATED, Json(user)))
}

#[utoipa::path(
    post,
    path = "/api/v1/auth/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Session token issued", body = LoginResponse),
        (status = 400, description = "Validation error", body = ErrorBody),
        (status = 401, description = "Invalid email or password", body = ErrorBody)
    ),
    tag = "Accounts"
)]
#[instrument(skip(state, payload))]
pub async fn login_handler(
    State(state): State<ApiState>,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> Result<Json<LoginResponse>, ApiError> {
    let Json(request) = payload?;
    let response = state.services.accounts.login(request).await?;
    Ok(Json(response))
}

#[utoipa::path(
    post,
    path = "/api/v1/employees",
    request_body = RegisterEmployeeRequest,
    responses(
        (status = 201, description = "Employee registered", body = PublicUser),
        (status = 400, description = "Validation error", body = ErrorBody),
        (status = 401, description = "Missing or invalid session", body = ErrorBody),
        (status = 403, description = "Managers only", body = ErrorBody),
        (status = 409, description = "Email already registered", body = ErrorBody)
    ),
    security(("bearer_auth" = [])),
    tag = "Accounts"
)]
#[instrument(skip(state, session, payload), fields(user_id = %session.user_id))]
pub async fn register_employee_handler(
    State(state): State<ApiState>,
    Extension(session): Extension<Session>,
    payload: Result<Json<RegisterEmployeeRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<PublicUser>), ApiError> {
    let Json(request) = payload?;
    let user = state.services.accounts.register_employee(&session, request).await?;
    Ok((StatusCode::CREATED, Json(user)))
}
