use axum::{
    extract::multipart::{MultipartError, MultipartRejection},
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde::Serialize;
use utoipa::ToSchema;

use crate::auth::models::AuthError;
use crate::errors::{ErrorKind, StaffdeskError};

#[derive(Debug)]
pub enum ApiError {
    Unauthenticated(String),
    InvalidSession(String),
    Forbidden(String),
    BadRequest(String),
    InvalidCredentials(String),
    Conflict(String),
    NotFound(String),
    PayloadTooLarge(String),
    Internal(String),
}

impl ApiError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            ApiError::Unauthenticated(_) => ErrorKind::Unauthenticated,
            ApiError::InvalidSession(_) => ErrorKind::InvalidSession,
            ApiError::Forbidden(_) => ErrorKind::Forbidden,
            ApiError::BadRequest(_) => ErrorKind::InvalidInput,
            ApiError::InvalidCredentials(_) => ErrorKind::InvalidCredentials,
            ApiError::Conflict(_) => ErrorKind::Conflict,
            ApiError::NotFound(_) => ErrorKind::NotFound,
            ApiError::PayloadTooLarge(_) => ErrorKind::PayloadTooLarge,
            ApiError::Internal(_) => ErrorKind::Internal,
        }
    }

    fn status_code(&self) -> StatusCode {
        StatusCode::from_u16(self.kind().status_code())
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
    }

    fn into_message(self) -> String {
        match self {
            ApiError::Unauthenticated(msg)
            | ApiError::InvalidSession(msg)
            | ApiError::Forbidden(msg)
            | ApiError::BadRequest(msg)
            | ApiError::InvalidCredentials(msg)
            | ApiError::Conflict(msg)
            | ApiError::NotFound(msg)
            | ApiError::PayloadTooLarge(msg)
            | ApiError::Internal(msg) => msg,
        }
    }
}

/// Error response body
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorBody {
    /// Stable snake_case error kind
    #[schema(example = "invalid_input")]
    pub error: &'static str,
    pub message: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        let status = self.status_code();
        let error = self.kind().as_str();
        let message = self.into_message();

        (status, Json(ErrorBody { error, message })).into_response()
    }
}

impl From<StaffdeskError> for ApiError {
    fn from(err: StaffdeskError) -> Self {
        match err.kind() {
            ErrorKind::Unauthenticated => ApiError::Unauthenticated(err.to_string()),
            ErrorKind::InvalidSession => ApiError::InvalidSession(err.to_string()),
            ErrorKind::Forbidden => ApiError::Forbidden(err.to_string()),
            ErrorKind::InvalidInput => ApiError::BadRequest(err.to_string()),
            ErrorKind::InvalidCredentials => {
                ApiError::InvalidCredentials("Invalid email or password".to_string())
            }
            ErrorKind::Conflict => match err {
                StaffdeskError::Conflict { message, .. } => ApiError::Conflict(message),
                _ => ApiError::Conflict("Resource already exists".to_string()),
            },
            ErrorKind::NotFound => ApiError::NotFound(err.to_string()),
            ErrorKind::PayloadTooLarge => ApiError::PayloadTooLarge(err.to_string()),
            ErrorKind::Internal => {
                tracing::error!(
                    error = %err,
                    source = ?std::error::Error::source(&err),
                    "internal error"
                );
                ApiError::Internal("Internal server error".to_string())
            }
        }
    }
}

impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        StaffdeskError::from(err).into()
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        if rejection.status() == StatusCode::PAYLOAD_TOO_LARGE {
            ApiError::PayloadTooLarge(rejection.body_text())
        } else {
            ApiError::BadRequest(rejection.body_text())
        }
    }
}

impl From<MultipartError> for ApiError {
    fn from(err: MultipartError) -> Self {
        if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
            ApiError::PayloadTooLarge(err.body_text())
        } else {
            ApiError::BadRequest(err.body_text())
        }
    }
}

impl From<MultipartRejection> for ApiError {
    fn from(rejection: MultipartRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}
