//! Session and authentication error models.

use serde::{Deserialize, Serialize};
use thiserror::Error;
use utoipa::ToSchema;

use crate::domain::{Role, UserId};
use crate::errors::{AuthErrorType, StaffdeskError};

/// The authenticated caller of an operation.
///
/// Built only from a verified token; the acting role is never taken from a request body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    pub user_id: UserId,
    pub name: String,
    pub role: Role,
}

impl Session {
    pub fn new(user_id: UserId, name: impl Into<String>, role: Role) -> Self {
        Self { user_id, name: name.into(), role }
    }

    pub fn is(&self, role: Role) -> bool {
        self.role == role
    }
}

/// Why a credential could not be turned into a [`Session`]
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum AuthError {
    #[error("unauthorized: credential missing")]
    MissingToken,
    #[error("unauthorized: malformed credential")]
    MalformedToken,
    #[error("unauthorized: invalid session token")]
    InvalidToken,
    #[error("unauthorized: session token expired")]
    ExpiredToken,
}

impl From<AuthError> for StaffdeskError {
    fn from(error: AuthError) -> Self {
        let error_type = match error {
            AuthError::MissingToken => AuthErrorType::MissingToken,
            AuthError::MalformedToken => AuthErrorType::MalformedToken,
            AuthError::InvalidToken => AuthErrorType::InvalidToken,
            AuthError::ExpiredToken => AuthErrorType::ExpiredToken,
        };
        StaffdeskError::auth(error.to_string(), error_type)
    }
}
