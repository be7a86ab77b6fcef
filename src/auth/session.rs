//! Session context resolution.
//!
//! Turns the credential carried by a request into a [`Session`]. Two headers are
//! accepted: `Authorization: Bearer <jwt>` and the legacy `x-auth-token: <jwt>`.
//! When both are present the `Authorization` header wins. Resolution is pure
//! verification and never touches the store.

use std::sync::Arc;

use axum::http::{header::AUTHORIZATION, HeaderMap};
use tracing::{debug, instrument};

use crate::auth::jwt::TokenService;
use crate::auth::models::{AuthError, Session};
use crate::domain::UserId;

/// Legacy credential header
pub const LEGACY_TOKEN_HEADER: &str = "x-auth-token";

/// Resolves request credentials into sessions
#[derive(Debug, Clone)]
pub struct SessionResolver {
    tokens: Arc<TokenService>,
}

impl SessionResolver {
    pub fn new(tokens: Arc<TokenService>) -> Self {
        Self { tokens }
    }

    pub fn token_service(&self) -> &TokenService {
        &self.tokens
    }

    /// Resolve the credential found in `headers`
    pub fn resolve_headers(&self, headers: &HeaderMap) -> Result<Session, AuthError> {
        let authorization = headers
            .get(AUTHORIZATION)
            .map(|value| value.to_str().map_err(|_| AuthError::MalformedToken))
            .transpose()?;
        let legacy = headers
            .get(LEGACY_TOKEN_HEADER)
            .map(|value| value.to_str().map_err(|_| AuthError::MalformedToken))
            .transpose()?;

        self.resolve(authorization, legacy)
    }

    /// Resolve raw header values
    #[instrument(skip_all, name = "session_resolve")]
    pub fn resolve(
        &self,
        authorization: Option<&str>,
        legacy_token: Option<&str>,
    ) -> Result<Session, AuthError> {
        let token = extract_token(authorization, legacy_token)?;
        let claims = self.tokens.verify(token)?;

        let role = claims.role()?;
        let user_id = UserId::parse(&claims.id).map_err(|_| AuthError::InvalidToken)?;

        debug!(user_id = %user_id, role = %role, "session resolved");
        Ok(Session::new(user_id, claims.name, role))
    }
}

/// Pick the raw token out of the credential headers
pub fn extract_token<'a>(
    authorization: Option<&'a str>,
    legacy_token: Option<&'a str>,
) -> Result<&'a str, AuthError> {
    if let Some(value) = authorization {
        let (scheme, token) = value.trim().split_once(' ').ok_or(AuthError::MalformedToken)?;
        if !scheme.eq_ignore_ascii_case("bearer") {
            return Err(AuthError::MalformedToken);
        }
        let token = token.trim();
        if token.is_empty() {
            return Err(AuthError::MalformedToken);
        }
        return Ok(token);
    }

    match legacy_token.map(str::trim) {
        Some("") => Err(AuthError::MalformedToken),
        Some(token) => Ok(token),
        None => Err(AuthError::MissingToken),
    }
}
