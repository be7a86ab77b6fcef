//! Account request and response DTOs.
//!
//! Field names are camelCase on the wire. The Portuguese names older clients send
//! (`nome`, `senha`, `tipo`, `equipe`) are accepted as aliases.

use serde::{Deserialize, Deserializer, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::auth::validation::{validate_email, validate_not_blank, validate_password};
use crate::domain::{PublicUser, Role};

/// Public self-registration payload.
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    #[serde(alias = "nome")]
    #[validate(custom(function = "validate_not_blank"))]
    pub name: String,

    #[validate(custom(function = "validate_email"))]
    pub email: String,

    #[serde(alias = "senha")]
    #[validate(custom(function = "validate_password"))]
    pub password: String,

    #[serde(alias = "tipo")]
    pub role: Role,

    /// Existing teams a leader attaches at registration
    #[serde(default, alias = "equipe", alias = "teams", deserialize_with = "one_or_many")]
    pub team_refs: Vec<String>,
}

impl RegisterRequest {
    /// Role named in a raw registration body under `role` or the legacy `tipo`
    pub fn requested_role(body: &serde_json::Value) -> Option<Role> {
        ["role", "tipo"]
            .iter()
            .filter_map(|key| body.get(*key))
            .find_map(|value| Role::deserialize(value).ok())
    }
}

/// Manager onboarding payload for a new employee.
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct RegisterEmployeeRequest {
    #[serde(alias = "nome")]
    #[validate(custom(function = "validate_not_blank"))]
    pub name: String,

    #[validate(custom(function = "validate_email"))]
    pub email: String,

    #[serde(alias = "senha")]
    #[validate(custom(function = "validate_password"))]
    pub password: String,

    /// Team the employee joins on creation
    #[serde(default, alias = "equipe", alias = "teamId")]
    pub team_ref: Option<String>,
}

/// User authentication credentials.
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    #[validate(length(min = 1, message = "Email is required"))]
    pub email: String,

    #[serde(alias = "senha")]
    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

/// Issued session token and the authenticated account.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    pub token: String,
    /// Token lifetime in seconds
    pub expires_in: u64,
    pub user: PublicUser,
}

/// Accept either a single string or a list of strings.
pub(crate) fn one_or_many<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum OneOrMany {
        One(String),
        Many(Vec<String>),
        Null(()),
    }

    Ok(match OneOrMany::deserialize(deserializer)? {
        OneOrMany::One(value) => vec![value],
        OneOrMany::Many(values) => values,
        OneOrMany::Null(()) => Vec::new(),
    })
}
