//! User accounts and their public projections.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::{Role, TeamId, UserId};

/// Stored representation of a user account (without the password hash).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: UserId,
    pub name: String,
    pub email: String,
    pub role: Role,
    /// Present iff `role` is [`Role::Funcionario`]
    pub points: Option<i64>,
    /// Teams this account references, in the order they were attached
    pub team_ids: Vec<TeamId>,
    /// Manager that onboarded this account, for employees
    pub registered_by: Option<UserId>,
    pub created_at: DateTime<Utc>,
}

impl User {
    /// Normalize email to lowercase for consistent storage and comparison.
    pub fn normalize_email(email: &str) -> String {
        email.trim().to_lowercase()
    }

    pub fn is_employee(&self) -> bool {
        self.role == Role::Funcionario
    }
}

/// New user creation payload; the hash is computed before this is built.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub id: UserId,
    pub name: String,
    pub email: String,
    pub password_hash: String,
    pub role: Role,
    pub points: Option<i64>,
    pub team_ids: Vec<TeamId>,
    pub registered_by: Option<UserId>,
}

impl NewUser {
    /// Build a creation payload, deriving `points` from the role.
    pub fn new(name: String, email: String, password_hash: String, role: Role) -> Self {
        Self {
            id: UserId::new(),
            name,
            email: User::normalize_email(&email),
            password_hash,
            points: role.holds_points().then_some(0),
            role,
            team_ids: Vec::new(),
            registered_by: None,
        }
    }

    pub fn with_teams(mut self, team_ids: Vec<TeamId>) -> Self {
        self.team_ids = team_ids;
        self
    }

    pub fn registered_by(mut self, manager: UserId) -> Self {
        self.registered_by = Some(manager);
        self
    }
}

/// Public projection of an account. Never carries the password hash.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PublicUser {
    pub id: UserId,
    pub name: String,
    pub email: String,
    pub role: Role,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub points: Option<i64>,
    pub teams: Vec<TeamId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub registered_by: Option<UserId>,
    pub created_at: DateTime<Utc>,
}

impl From<User> for PublicUser {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            name: user.name,
            email: user.email,
            role: user.role,
            points: user.points,
            teams: user.team_ids,
            registered_by: user.registered_by,
            created_at: user.created_at,
        }
    }
}

/// Compact projection used when expanding references (team members, leaders).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserSummary {
    pub id: UserId,
    pub name: String,
    pub email: String,
    pub role: Role,
}

impl From<&User> for UserSummary {
    fn from(user: &User) -> Self {
        Self {
            id: user.id.clone(),
            name: user.name.clone(),
            email: user.email.clone(),
            role: user.role,
        }
    }
}
