//! Account roles.

use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};
use std::str::FromStr;
use thiserror::Error;
use utoipa::ToSchema;

/// Role of an account. Determines which operations a session may perform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
pub enum Role {
    /// Team leader: authors annotations, awards points, leads teams.
    Lider,
    /// Manager: onboards employees, manages résumés and recruitments.
    Gerenciador,
    /// Employee: the only role that holds points and team membership.
    Funcionario,
}

impl Role {
    pub const ALL: [Role; 3] = [Role::Lider, Role::Gerenciador, Role::Funcionario];

    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Lider => "Lider",
            Role::Gerenciador => "Gerenciador",
            Role::Funcionario => "Funcionario",
        }
    }

    /// Only employees carry a points balance.
    pub fn holds_points(&self) -> bool {
        matches!(self, Role::Funcionario)
    }
}

impl Display for Role {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Role {
    type Err = RoleParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Lider" => Ok(Role::Lider),
            "Gerenciador" => Ok(Role::Gerenciador),
            "Funcionario" => Ok(Role::Funcionario),
            other => Err(RoleParseError(other.to_string())),
        }
    }
}

/// Error returned when role parsing fails.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("invalid role: {0}")]
pub struct RoleParseError(pub String);
