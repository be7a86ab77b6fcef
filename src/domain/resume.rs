//! Résumé records and the CPF identifier they are keyed on.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};
use std::str::FromStr;
use thiserror::Error;
use utoipa::ToSchema;

use crate::domain::{ResumeId, UserId};

/// Brazilian taxpayer number: exactly 11 ASCII digits.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(try_from = "String", into = "String")]
#[schema(value_type = String, example = "12345678901")]
pub struct Cpf(String);

impl Cpf {
    pub const LEN: usize = 11;

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl FromStr for Cpf {
    type Err = CpfParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.len() == Self::LEN && s.bytes().all(|b| b.is_ascii_digit()) {
            Ok(Self(s.to_string()))
        } else {
            Err(CpfParseError(s.to_string()))
        }
    }
}

impl TryFrom<String> for Cpf {
    type Error = CpfParseError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Cpf> for String {
    fn from(cpf: Cpf) -> Self {
        cpf.0
    }
}

impl Display for Cpf {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("CPF must be exactly 11 digits, got '{0}'")]
pub struct CpfParseError(pub String);

/// Stored résumé. Owned by the manager that submitted it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Resume {
    pub id: ResumeId,
    pub name: String,
    pub email: String,
    pub cpf: Cpf,
    /// Blob store reference, servable under `/uploads`
    pub file: String,
    pub owner: UserId,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewResume {
    pub id: ResumeId,
    pub name: String,
    pub email: String,
    pub cpf: Cpf,
    pub file: String,
    pub owner: UserId,
}
