//! Leader annotations about employees.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::{AnnotationId, UserId};

/// Who an annotation is about.
///
/// `Id` is a strong reference resolved to a display name at read time. `Name` is the
/// free-text form older clients send, stored verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(tag = "kind", content = "value", rename_all = "camelCase")]
pub enum EmployeeRef {
    Id(UserId),
    Name(String),
}

impl EmployeeRef {
    pub fn kind_str(&self) -> &'static str {
        match self {
            EmployeeRef::Id(_) => "id",
            EmployeeRef::Name(_) => "name",
        }
    }

    pub fn value(&self) -> &str {
        match self {
            EmployeeRef::Id(id) => id.as_str(),
            EmployeeRef::Name(name) => name,
        }
    }

    /// Rebuild from the stored `(kind, value)` pair.
    pub fn from_parts(kind: &str, value: String) -> Option<Self> {
        match kind {
            "id" => Some(EmployeeRef::Id(UserId::from_string(value))),
            "name" => Some(EmployeeRef::Name(value)),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Annotation {
    pub id: AnnotationId,
    pub employee: EmployeeRef,
    pub description: String,
    pub leader: UserId,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewAnnotation {
    pub id: AnnotationId,
    pub employee: EmployeeRef,
    pub description: String,
    pub leader: UserId,
}

/// Annotation with the employee's current display name resolved.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AnnotationView {
    pub id: AnnotationId,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub employee_id: Option<UserId>,
    /// `None` when an id target no longer resolves
    pub employee_name: Option<String>,
    pub description: String,
    pub leader: UserId,
    pub created_at: DateTime<Utc>,
}
