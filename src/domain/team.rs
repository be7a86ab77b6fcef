//! Team domain models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::{TeamId, UserId, UserSummary};

/// A team: one leader and a snapshot of its employee members.
///
/// Members were all employees when the team was created. Whether that is re-checked
/// on read depends on the configured membership policy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Team {
    pub id: TeamId,
    pub name: String,
    /// Ordered, distinct
    pub members: Vec<UserId>,
    pub leader: UserId,
    /// Manager that created the team on the leader's behalf
    #[serde(skip_serializing_if = "Option::is_none")]
    pub creator: Option<UserId>,
    pub created_at: DateTime<Utc>,
}

impl Team {
    pub fn has_member(&self, user_id: &UserId) -> bool {
        self.members.iter().any(|member| member == user_id)
    }
}

/// New team creation payload.
#[derive(Debug, Clone)]
pub struct NewTeam {
    pub id: TeamId,
    pub name: String,
    pub members: Vec<UserId>,
    pub leader: UserId,
    pub creator: Option<UserId>,
}

/// Team with member and leader references expanded for listings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TeamView {
    pub id: TeamId,
    pub name: String,
    pub members: Vec<UserSummary>,
    /// `None` only if the leader record has since disappeared from the store
    pub leader: Option<UserSummary>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub creator: Option<UserId>,
    pub created_at: DateTime<Utc>,
}
