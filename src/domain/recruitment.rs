//! Recruitment postings.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::{RecruitmentId, ResumeId, UserId};

/// A recruitment posting referencing the résumés under consideration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Recruitment {
    pub id: RecruitmentId,
    pub name: String,
    pub description: String,
    pub resumes: Vec<ResumeId>,
    pub owner: UserId,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewRecruitment {
    pub id: RecruitmentId,
    pub name: String,
    pub description: String,
    pub resumes: Vec<ResumeId>,
    pub owner: UserId,
}
