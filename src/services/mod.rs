//! Business logic services
//!
//! Each service authorizes the caller against the decision table, validates input,
//! and then talks to the repositories. HTTP concerns stay in `api`.

pub mod annotation_service;
pub mod points_service;
pub mod profile_service;
pub mod recruitment_service;
pub mod resume_service;
pub mod team_service;

pub use annotation_service::{AnnotationService, CreateAnnotationRequest};
pub use points_service::{AwardPointsRequest, PointsBalance, PointsService};
pub use profile_service::{Profile, ProfileService, ProfileSources};
pub use recruitment_service::{CreateRecruitmentRequest, RecruitmentService};
pub use resume_service::{ResumeService, ResumeSubmission, UploadedFile};
pub use team_service::{CreateTeamRequest, TeamService};

use std::sync::Arc;

use crate::auth::{AccountService, DecisionTable, TokenService};
use crate::config::{PolicyConfig, UploadConfig};
use crate::storage::{BlobStore, DbPool};

/// Every service the HTTP layer dispatches to.
#[derive(Clone)]
pub struct AppServices {
    pub accounts: AccountService,
    pub points: PointsService,
    pub teams: TeamService,
    pub resumes: ResumeService,
    pub recruitments: RecruitmentService,
    pub annotations: AnnotationService,
    pub profiles: ProfileService,
}

impl AppServices {
    /// Wire all services over one SQLite pool and blob store
    pub fn with_sqlx(
        pool: DbPool,
        tokens: Arc<TokenService>,
        blobs: Arc<dyn BlobStore>,
        uploads: UploadConfig,
        policies: PolicyConfig,
    ) -> Self {
        let decisions = DecisionTable::new(policies.team_creation);

        Self {
            accounts: AccountService::with_sqlx(pool.clone(), tokens, policies),
            points: PointsService::with_sqlx(pool.clone(), decisions),
            teams: TeamService::with_sqlx(pool.clone(), decisions, policies.membership),
            resumes: ResumeService::with_sqlx(pool.clone(), blobs, decisions, uploads),
            recruitments: RecruitmentService::with_sqlx(pool.clone(), decisions),
            annotations: AnnotationService::with_sqlx(
                pool.clone(),
                decisions,
                policies.annotation_target,
            ),
            profiles: ProfileService::with_sqlx(pool, decisions, policies.membership),
        }
    }
}
