//! Role-dependent view of the caller's own account.

use std::collections::HashSet;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::instrument;
use utoipa::ToSchema;

use crate::auth::authorization::{DecisionTable, Operation};
use crate::auth::models::Session;
use crate::config::MembershipPolicy;
use crate::domain::{
    AnnotationView, PublicUser, Recruitment, Resume, Role, Team, TeamView, User,
};
use crate::errors::{Result, StaffdeskError};
use crate::services::annotation_service::resolve_views;
use crate::services::team_service::expand_teams;
use crate::storage::{
    AnnotationRepository, DbPool, RecruitmentRepository, ResumeRepository,
    SqlxAnnotationRepository, SqlxRecruitmentRepository, SqlxResumeRepository,
    SqlxTeamRepository, SqlxUserRepository, TeamRepository, UserRepository,
};

/// The caller's public projection plus what their role owns.
///
/// Sections that do not apply to the role are omitted from the JSON.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Profile {
    pub user: PublicUser,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub teams: Option<Vec<TeamView>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub annotations: Option<Vec<AnnotationView>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resumes: Option<Vec<Resume>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub recruitments: Option<Vec<Recruitment>>,
}

/// Repository handles the profile aggregates over
#[derive(Clone)]
pub struct ProfileSources {
    pub users: Arc<dyn UserRepository>,
    pub teams: Arc<dyn TeamRepository>,
    pub resumes: Arc<dyn ResumeRepository>,
    pub recruitments: Arc<dyn RecruitmentRepository>,
    pub annotations: Arc<dyn AnnotationRepository>,
}

impl ProfileSources {
    pub fn sqlx(pool: DbPool) -> Self {
        Self {
            users: Arc::new(SqlxUserRepository::new(pool.clone())),
            teams: Arc::new(SqlxTeamRepository::new(pool.clone())),
            resumes: Arc::new(SqlxResumeRepository::new(pool.clone())),
            recruitments: Arc::new(SqlxRecruitmentRepository::new(pool.clone())),
            annotations: Arc::new(SqlxAnnotationRepository::new(pool)),
        }
    }
}

#[derive(Clone)]
pub struct ProfileService {
    sources: ProfileSources,
    decisions: DecisionTable,
    membership: MembershipPolicy,
}

impl ProfileService {
    pub fn new(
        sources: ProfileSources,
        decisions: DecisionTable,
        membership: MembershipPolicy,
    ) -> Self {
        Self { sources, decisions, membership }
    }

    pub fn with_sqlx(pool: DbPool, decisions: DecisionTable, membership: MembershipPolicy) -> Self {
        Self::new(ProfileSources::sqlx(pool), decisions, membership)
    }

    #[instrument(
        skip(self, session),
        fields(user_id = %session.user_id, role = %session.role),
        name = "get_own_profile"
    )]
    pub async fn get_own_profile(&self, session: &Session) -> Result<Profile> {
        self.decisions.authorize(session, Operation::GetOwnProfile)?;

        let user = self
            .sources
            .users
            .get_user(&session.user_id)
            .await?
            .ok_or_else(|| StaffdeskError::not_found("user", session.user_id.as_str()))?;

        let mut profile = Profile {
            user: PublicUser::from(user.clone()),
            teams: None,
            annotations: None,
            resumes: None,
            recruitments: None,
        };

        match user.role {
            Role::Lider => {
                profile.teams = Some(self.teams_of(&user).await?);
                let annotations =
                    self.sources.annotations.list_annotations_by_leader(&user.id).await?;
                profile.annotations =
                    Some(resolve_views(self.sources.users.as_ref(), annotations).await?);
            }
            Role::Funcionario => {
                profile.teams = Some(self.teams_of(&user).await?);
            }
            Role::Gerenciador => {
                profile.resumes = Some(self.sources.resumes.list_resumes_by_owner(&user.id).await?);
                profile.recruitments =
                    Some(self.sources.recruitments.list_recruitments_by_owner(&user.id).await?);
            }
        }

        Ok(profile)
    }

    /// Teams the user leads, belongs to, or references, without duplicates.
    async fn teams_of(&self, user: &User) -> Result<Vec<TeamView>> {
        let mut teams: Vec<Team> = self.sources.teams.list_teams_by_leader(&user.id).await?;
        teams.extend(self.sources.teams.list_teams_by_member(&user.id).await?);
        if !user.team_ids.is_empty() {
            teams.extend(self.sources.teams.get_teams(&user.team_ids).await?);
        }

        let mut seen = HashSet::new();
        teams.retain(|team| seen.insert(team.id.clone()));

        expand_teams(self.sources.users.as_ref(), self.membership, teams).await
    }
}
