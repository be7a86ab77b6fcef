//! Recruitment postings owned by managers.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{info, instrument};
use utoipa::ToSchema;

use crate::auth::authorization::{DecisionTable, Operation};
use crate::auth::models::Session;
use crate::auth::user::one_or_many;
use crate::auth::validation::{parse_id_list, required_text};
use crate::domain::{NewRecruitment, Recruitment, RecruitmentId, ResumeId};
use crate::errors::{Result, StaffdeskError};
use crate::observability::metrics;
use crate::storage::{
    DbPool, RecruitmentRepository, ResumeRepository, SqlxRecruitmentRepository,
    SqlxResumeRepository,
};

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct CreateRecruitmentRequest {
    #[serde(alias = "nome")]
    pub name: String,

    #[serde(alias = "descricao")]
    pub description: String,

    #[serde(default, alias = "curriculos", alias = "resumes", deserialize_with = "one_or_many")]
    pub resume_ids: Vec<String>,
}

#[derive(Clone)]
pub struct RecruitmentService {
    recruitments: Arc<dyn RecruitmentRepository>,
    resumes: Arc<dyn ResumeRepository>,
    decisions: DecisionTable,
}

impl RecruitmentService {
    pub fn new(
        recruitments: Arc<dyn RecruitmentRepository>,
        resumes: Arc<dyn ResumeRepository>,
        decisions: DecisionTable,
    ) -> Self {
        Self { recruitments, resumes, decisions }
    }

    pub fn with_sqlx(pool: DbPool, decisions: DecisionTable) -> Self {
        Self::new(
            Arc::new(SqlxRecruitmentRepository::new(pool.clone())),
            Arc::new(SqlxResumeRepository::new(pool)),
            decisions,
        )
    }

    #[instrument(
        skip(self, session, request),
        fields(manager_id = %session.user_id),
        name = "create_recruitment"
    )]
    pub async fn create_recruitment(
        &self,
        session: &Session,
        request: CreateRecruitmentRequest,
    ) -> Result<Recruitment> {
        self.decisions.authorize(session, Operation::CreateRecruitment)?;

        let name = required_text(&request.name, "name")?;
        let description = required_text(&request.description, "description")?;
        let resume_ids: Vec<ResumeId> = parse_id_list(&request.resume_ids, "resumeIds")?;

        let found = self.resumes.get_resumes(&resume_ids).await?;
        if let Some(missing) =
            resume_ids.iter().find(|id| !found.iter().any(|resume| &resume.id == *id))
        {
            return Err(StaffdeskError::validation_field(
                format!("Resume '{}' does not exist", missing),
                "resumeIds",
            ));
        }

        let recruitment = self
            .recruitments
            .create_recruitment(NewRecruitment {
                id: RecruitmentId::new(),
                name,
                description,
                resumes: resume_ids,
                owner: session.user_id.clone(),
            })
            .await?;

        metrics::record_operation(Operation::CreateRecruitment, "success");
        info!(
            recruitment_id = %recruitment.id,
            resumes = recruitment.resumes.len(),
            "recruitment created"
        );
        Ok(recruitment)
    }

    #[instrument(
        skip(self, session),
        fields(manager_id = %session.user_id),
        name = "list_own_recruitments"
    )]
    pub async fn list_own_recruitments(&self, session: &Session) -> Result<Vec<Recruitment>> {
        self.decisions.authorize(session, Operation::ListOwnRecruitments)?;
        self.recruitments.list_recruitments_by_owner(&session.user_id).await
    }
}
