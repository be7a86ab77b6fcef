//! Résumé repository

use crate::domain::{Cpf, NewResume, Resume, ResumeId, UserId};
use crate::errors::{is_unique_violation, Result, StaffdeskError};
use crate::storage::repositories::push_in_list;
use crate::storage::DbPool;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, QueryBuilder, Sqlite};
use tracing::instrument;

#[derive(Debug, Clone, FromRow)]
struct ResumeRow {
    pub id: String,
    pub name: String,
    pub email: String,
    pub cpf: String,
    pub file: String,
    pub owner_id: String,
    pub created_at: DateTime<Utc>,
}

impl TryFrom<ResumeRow> for Resume {
    type Error = StaffdeskError;

    fn try_from(row: ResumeRow) -> Result<Self> {
        let cpf = row
            .cpf
            .parse::<Cpf>()
            .map_err(|e| StaffdeskError::internal(format!("Stored resume {}: {}", row.id, e)))?;

        Ok(Resume {
            id: ResumeId::from_string(row.id),
            name: row.name,
            email: row.email,
            cpf,
            file: row.file,
            owner: UserId::from_string(row.owner_id),
            created_at: row.created_at,
        })
    }
}

#[async_trait]
pub trait ResumeRepository: Send + Sync {
    /// Persist a résumé; a CPF already on file is a conflict
    async fn create_resume(&self, resume: NewResume) -> Result<Resume>;

    async fn cpf_exists(&self, cpf: &Cpf) -> Result<bool>;

    /// Fetch every résumé in `ids` that exists; order is unspecified
    async fn get_resumes(&self, ids: &[ResumeId]) -> Result<Vec<Resume>>;

    async fn list_resumes_by_owner(&self, owner: &UserId) -> Result<Vec<Resume>>;
}

#[derive(Debug, Clone)]
pub struct SqlxResumeRepository {
    pool: DbPool,
}

impl SqlxResumeRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ResumeRepository for SqlxResumeRepository {
    #[instrument(
        skip(self, resume),
        fields(resume_id = %resume.id, owner_id = %resume.owner),
        name = "db_create_resume"
    )]
    async fn create_resume(&self, resume: NewResume) -> Result<Resume> {
        let row = sqlx::query_as::<_, ResumeRow>(
            "INSERT INTO resumes (id, name, email, cpf, file, owner_id, created_at)
             VALUES ($1, $2, $3, $4, $5, $6, $7)
             RETURNING id, name, email, cpf, file, owner_id, created_at",
        )
        .bind(&resume.id)
        .bind(&resume.name)
        .bind(&resume.email)
        .bind(resume.cpf.as_str())
        .bind(&resume.file)
        .bind(&resume.owner)
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            if is_unique_violation(&e) {
                StaffdeskError::conflict("A resume with this CPF already exists", "resume")
            } else {
                StaffdeskError::Database {
                    source: e,
                    context: "Failed to create resume".to_string(),
                }
            }
        })?;

        row.try_into()
    }

    #[instrument(skip(self, cpf), name = "db_cpf_exists")]
    async fn cpf_exists(&self, cpf: &Cpf) -> Result<bool> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM resumes WHERE cpf = $1")
            .bind(cpf.as_str())
            .fetch_one(&self.pool)
            .await
            .map_err(|e| StaffdeskError::Database {
                source: e,
                context: "Failed to check CPF".to_string(),
            })?;

        Ok(count > 0)
    }

    #[instrument(skip(self, ids), fields(count = ids.len()), name = "db_get_resumes")]
    async fn get_resumes(&self, ids: &[ResumeId]) -> Result<Vec<Resume>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let mut builder: QueryBuilder<'_, Sqlite> = QueryBuilder::new(
            "SELECT id, name, email, cpf, file, owner_id, created_at FROM resumes WHERE id",
        );
        push_in_list(&mut builder, ids.iter().map(|id| id.to_string()));

        let rows = builder.build_query_as::<ResumeRow>().fetch_all(&self.pool).await.map_err(
            |e| StaffdeskError::Database {
                source: e,
                context: "Failed to fetch resumes by id".to_string(),
            },
        )?;

        rows.into_iter().map(Resume::try_from).collect()
    }

    #[instrument(skip(self), fields(owner_id = %owner), name = "db_list_resumes_by_owner")]
    async fn list_resumes_by_owner(&self, owner: &UserId) -> Result<Vec<Resume>> {
        let rows = sqlx::query_as::<_, ResumeRow>(
            "SELECT id, name, email, cpf, file, owner_id, created_at FROM resumes
             WHERE owner_id = $1 ORDER BY created_at, id",
        )
        .bind(owner)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| StaffdeskError::Database {
            source: e,
            context: format!("Failed to list resumes for {}", owner),
        })?;

        rows.into_iter().map(Resume::try_from).collect()
    }
}
