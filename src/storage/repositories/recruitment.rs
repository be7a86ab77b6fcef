//! Recruitment repository

use crate::domain::{NewRecruitment, Recruitment, RecruitmentId, ResumeId, UserId};
use crate::errors::{Result, StaffdeskError};
use crate::storage::repositories::push_in_list;
use crate::storage::DbPool;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, QueryBuilder, Sqlite};
use std::collections::HashMap;
use tracing::instrument;

#[derive(Debug, Clone, FromRow)]
struct RecruitmentRow {
    pub id: String,
    pub name: String,
    pub description: String,
    pub owner_id: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, FromRow)]
struct RecruitmentResumeRow {
    pub recruitment_id: String,
    pub resume_id: String,
}

#[async_trait]
pub trait RecruitmentRepository: Send + Sync {
    /// Persist a recruitment and its ordered résumé list in one transaction
    async fn create_recruitment(&self, recruitment: NewRecruitment) -> Result<Recruitment>;

    async fn list_recruitments_by_owner(&self, owner: &UserId) -> Result<Vec<Recruitment>>;
}

#[derive(Debug, Clone)]
pub struct SqlxRecruitmentRepository {
    pool: DbPool,
}

impl SqlxRecruitmentRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    async fn load_resume_ids(&self, ids: Vec<String>) -> Result<HashMap<String, Vec<ResumeId>>> {
        let mut resumes: HashMap<String, Vec<ResumeId>> = HashMap::new();
        if ids.is_empty() {
            return Ok(resumes);
        }

        let mut builder: QueryBuilder<'_, Sqlite> = QueryBuilder::new(
            "SELECT recruitment_id, resume_id FROM recruitment_resumes WHERE recruitment_id",
        );
        push_in_list(&mut builder, ids);
        builder.push(" ORDER BY recruitment_id, position");

        let rows = builder
            .build_query_as::<RecruitmentResumeRow>()
            .fetch_all(&self.pool)
            .await
            .map_err(|e| StaffdeskError::Database {
                source: e,
                context: "Failed to load recruitment resumes".to_string(),
            })?;

        for row in rows {
            resumes
                .entry(row.recruitment_id)
                .or_default()
                .push(ResumeId::from_string(row.resume_id));
        }
        Ok(resumes)
    }
}

#[async_trait]
impl RecruitmentRepository for SqlxRecruitmentRepository {
    #[instrument(
        skip(self, recruitment),
        fields(recruitment_id = %recruitment.id, resumes = recruitment.resumes.len()),
        name = "db_create_recruitment"
    )]
    async fn create_recruitment(&self, recruitment: NewRecruitment) -> Result<Recruitment> {
        let now = Utc::now();
        let mut tx = self.pool.begin().await?;

        sqlx::query(
            "INSERT INTO recruitments (id, name, description, owner_id, created_at)
             VALUES ($1, $2, $3, $4, $5)",
        )
        .bind(&recruitment.id)
        .bind(&recruitment.name)
        .bind(&recruitment.description)
        .bind(&recruitment.owner)
        .bind(now)
        .execute(&mut *tx)
        .await
        .map_err(|e| StaffdeskError::Database {
            source: e,
            context: "Failed to create recruitment".to_string(),
        })?;

        for (position, resume) in recruitment.resumes.iter().enumerate() {
            sqlx::query(
                "INSERT INTO recruitment_resumes (recruitment_id, resume_id, position)
                 VALUES ($1, $2, $3)",
            )
            .bind(&recruitment.id)
            .bind(resume)
            .bind(position as i64)
            .execute(&mut *tx)
            .await
            .map_err(|e| StaffdeskError::Database {
                source: e,
                context: format!("Failed to attach resume {}", resume),
            })?;
        }

        tx.commit().await?;

        Ok(Recruitment {
            id: recruitment.id,
            name: recruitment.name,
            description: recruitment.description,
            resumes: recruitment.resumes,
            owner: recruitment.owner,
            created_at: now,
        })
    }

    #[instrument(skip(self), fields(owner_id = %owner), name = "db_list_recruitments_by_owner")]
    async fn list_recruitments_by_owner(&self, owner: &UserId) -> Result<Vec<Recruitment>> {
        let rows = sqlx::query_as::<_, RecruitmentRow>(
            "SELECT id, name, description, owner_id, created_at FROM recruitments
             WHERE owner_id = $1 ORDER BY created_at, id",
        )
        .bind(owner)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| StaffdeskError::Database {
            source: e,
            context: format!("Failed to list recruitments for {}", owner),
        })?;

        let mut resumes = self.load_resume_ids(rows.iter().map(|r| r.id.clone()).collect()).await?;

        Ok(rows
            .into_iter()
            .map(|row| Recruitment {
                resumes: resumes.remove(&row.id).unwrap_or_default(),
                id: RecruitmentId::from_string(row.id),
                name: row.name,
                description: row.description,
                owner: UserId::from_string(row.owner_id),
                created_at: row.created_at,
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Role;
    use crate::storage::test_helpers::{seed_user, test_pool};

    #[tokio::test]
    async fn unknown_resume_rolls_back_recruitment() {
        let pool = test_pool().await;
        let manager = seed_user(&pool, "g@example.com", Role::Gerenciador).await;
        let repo = SqlxRecruitmentRepository::new(pool);

        let result = repo
            .create_recruitment(NewRecruitment {
                id: RecruitmentId::new(),
                name: "Backend".into(),
                description: "Rust".into(),
                resumes: vec![ResumeId::new()],
                owner: manager.id.clone(),
            })
            .await;

        assert!(result.is_err());
        assert!(repo.list_recruitments_by_owner(&manager.id).await.unwrap().is_empty());
    }
}
