//! Annotation repository

use crate::domain::{Annotation, AnnotationId, EmployeeRef, NewAnnotation, UserId};
use crate::errors::{Result, StaffdeskError};
use crate::storage::DbPool;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::FromRow;
use tracing::instrument;

#[derive(Debug, Clone, FromRow)]
struct AnnotationRow {
    pub id: String,
    pub employee_kind: String,
    pub employee_value: String,
    pub description: String,
    pub leader_id: String,
    pub created_at: DateTime<Utc>,
}

impl TryFrom<AnnotationRow> for Annotation {
    type Error = StaffdeskError;

    fn try_from(row: AnnotationRow) -> Result<Self> {
        let employee = EmployeeRef::from_parts(&row.employee_kind, row.employee_value)
            .ok_or_else(|| {
                StaffdeskError::internal(format!(
                    "Stored annotation {} has unknown target kind '{}'",
                    row.id, row.employee_kind
                ))
            })?;

        Ok(Annotation {
            id: AnnotationId::from_string(row.id),
            employee,
            description: row.description,
            leader: UserId::from_string(row.leader_id),
            created_at: row.created_at,
        })
    }
}

#[async_trait]
pub trait AnnotationRepository: Send + Sync {
    async fn create_annotation(&self, annotation: NewAnnotation) -> Result<Annotation>;

    async fn list_annotations_by_leader(&self, leader: &UserId) -> Result<Vec<Annotation>>;
}

#[derive(Debug, Clone)]
pub struct SqlxAnnotationRepository {
    pool: DbPool,
}

impl SqlxAnnotationRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AnnotationRepository for SqlxAnnotationRepository {
    #[instrument(
        skip(self, annotation),
        fields(annotation_id = %annotation.id, leader_id = %annotation.leader),
        name = "db_create_annotation"
    )]
    async fn create_annotation(&self, annotation: NewAnnotation) -> Result<Annotation> {
        let row = sqlx::query_as::<_, AnnotationRow>(
            "INSERT INTO annotations
                 (id, employee_kind, employee_value, description, leader_id, created_at)
             VALUES ($1, $2, $3, $4, $5, $6)
             RETURNING id, employee_kind, employee_value, description, leader_id, created_at",
        )
        .bind(&annotation.id)
        .bind(annotation.employee.kind_str())
        .bind(annotation.employee.value())
        .bind(&annotation.description)
        .bind(&annotation.leader)
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await
        .map_err(|e| StaffdeskError::Database {
            source: e,
            context: "Failed to create annotation".to_string(),
        })?;

        row.try_into()
    }

    #[instrument(skip(self), fields(leader_id = %leader), name = "db_list_annotations_by_leader")]
    async fn list_annotations_by_leader(&self, leader: &UserId) -> Result<Vec<Annotation>> {
        let rows = sqlx::query_as::<_, AnnotationRow>(
            "SELECT id, employee_kind, employee_value, description, leader_id, created_at
             FROM annotations WHERE leader_id = $1 ORDER BY created_at, id",
        )
        .bind(leader)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| StaffdeskError::Database {
            source: e,
            context: format!("Failed to list annotations for {}", leader),
        })?;

        rows.into_iter().map(Annotation::try_from).collect()
    }
}
