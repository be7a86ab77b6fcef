//! Leader annotations about employees.

use std::collections::HashMap;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{info, instrument};
use utoipa::ToSchema;

use crate::auth::authorization::{DecisionTable, Operation};
use crate::auth::models::Session;
use crate::auth::validation::{parse_id, required_text};
use crate::config::AnnotationTargetPolicy;
use crate::domain::{
    Annotation, AnnotationId, AnnotationView, EmployeeRef, NewAnnotation, UserId,
};
use crate::errors::{Result, StaffdeskError};
use crate::observability::metrics;
use crate::storage::{
    AnnotationRepository, DbPool, SqlxAnnotationRepository, SqlxUserRepository, UserRepository,
};

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct CreateAnnotationRequest {
    /// Employee id, or a display name when free-text targets are enabled
    #[serde(alias = "funcionario", alias = "employeeId", alias = "employeeRef")]
    pub employee: String,

    #[serde(alias = "descricao")]
    pub description: String,
}

#[derive(Clone)]
pub struct AnnotationService {
    annotations: Arc<dyn AnnotationRepository>,
    users: Arc<dyn UserRepository>,
    decisions: DecisionTable,
    target_policy: AnnotationTargetPolicy,
}

impl AnnotationService {
    pub fn new(
        annotations: Arc<dyn AnnotationRepository>,
        users: Arc<dyn UserRepository>,
        decisions: DecisionTable,
        target_policy: AnnotationTargetPolicy,
    ) -> Self {
        Self { annotations, users, decisions, target_policy }
    }

    pub fn with_sqlx(
        pool: DbPool,
        decisions: DecisionTable,
        target_policy: AnnotationTargetPolicy,
    ) -> Self {
        Self::new(
            Arc::new(SqlxAnnotationRepository::new(pool.clone())),
            Arc::new(SqlxUserRepository::new(pool)),
            decisions,
            target_policy,
        )
    }

    #[instrument(
        skip(self, session, request),
        fields(leader_id = %session.user_id),
        name = "create_annotation"
    )]
    pub async fn create_annotation(
        &self,
        session: &Session,
        request: CreateAnnotationRequest,
    ) -> Result<AnnotationView> {
        self.decisions.authorize(session, Operation::CreateAnnotation)?;

        let target = required_text(&request.employee, "employee")?;
        let description = required_text(&request.description, "description")?;

        let (employee, employee_name) = match self.target_policy {
            AnnotationTargetPolicy::EmployeeId => {
                let id: UserId = parse_id(&target, "employee")?;
                let user = self
                    .users
                    .get_user(&id)
                    .await?
                    .ok_or_else(|| StaffdeskError::not_found("user", id.as_str()))?;
                if !user.is_employee() {
                    return Err(StaffdeskError::validation_field(
                        "Annotations can only target employees",
                        "employee",
                    ));
                }
                (EmployeeRef::Id(user.id), Some(user.name))
            }
            AnnotationTargetPolicy::FreeText => (EmployeeRef::Name(target.clone()), Some(target)),
        };

        let annotation = self
            .annotations
            .create_annotation(NewAnnotation {
                id: AnnotationId::new(),
                employee,
                description,
                leader: session.user_id.clone(),
            })
            .await?;

        metrics::record_operation(Operation::CreateAnnotation, "success");
        info!(annotation_id = %annotation.id, "annotation created");
        Ok(view(annotation, employee_name))
    }

    #[instrument(
        skip(self, session),
        fields(leader_id = %session.user_id),
        name = "list_own_annotations"
    )]
    pub async fn list_own_annotations(&self, session: &Session) -> Result<Vec<AnnotationView>> {
        self.decisions.authorize(session, Operation::ListOwnAnnotations)?;
        let annotations = self.annotations.list_annotations_by_leader(&session.user_id).await?;
        resolve_views(self.users.as_ref(), annotations).await
    }
}

/// Resolve id targets to the employee's current name with one lookup.
pub(crate) async fn resolve_views(
    users: &dyn UserRepository,
    annotations: Vec<Annotation>,
) -> Result<Vec<AnnotationView>> {
    let ids: Vec<UserId> = annotations
        .iter()
        .filter_map(|annotation| match &annotation.employee {
            EmployeeRef::Id(id) => Some(id.clone()),
            EmployeeRef::Name(_) => None,
        })
        .collect();

    let names: HashMap<UserId, String> = if ids.is_empty() {
        HashMap::new()
    } else {
        users.get_users(&ids).await?.into_iter().map(|user| (user.id, user.name)).collect()
    };

    Ok(annotations
        .into_iter()
        .map(|annotation| {
            let name = match &annotation.employee {
                EmployeeRef::Id(id) => names.get(id).cloned(),
                EmployeeRef::Name(name) => Some(name.clone()),
            };
            view(annotation, name)
        })
        .collect())
}

fn view(annotation: Annotation, employee_name: Option<String>) -> AnnotationView {
    let employee_id = match annotation.employee {
        EmployeeRef::Id(id) => Some(id),
        EmployeeRef::Name(_) => None,
    };
    AnnotationView {
        id: annotation.id,
        employee_id,
        employee_name,
        description: annotation.description,
        leader: annotation.leader,
        created_at: annotation.created_at,
    }
}
