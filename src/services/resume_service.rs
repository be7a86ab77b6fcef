//! Résumé submission with file upload.

use std::sync::Arc;

use bytes::Bytes;
use tracing::{info, instrument, warn};

use crate::auth::authorization::{DecisionTable, Operation};
use crate::auth::models::Session;
use crate::auth::validation::{required_text, validate_email};
use crate::config::UploadConfig;
use crate::domain::{Cpf, NewResume, Resume, ResumeId, User};
use crate::errors::{Result, StaffdeskError};
use crate::observability::metrics;
use crate::storage::{
    BlobConstraints, BlobStore, DbPool, ResumeRepository, SqlxResumeRepository,
};

/// A file received from a multipart form.
#[derive(Debug, Clone)]
pub struct UploadedFile {
    pub file_name: String,
    pub content_type: Option<String>,
    pub contents: Bytes,
}

/// Résumé form fields. Every field is optional here so that missing ones are
/// reported as input errors after the role check.
#[derive(Debug, Clone, Default)]
pub struct ResumeSubmission {
    pub name: Option<String>,
    pub email: Option<String>,
    pub cpf: Option<String>,
    pub file: Option<UploadedFile>,
}

#[derive(Clone)]
pub struct ResumeService {
    resumes: Arc<dyn ResumeRepository>,
    blobs: Arc<dyn BlobStore>,
    decisions: DecisionTable,
    constraints: BlobConstraints,
}

impl ResumeService {
    pub fn new(
        resumes: Arc<dyn ResumeRepository>,
        blobs: Arc<dyn BlobStore>,
        decisions: DecisionTable,
        uploads: UploadConfig,
    ) -> Self {
        Self { resumes, blobs, decisions, constraints: BlobConstraints::from(&uploads) }
    }

    pub fn with_sqlx(
        pool: DbPool,
        blobs: Arc<dyn BlobStore>,
        decisions: DecisionTable,
        uploads: UploadConfig,
    ) -> Self {
        Self::new(Arc::new(SqlxResumeRepository::new(pool)), blobs, decisions, uploads)
    }

    /// Store the file, then the record. The file is removed again if the record
    /// cannot be written.
    #[instrument(
        skip(self, session, submission),
        fields(manager_id = %session.user_id),
        name = "submit_resume"
    )]
    pub async fn submit_resume(
        &self,
        session: &Session,
        submission: ResumeSubmission,
    ) -> Result<Resume> {
        self.decisions.authorize(session, Operation::SubmitResume)?;

        let name = required_text(submission.name.as_deref().unwrap_or_default(), "name")?;
        let email = required_text(submission.email.as_deref().unwrap_or_default(), "email")?;
        validate_email(&email).map_err(|_| {
            StaffdeskError::validation_field(format!("'{}' is not a valid email", email), "email")
        })?;
        let cpf: Cpf = submission
            .cpf
            .as_deref()
            .unwrap_or_default()
            .parse()
            .map_err(|e: crate::domain::CpfParseError| {
                StaffdeskError::validation_field(e.to_string(), "cpf")
            })?;
        let file = submission.file.ok_or_else(|| {
            StaffdeskError::validation_field("A résumé file is required", "file")
        })?;

        // fail fast so a rejected file never reaches the CPF lookup
        self.constraints.check(&file.file_name, file.contents.len())?;

        if self.resumes.cpf_exists(&cpf).await? {
            return Err(StaffdeskError::conflict(
                "A resume with this CPF already exists",
                "resume",
            ));
        }

        let key = self.blobs.put(&file.file_name, file.contents, &self.constraints).await?;

        let created = self
            .resumes
            .create_resume(NewResume {
                id: ResumeId::new(),
                name,
                email: User::normalize_email(&email),
                cpf,
                file: key.clone(),
                owner: session.user_id.clone(),
            })
            .await;

        match created {
            Ok(resume) => {
                metrics::record_operation(Operation::SubmitResume, "success");
                info!(resume_id = %resume.id, file = %resume.file, "resume submitted");
                Ok(resume)
            }
            Err(e) => {
                if let Err(cleanup) = self.blobs.remove(&key).await {
                    warn!(file = %key, error = %cleanup, "failed to remove orphaned resume file");
                }
                Err(e)
            }
        }
    }

    #[instrument(
        skip(self, session),
        fields(manager_id = %session.user_id),
        name = "list_own_resumes"
    )]
    pub async fn list_own_resumes(&self, session: &Session) -> Result<Vec<Resume>> {
        self.decisions.authorize(session, Operation::ListOwnResumes)?;
        self.resumes.list_resumes_by_owner(&session.user_id).await
    }
}
