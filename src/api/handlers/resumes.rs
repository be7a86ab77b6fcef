//! Résumé upload and listing.
//!
//! Uploads are `multipart/form-data` with text fields `name`, `email`, `cpf` and one
//! file part. The Portuguese field names (`nome`, `curriculo`, `arquivo`) older
//! clients send are accepted as well.

use axum::{
    extract::{
        multipart::{Field, MultipartRejection},
        Multipart, State,
    },
    http::StatusCode,
    Extension, Json,
};
use tracing::instrument;

use crate::api::error::{ApiError, ErrorBody};
use crate::api::routes::ApiState;
use crate::auth::models::Session;
use crate::domain::Resume;
use crate::services::{ResumeSubmission, UploadedFile};

/// Upload form as documented in the OpenAPI schema.
#[derive(utoipa::ToSchema)]
#[allow(dead_code)]
pub struct ResumeUploadForm {
    name: String,
    email: String,
    #[schema(example = "12345678901")]
    cpf: String,
    #[schema(value_type = String, format = Binary)]
    file: Vec<u8>,
}

#[utoipa::path(
    post,
    path = "/api/v1/resumes",
    request_body(content = ResumeUploadForm, content_type = "multipart/form-data"),
    responses(
        (status = 201, description = "Resume stored", body = Resume),
        (status = 400, description = "Validation error", body = ErrorBody),
        (status = 403, description = "Managers only", body = ErrorBody),
        (status = 409, description = "CPF already on file", body = ErrorBody),
        (status = 413, description = "File exceeds the size limit", body = ErrorBody)
    ),
    security(("bearer_auth" = [])),
    tag = "Resumes"
)]
#[instrument(skip(state, session, multipart), fields(user_id = %session.user_id))]
pub async fn submit_resume_handler(
    State(state): State<ApiState>,
    Extension(session): Extension<Session>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<(StatusCode, Json<Resume>), ApiError> {
    let submission = read_submission(multipart?).await?;
    let resume = state.services.resumes.submit_resume(&session, submission).await?;
    Ok((StatusCode::CREATED, Json(resume)))
}

#[utoipa::path(
    get,
    path = "/api/v1/resumes",
    responses(
        (status = 200, description = "Resumes submitted by the caller", body = [Resume]),
        (status = 403, description = "Managers only", body = ErrorBody)
    ),
    security(("bearer_auth" = [])),
    tag = "Resumes"
)]
#[instrument(skip(state, session), fields(user_id = %session.user_id))]
pub async fn list_resumes_handler(
    State(state): State<ApiState>,
    Extension(session): Extension<Session>,
) -> Result<Json<Vec<Resume>>, ApiError> {
    let resumes = state.services.resumes.list_own_resumes(&session).await?;
    Ok(Json(resumes))
}

async fn read_submission(mut multipart: Multipart) -> Result<ResumeSubmission, ApiError> {
    let mut submission = ResumeSubmission::default();

    while let Some(field) = multipart.next_field().await? {
        let field_name = field.name().unwrap_or_default().to_string();

        if field.file_name().is_some() {
            if submission.file.is_none() {
                submission.file = Some(read_file(field).await?);
            }
            continue;
        }

        let slot = match field_name.as_str() {
            "name" | "nome" => &mut submission.name,
            "email" => &mut submission.email,
            "cpf" => &mut submission.cpf,
            _ => continue,
        };
        *slot = Some(field.text().await?);
    }

    Ok(submission)
}

async fn read_file(field: Field<'_>) -> Result<UploadedFile, ApiError> {
    let file_name = field.file_name().unwrap_or_default().to_string();
    let content_type = field.content_type().map(str::to_string);
    let contents = field.bytes().await?;
    Ok(UploadedFile { file_name, content_type, contents })
}
