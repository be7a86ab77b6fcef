use axum::Router;
use utoipa::{Modify, OpenApi};
use utoipa_swagger_ui::SwaggerUi;

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::api::handlers::health::health_handler,
        crate::api::handlers::accounts::register_handler,
        crate::api::handlers::accounts::login_handler,
        crate::api::handlers::accounts::register_employee_handler,
        crate::api::handlers::points::award_points_handler,
        crate::api::handlers::teams::create_team_handler,
        crate::api::handlers::teams::list_teams_handler,
        crate::api::handlers::resumes::submit_resume_handler,
        crate::api::handlers::resumes::list_resumes_handler,
        crate::api::handlers::recruitments::create_recruitment_handler,
        crate::api::handlers::recruitments::list_recruitments_handler,
        crate::api::handlers::annotations::create_annotation_handler,
        crate::api::handlers::annotations::list_annotations_handler,
        crate::api::handlers::profile::get_profile_handler,
    ),
    components(
        schemas(
            crate::api::error::ErrorBody,
            crate::auth::user::RegisterRequest,
            crate::auth::user::RegisterEmployeeRequest,
            crate::auth::user::LoginRequest,
            crate::auth::user::LoginResponse,
            crate::auth::models::Session,
            crate::domain::Role,
            crate::domain::PublicUser,
            crate::domain::UserSummary,
            crate::domain::Team,
            crate::domain::TeamView,
            crate::domain::Cpf,
            crate::domain::Resume,
            crate::domain::Recruitment,
            crate::domain::AnnotationView,
            crate::services::AwardPointsRequest,
            crate::services::PointsBalance,
            crate::services::CreateTeamRequest,
            crate::services::CreateRecruitmentRequest,
            crate::services::CreateAnnotationRequest,
            crate::services::Profile,
            crate::api::handlers::resumes::ResumeUploadForm,
            crate::observability::HealthReport,
            crate::observability::HealthCheck,
            crate::observability::HealthStatus,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Health", description = "Liveness"),
        (name = "Accounts", description = "Registration and login"),
        (name = "Points", description = "Employee points"),
        (name = "Teams", description = "Teams and membership"),
        (name = "Resumes", description = "Résumé uploads"),
        (name = "Recruitments", description = "Recruitment postings"),
        (name = "Annotations", description = "Leader notes about employees"),
        (name = "Profile", description = "The caller's own account"),
    ),
    info(
        title = "staffdesk API",
        description = "Role-scoped HR API for leaders, managers and employees."
    )
)]
pub struct ApiDoc;

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};

        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "bearer_auth",
            SecurityScheme::Http(
                HttpBuilder::new().scheme(HttpAuthScheme::Bearer).bearer_format("JWT").build(),
            ),
        );
    }
}

pub fn docs_router() -> Router {
    SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()).into()
}
