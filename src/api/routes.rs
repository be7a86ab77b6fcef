use std::time::Instant;

use axum::{
    extract::{DefaultBodyLimit, Request},
    middleware::{self, Next},
    response::Response,
    routing::{get, post},
    Router,
};
use tower_http::{cors::CorsLayer, services::ServeDir, trace::TraceLayer};

use crate::auth::middleware::{authenticate, authorize_operation, OperationGate};
use crate::auth::{DecisionTable, Operation, SessionResolver};
use crate::config::AppConfig;
use crate::observability::{metrics, HealthChecker};
use crate::services::AppServices;

use super::{
    docs,
    handlers::{
        award_points_handler, create_annotation_handler, create_recruitment_handler,
        create_team_handler, get_profile_handler, health_handler, list_annotations_handler,
        list_recruitments_handler, list_resumes_handler, list_teams_handler, login_handler,
        register_employee_handler, register_handler, submit_resume_handler,
    },
};

#[derive(Clone)]
pub struct ApiState {
    pub services: AppServices,
    pub health: HealthChecker,
    pub decisions: DecisionTable,
}

/// Assemble the full HTTP surface.
///
/// Routes under `secured` pass through [`authenticate`] and then through an
/// [`OperationGate`] for the operation they perform, so a caller whose role is not
/// permitted is refused before the body is read.
pub fn build_router(state: ApiState, resolver: SessionResolver, config: &AppConfig) -> Router {
    let auth_layer = middleware::from_fn_with_state(resolver, authenticate);
    let decisions = state.decisions;
    let operation_layer = |operation: Operation| {
        middleware::from_fn_with_state(
            OperationGate::new(decisions, operation),
            authorize_operation,
        )
    };

    let public = Router::new()
        .route("/health", get(health_handler))
        .route("/api/v1/auth/register", post(register_handler))
        .route("/api/v1/auth/login", post(login_handler));

    let secured = Router::new()
        .merge(
            Router::new()
                .route("/api/v1/employees", post(register_employee_handler))
                .route_layer(operation_layer(Operation::RegisterEmployee)),
        )
        .merge(
            Router::new()
                .route("/api/v1/points", post(award_points_handler))
                .route_layer(operation_layer(Operation::AwardPoints)),
        )
        .merge(
            Router::new()
                .route("/api/v1/teams", get(list_teams_handler))
                .route_layer(operation_layer(Operation::ListTeams)),
        )
        .merge(
            Router::new()
                .route("/api/v1/teams", post(create_team_handler))
                .route_layer(operation_layer(Operation::CreateTeam)),
        )
        .merge(
            Router::new()
                .route("/api/v1/resumes", get(list_resumes_handler))
                .route_layer(operation_layer(Operation::ListOwnResumes)),
        )
        .merge(
            Router::new()
                .route("/api/v1/resumes", post(submit_resume_handler))
                .route_layer(operation_layer(Operation::SubmitResume)),
        )
        .merge(
            Router::new()
                .route("/api/v1/recruitments", get(list_recruitments_handler))
                .route_layer(operation_layer(Operation::ListOwnRecruitments)),
        )
        .merge(
            Router::new()
                .route("/api/v1/recruitments", post(create_recruitment_handler))
                .route_layer(operation_layer(Operation::CreateRecruitment)),
        )
        .merge(
            Router::new()
                .route("/api/v1/annotations", get(list_annotations_handler))
                .route_layer(operation_layer(Operation::ListOwnAnnotations)),
        )
        .merge(
            Router::new()
                .route("/api/v1/annotations", post(create_annotation_handler))
                .route_layer(operation_layer(Operation::CreateAnnotation)),
        )
        .merge(
            Router::new()
                .route("/api/v1/profile", get(get_profile_handler))
                .route_layer(operation_layer(Operation::GetOwnProfile)),
        )
        .route_layer(auth_layer);

    let mut router = Router::new()
        .merge(public)
        .merge(secured)
        .with_state(state)
        .nest_service("/uploads", ServeDir::new(&config.uploads.root_dir))
        .merge(docs::docs_router())
        .layer(DefaultBodyLimit::max(config.server.max_body_size))
        .layer(middleware::from_fn(record_http_metrics))
        .layer(TraceLayer::new_for_http());

    if config.server.enable_cors {
        router = router.layer(CorsLayer::permissive());
    }

    router
}

async fn record_http_metrics(request: Request, next: Next) -> Response {
    let started = Instant::now();
    let method = request.method().to_string();
    // static files are bucketed so each upload does not become its own label
    let path = match request.uri().path() {
        p if p.starts_with("/uploads/") => "/uploads/*".to_string(),
        p if p.starts_with("/swagger-ui") => "/swagger-ui".to_string(),
        p => p.to_string(),
    };

    let response = next.run(request).await;
    metrics::record_http_request(
        &method,
        &path,
        response.status().as_u16(),
        started.elapsed().as_secs_f64(),
    );
    response
}
