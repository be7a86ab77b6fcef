//! Team endpoints.

use axum::{extract::rejection::JsonRejection, extract::State, http::StatusCode, Extension, Json};
use tracing::instrument;

use crate::api::error::{ApiError, ErrorBody};
use crate::api::routes::ApiState;
use crate::auth::models::Session;
use crate::domain::{Team, TeamView};
use crate::services::CreateTeamRequest;

#[utoipa::path(
    post,
    path = "/api/v1/teams",
    request_body = CreateTeamRequest,
    responses(
        (status = 201, description = "Team created", body = Team),
        (status = 400, description = "Validation error", body = ErrorBody),
        (status = 403, description = "Role may not create teams", body = ErrorBody)
    ),
    security(("bearer_auth" = [])),
    tag = "Teams"
)]
#[instrument(skip(state, session, payload), fields(user_id = %session.user_id))]
pub async fn create_team_handler(
    State(state): State<ApiState>,
    Extension(session): Extension<Session>,
    payload: Result<Json<CreateTeamRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<Team>), ApiError> {
    let Json(request) = payload?;
    let team = state.services.teams.create_team(&session, request).await?;
    Ok((StatusCode::CREATED, Json(team)))
}

/// Managers get every team; leaders get the teams they lead
#[utoipa::path(
    get,
    path = "/api/v1/teams",
    responses(
        (status = 200, description = "Teams with expanded members", body = [TeamView]),
        (status = 403, description = "Employees may not list teams", body = ErrorBody),
        (status = 404, description = "Leader leads no team", body = ErrorBody)
    ),
    security(("bearer_auth" = [])),
    tag = "Teams"
)]
#[instrument(skip(state, session), fields(user_id = %session.user_id))]
pub async fn list_teams_handler(
    State(state): State<ApiState>,
    Extension(session): Extension<Session>,
) -> Result<Json<Vec<TeamView>>, ApiError> {
    let teams = state.services.teams.list_teams(&session).await?;
    Ok(Json(teams))
}
