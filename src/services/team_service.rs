//! Team creation and listing.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{info, instrument};
use utoipa::ToSchema;

use crate::auth::authorization::{DecisionTable, Operation};
use crate::auth::models::Session;
use crate::auth::user::one_or_many;
use crate::auth::validation::{parse_id_list, required_text};
use crate::config::MembershipPolicy;
use crate::domain::{NewTeam, Role, Team, TeamId, TeamView, User, UserId, UserSummary};
use crate::errors::{Result, StaffdeskError};
use crate::observability::metrics;
use crate::storage::{
    DbPool, SqlxTeamRepository, SqlxUserRepository, TeamRepository, UserRepository,
};

/// Team creation payload.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct CreateTeamRequest {
    #[serde(alias = "nome")]
    pub name: String,

    #[serde(default, alias = "membros", alias = "members", deserialize_with = "one_or_many")]
    pub member_ids: Vec<String>,

    /// Required when a manager creates the team; ignored for leaders
    #[serde(default, alias = "lider", alias = "leader")]
    pub leader_email: Option<String>,
}

#[derive(Clone)]
pub struct TeamService {
    users: Arc<dyn UserRepository>,
    teams: Arc<dyn TeamRepository>,
    decisions: DecisionTable,
    membership: MembershipPolicy,
}

impl TeamService {
    pub fn new(
        users: Arc<dyn UserRepository>,
        teams: Arc<dyn TeamRepository>,
        decisions: DecisionTable,
        membership: MembershipPolicy,
    ) -> Self {
        Self { users, teams, decisions, membership }
    }

    pub fn with_sqlx(pool: DbPool, decisions: DecisionTable, membership: MembershipPolicy) -> Self {
        Self::new(
            Arc::new(SqlxUserRepository::new(pool.clone())),
            Arc::new(SqlxTeamRepository::new(pool)),
            decisions,
            membership,
        )
    }

    /// Create a team of existing employees.
    ///
    /// A leader becomes the team's leader. A manager names the leader by email and
    /// is recorded as creator. Nothing is written unless every member resolves.
    #[instrument(
        skip(self, session, request),
        fields(user_id = %session.user_id, role = %session.role),
        name = "create_team"
    )]
    pub async fn create_team(&self, session: &Session, request: CreateTeamRequest) -> Result<Team> {
        self.decisions.authorize(session, Operation::CreateTeam)?;

        let name = required_text(&request.name, "name")?;
        let member_ids: Vec<UserId> = parse_id_list(&request.member_ids, "memberIds")?;

        let (leader, creator) = match session.role {
            Role::Lider => {
                let leader = self
                    .users
                    .get_user(&session.user_id)
                    .await?
                    .ok_or_else(|| StaffdeskError::not_found("user", session.user_id.as_str()))?;
                (leader.id, None)
            }
            _ => {
                let leader = self.resolve_leader(request.leader_email.as_deref()).await?;
                (leader.id, Some(session.user_id.clone()))
            }
        };

        let members = self.users.get_users(&member_ids).await?;
        let employees: HashSet<&UserId> =
            members.iter().filter(|user| user.is_employee()).map(|user| &user.id).collect();
        if let Some(missing) = member_ids.iter().find(|id| !employees.contains(id)) {
            return Err(StaffdeskError::validation_field(
                format!("Member '{}' is not an existing employee", missing),
                "memberIds",
            ));
        }

        let team = self
            .teams
            .create_team(NewTeam { id: TeamId::new(), name, members: member_ids, leader, creator })
            .await?;

        metrics::record_operation(Operation::CreateTeam, "success");
        info!(
            team_id = %team.id,
            leader_id = %team.leader,
            members = team.members.len(),
            "team created"
        );
        Ok(team)
    }

    /// Managers see every team. Leaders see the teams they lead and get `NotFound`
    /// when they lead none.
    #[instrument(
        skip(self, session),
        fields(user_id = %session.user_id, role = %session.role),
        name = "list_teams"
    )]
    pub async fn list_teams(&self, session: &Session) -> Result<Vec<TeamView>> {
        self.decisions.authorize(session, Operation::ListTeams)?;

        let teams = match session.role {
            Role::Lider => {
                let teams = self.teams.list_teams_by_leader(&session.user_id).await?;
                if teams.is_empty() {
                    return Err(StaffdeskError::not_found("team", session.user_id.as_str()));
                }
                teams
            }
            _ => self.teams.list_teams().await?,
        };

        self.expand(teams).await
    }

    /// Expand member and leader references into summaries.
    pub async fn expand(&self, teams: Vec<Team>) -> Result<Vec<TeamView>> {
        expand_teams(self.users.as_ref(), self.membership, teams).await
    }

    async fn resolve_leader(&self, leader_email: Option<&str>) -> Result<User> {
        let email = required_text(leader_email.unwrap_or_default(), "leaderEmail")?;
        match self.users.get_user_by_email(&email).await? {
            Some(user) if user.role == Role::Lider => Ok(user),
            Some(_) => Err(StaffdeskError::validation_field(
                format!("'{}' is not a leader account", email),
                "leaderEmail",
            )),
            None => Err(StaffdeskError::validation_field(
                format!("No leader registered with email '{}'", email),
                "leaderEmail",
            )),
        }
    }
}

/// Build views for `teams` with one user lookup for all referenced accounts.
pub(crate) async fn expand_teams(
    users: &dyn UserRepository,
    membership: MembershipPolicy,
    teams: Vec<Team>,
) -> Result<Vec<TeamView>> {
    let mut ids: Vec<UserId> = Vec::new();
    let mut seen = HashSet::new();
    for team in &teams {
        for id in team.members.iter().chain(std::iter::once(&team.leader)) {
            if seen.insert(id.clone()) {
                ids.push(id.clone());
            }
        }
    }

    let lookup: HashMap<UserId, User> =
        users.get_users(&ids).await?.into_iter().map(|user| (user.id.clone(), user)).collect();

    Ok(teams
        .into_iter()
        .map(|team| {
            let members = team
                .members
                .iter()
                .filter_map(|id| lookup.get(id))
                .filter(|user| membership == MembershipPolicy::Snapshot || user.is_employee())
                .map(UserSummary::from)
                .collect();

            TeamView {
                leader: lookup.get(&team.leader).map(UserSummary::from),
                id: team.id,
                name: team.name,
                members,
                creator: team.creator,
                created_at: team.created_at,
            }
        })
        .collect())
}
