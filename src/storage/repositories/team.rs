//! Team repository
//!
//! Teams, their ordered member snapshot, and the leader's team reference. Creation
//! writes all three in one transaction so a leader never references a team that was
//! not persisted.

use crate::domain::{NewTeam, Team, TeamId, UserId};
use crate::errors::{Result, StaffdeskError};
use crate::storage::repositories::{next_position, push_in_list};
use crate::storage::DbPool;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, QueryBuilder, Sqlite};
use std::collections::HashMap;
use tracing::instrument;

#[derive(Debug, Clone, FromRow)]
struct TeamRow {
    pub id: String,
    pub name: String,
    pub leader_id: String,
    pub creator_id: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, FromRow)]
struct MemberRow {
    pub team_id: String,
    pub user_id: String,
}

#[async_trait]
pub trait TeamRepository: Send + Sync {
    /// Persist the team, its members and the leader's team reference atomically
    async fn create_team(&self, team: NewTeam) -> Result<Team>;

    async fn get_team(&self, id: &TeamId) -> Result<Option<Team>>;

    /// Fetch every team in `ids` that exists; order is unspecified
    async fn get_teams(&self, ids: &[TeamId]) -> Result<Vec<Team>>;

    /// All teams, oldest first
    async fn list_teams(&self) -> Result<Vec<Team>>;

    async fn list_teams_by_leader(&self, leader: &UserId) -> Result<Vec<Team>>;

    /// Teams whose member snapshot contains `member`
    async fn list_teams_by_member(&self, member: &UserId) -> Result<Vec<Team>>;
}

#[derive(Debug, Clone)]
pub struct SqlxTeamRepository {
    pool: DbPool,
}

impl SqlxTeamRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    async fn load_members(&self, team_ids: Vec<String>) -> Result<HashMap<String, Vec<UserId>>> {
        let mut members: HashMap<String, Vec<UserId>> = HashMap::new();
        if team_ids.is_empty() {
            return Ok(members);
        }

        let mut builder: QueryBuilder<'_, Sqlite> =
            QueryBuilder::new("SELECT team_id, user_id FROM team_members WHERE team_id");
        push_in_list(&mut builder, team_ids);
        builder.push(" ORDER BY team_id, position");

        let rows = builder.build_query_as::<MemberRow>().fetch_all(&self.pool).await.map_err(
            |e| StaffdeskError::Database {
                source: e,
                context: "Failed to load team members".to_string(),
            },
        )?;

        for row in rows {
            members.entry(row.team_id).or_default().push(UserId::from_string(row.user_id));
        }
        Ok(members)
    }

    async fn hydrate(&self, rows: Vec<TeamRow>) -> Result<Vec<Team>> {
        let mut members = self.load_members(rows.iter().map(|r| r.id.clone()).collect()).await?;

        Ok(rows
            .into_iter()
            .map(|row| Team {
                members: members.remove(&row.id).unwrap_or_default(),
                id: TeamId::from_string(row.id),
                name: row.name,
                leader: UserId::from_string(row.leader_id),
                creator: row.creator_id.map(UserId::from_string),
                created_at: row.created_at,
            })
            .collect())
    }

    async fn fetch_rows(&self, sql: &str, bind: Option<&str>, context: &str) -> Result<Vec<Team>> {
        let mut query = sqlx::query_as::<_, TeamRow>(sql);
        if let Some(value) = bind {
            query = query.bind(value);
        }

        let rows = query.fetch_all(&self.pool).await.map_err(|e| StaffdeskError::Database {
            source: e,
            context: context.to_string(),
        })?;

        self.hydrate(rows).await
    }
}

#[async_trait]
impl TeamRepository for SqlxTeamRepository {
    #[instrument(
        skip(self, team),
        fields(team_id = %team.id, leader_id = %team.leader, members = team.members.len()),
        name = "db_create_team"
    )]
    async fn create_team(&self, team: NewTeam) -> Result<Team> {
        let now = Utc::now();
        let mut tx = self.pool.begin().await?;

        sqlx::query(
            "INSERT INTO teams (id, name, leader_id, creator_id, created_at)
             VALUES ($1, $2, $3, $4, $5)",
        )
        .bind(&team.id)
        .bind(&team.name)
        .bind(&team.leader)
        .bind(team.creator.as_ref())
        .bind(now)
        .execute(&mut *tx)
        .await
        .map_err(|e| StaffdeskError::Database {
            source: e,
            context: "Failed to create team".to_string(),
        })?;

        for (position, member) in team.members.iter().enumerate() {
            sqlx::query("INSERT INTO team_members (team_id, user_id, position) VALUES ($1, $2, $3)")
                .bind(&team.id)
                .bind(member)
                .bind(position as i64)
                .execute(&mut *tx)
                .await
                .map_err(|e| StaffdeskError::Database {
                    source: e,
                    context: format!("Failed to add member {} to team", member),
                })?;
        }

        let position =
            next_position(&mut tx, "user_team_refs", "user_id", team.leader.as_str()).await?;
        sqlx::query("INSERT INTO user_team_refs (user_id, team_id, position) VALUES ($1, $2, $3)")
            .bind(&team.leader)
            .bind(&team.id)
            .bind(position)
            .execute(&mut *tx)
            .await
            .map_err(|e| StaffdeskError::Database {
                source: e,
                context: "Failed to attach team to leader".to_string(),
            })?;

        tx.commit().await?;

        Ok(Team {
            id: team.id,
            name: team.name,
            members: team.members,
            leader: team.leader,
            creator: team.creator,
            created_at: now,
        })
    }

    #[instrument(skip(self), fields(team_id = %id), name = "db_get_team")]
    async fn get_team(&self, id: &TeamId) -> Result<Option<Team>> {
        let mut teams = self
            .fetch_rows(
                "SELECT id, name, leader_id, creator_id, created_at FROM teams WHERE id = $1",
                Some(id.as_str()),
                "Failed to fetch team",
            )
            .await?;

        Ok(teams.pop())
    }

    #[instrument(skip(self, ids), fields(count = ids.len()), name = "db_get_teams")]
    async fn get_teams(&self, ids: &[TeamId]) -> Result<Vec<Team>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let mut builder: QueryBuilder<'_, Sqlite> = QueryBuilder::new(
            "SELECT id, name, leader_id, creator_id, created_at FROM teams WHERE id",
        );
        push_in_list(&mut builder, ids.iter().map(|id| id.to_string()));

        let rows = builder.build_query_as::<TeamRow>().fetch_all(&self.pool).await.map_err(
            |e| StaffdeskError::Database {
                source: e,
                context: "Failed to fetch teams by id".to_string(),
            },
        )?;

        self.hydrate(rows).await
    }

    #[instrument(skip(self), name = "db_list_teams")]
    async fn list_teams(&self) -> Result<Vec<Team>> {
        self.fetch_rows(
            "SELECT id, name, leader_id, creator_id, created_at FROM teams ORDER BY created_at, id",
            None,
            "Failed to list teams",
        )
        .await
    }

    #[instrument(skip(self), fields(leader_id = %leader), name = "db_list_teams_by_leader")]
    async fn list_teams_by_leader(&self, leader: &UserId) -> Result<Vec<Team>> {
        self.fetch_rows(
            "SELECT id, name, leader_id, creator_id, created_at FROM teams
             WHERE leader_id = $1 ORDER BY created_at, id",
            Some(leader.as_str()),
            "Failed to list teams by leader",
        )
        .await
    }

    #[instrument(skip(self), fields(user_id = %member), name = "db_list_teams_by_member")]
    async fn list_teams_by_member(&self, member: &UserId) -> Result<Vec<Team>> {
        self.fetch_rows(
            "SELECT t.id, t.name, t.leader_id, t.creator_id, t.created_at FROM teams t
             JOIN team_members m ON m.team_id = t.id
             WHERE m.user_id = $1 ORDER BY t.created_at, t.id",
            Some(member.as_str()),
            "Failed to list teams by member",
        )
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Role;
    use crate::storage::test_helpers::{seed_user, test_pool};

    #[tokio::test]
    async fn create_team_links_members_and_leader() {
        let pool = test_pool().await;
        let leader = seed_user(&pool, "lead@example.com", Role::Lider).await;
        let first = seed_user(&pool, "f1@example.com", Role::Funcionario).await;
        let second = seed_user(&pool, "f2@example.com", Role::Funcionario).await;
        let repo = SqlxTeamRepository::new(pool.clone());

        let team = repo
            .create_team(NewTeam {
                id: TeamId::new(),
                name: "Alpha".into(),
                members: vec![second.id.clone(), first.id.clone()],
                leader: leader.id.clone(),
                creator: None,
            })
            .await
            .unwrap();

        let stored = repo.get_team(&team.id).await.unwrap().unwrap();
        assert_eq!(stored.members, vec![second.id.clone(), first.id.clone()]);
        assert_eq!(repo.list_teams_by_leader(&leader.id).await.unwrap().len(), 1);
        assert_eq!(repo.list_teams_by_member(&first.id).await.unwrap()[0].id, team.id);

        let users = crate::storage::SqlxUserRepository::new(pool);
        let leader = crate::storage::UserRepository::get_user(&users, &leader.id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(leader.team_ids, vec![team.id]);
    }

    #[tokio::test]
    async fn failed_member_insert_rolls_back_team() {
        let pool = test_pool().await;
        let leader = seed_user(&pool, "lead@example.com", Role::Lider).await;
        let repo = SqlxTeamRepository::new(pool);

        // unknown member violates the foreign key
        let result = repo
            .create_team(NewTeam {
                id: TeamId::new(),
                name: "Ghost".into(),
                members: vec![UserId::new()],
                leader: leader.id.clone(),
                creator: None,
            })
            .await;

        assert!(result.is_err());
        assert!(repo.list_teams().await.unwrap().is_empty());
        assert!(repo.list_teams_by_leader(&leader.id).await.unwrap().is_empty());
    }
}
