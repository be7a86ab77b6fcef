//! User repository
//!
//! Accounts and the ordered team references they hold. Email uniqueness is enforced
//! by the `users.email` UNIQUE constraint; a violation surfaces as a conflict.

use crate::domain::{NewUser, Role, TeamId, User, UserId};
use crate::errors::{is_unique_violation, Result, StaffdeskError};
use crate::storage::repositories::{next_position, push_in_list};
use crate::storage::DbPool;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, QueryBuilder, Sqlite};
use std::collections::HashMap;
use std::str::FromStr;
use tracing::instrument;

#[derive(Debug, Clone, FromRow)]
struct UserRow {
    pub id: String,
    pub name: String,
    pub email: String,
    pub password_hash: String,
    pub role: String,
    pub points: Option<i64>,
    pub registered_by: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, FromRow)]
struct TeamRefRow {
    pub user_id: String,
    pub team_id: String,
}

#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Persist a new account together with its team references
    async fn create_user(&self, user: NewUser) -> Result<User>;

    /// Persist a new employee and append it to `team`'s member list in one transaction
    async fn create_team_member(&self, user: NewUser, team: &TeamId) -> Result<User>;

    async fn get_user(&self, id: &UserId) -> Result<Option<User>>;

    async fn get_user_by_email(&self, email: &str) -> Result<Option<User>>;

    /// Get a user with their password hash for authentication
    async fn get_user_with_password(&self, email: &str) -> Result<Option<(User, String)>>;

    /// Fetch every user in `ids` that exists; order is unspecified
    async fn get_users(&self, ids: &[UserId]) -> Result<Vec<User>>;

    async fn email_exists(&self, email: &str) -> Result<bool>;

    /// Atomically add `amount` to an employee's points.
    ///
    /// Returns the new total, or `None` when no employee row was updated because the
    /// id is unknown, the account is not an employee, or the total would overflow.
    async fn add_points(&self, id: &UserId, amount: i64) -> Result<Option<i64>>;
}

#[derive(Debug, Clone)]
pub struct SqlxUserRepository {
    pool: DbPool,
}

impl SqlxUserRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    fn row_to_user(row: UserRow, team_ids: Vec<TeamId>) -> Result<User> {
        let role = Role::from_str(&row.role).map_err(|e| {
            StaffdeskError::internal(format!("Stored user {} has {}", row.id, e))
        })?;

        Ok(User {
            id: UserId::from_string(row.id),
            name: row.name,
            email: row.email,
            role,
            points: row.points,
            team_ids,
            registered_by: row.registered_by.map(UserId::from_string),
            created_at: row.created_at,
        })
    }

    async fn load_team_refs(&self, user_ids: Vec<String>) -> Result<HashMap<String, Vec<TeamId>>> {
        let mut refs: HashMap<String, Vec<TeamId>> = HashMap::new();
        if user_ids.is_empty() {
            return Ok(refs);
        }

        let mut builder: QueryBuilder<'_, Sqlite> =
            QueryBuilder::new("SELECT user_id, team_id FROM user_team_refs WHERE user_id");
        push_in_list(&mut builder, user_ids);
        builder.push(" ORDER BY user_id, position");

        let rows = builder.build_query_as::<TeamRefRow>().fetch_all(&self.pool).await.map_err(
            |e| StaffdeskError::Database {
                source: e,
                context: "Failed to load user team references".to_string(),
            },
        )?;

        for row in rows {
            refs.entry(row.user_id).or_default().push(TeamId::from_string(row.team_id));
        }
        Ok(refs)
    }

    async fn hydrate(&self, rows: Vec<UserRow>) -> Result<Vec<User>> {
        let mut refs = self.load_team_refs(rows.iter().map(|r| r.id.clone()).collect()).await?;
        rows.into_iter()
            .map(|row| {
                let team_ids = refs.remove(&row.id).unwrap_or_default();
                Self::row_to_user(row, team_ids)
            })
            .collect()
    }

    async fn hydrate_one(&self, row: Option<UserRow>) -> Result<Option<User>> {
        match row {
            Some(row) => Ok(self.hydrate(vec![row]).await?.pop()),
            None => Ok(None),
        }
    }

    async fn insert_user(conn: &mut sqlx::SqliteConnection, user: &NewUser) -> Result<()> {
        let now = Utc::now();

        sqlx::query(
            "INSERT INTO users
                 (id, name, email, password_hash, role, points, registered_by, created_at)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8)",
        )
        .bind(&user.id)
        .bind(&user.name)
        .bind(&user.email)
        .bind(&user.password_hash)
        .bind(user.role.as_str())
        .bind(user.points)
        .bind(user.registered_by.as_ref())
        .bind(now)
        .execute(&mut *conn)
        .await
        .map_err(|e| {
            if is_unique_violation(&e) {
                StaffdeskError::conflict(
                    format!("Email '{}' is already registered", user.email),
                    "user",
                )
            } else {
                StaffdeskError::Database { source: e, context: "Failed to create user".to_string() }
            }
        })?;

        for (position, team_id) in user.team_ids.iter().enumerate() {
            sqlx::query(
                "INSERT INTO user_team_refs (user_id, team_id, position) VALUES ($1, $2, $3)",
            )
            .bind(&user.id)
            .bind(team_id)
            .bind(position as i64)
                .execute(&mut *conn)
                .await
                .map_err(|e| StaffdeskError::Database {
                    source: e,
                    context: format!("Failed to attach team {} to user", team_id),
                })?;
        }

        Ok(())
    }
}

const USER_COLUMNS: &str =
    "id, name, email, password_hash, role, points, registered_by, created_at";

#[async_trait]
impl UserRepository for SqlxUserRepository {
    #[instrument(
        skip(self, user),
        fields(user_id = %user.id, role = %user.role),
        name = "db_create_user"
    )]
    async fn create_user(&self, user: NewUser) -> Result<User> {
        let mut tx = self.pool.begin().await?;
        Self::insert_user(&mut tx, &user).await?;
        tx.commit().await?;

        self.get_user(&user.id)
            .await?
            .ok_or_else(|| StaffdeskError::internal("User not found after creation"))
    }

    #[instrument(
        skip(self, user),
        fields(user_id = %user.id, team_id = %team),
        name = "db_create_team_member"
    )]
    async fn create_team_member(&self, user: NewUser, team: &TeamId) -> Result<User> {
        let mut tx = self.pool.begin().await?;
        Self::insert_user(&mut tx, &user).await?;

        let position = next_position(&mut tx, "team_members", "team_id", team.as_str()).await?;
        sqlx::query("INSERT INTO team_members (team_id, user_id, position) VALUES ($1, $2, $3)")
            .bind(team)
            .bind(&user.id)
            .bind(position)
            .execute(&mut *tx)
            .await
            .map_err(|e| StaffdeskError::Database {
                source: e,
                context: format!("Failed to add user to team {}", team),
            })?;

        tx.commit().await?;

        self.get_user(&user.id)
            .await?
            .ok_or_else(|| StaffdeskError::internal("User not found after creation"))
    }

    #[instrument(skip(self), fields(user_id = %id), name = "db_get_user")]
    async fn get_user(&self, id: &UserId) -> Result<Option<User>> {
        let row = sqlx::query_as::<_, UserRow>(&format!(
            "SELECT {} FROM users WHERE id = $1",
            USER_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| StaffdeskError::Database {
            source: e,
            context: format!("Failed to fetch user {}", id),
        })?;

        self.hydrate_one(row).await
    }

    #[instrument(skip(self, email), name = "db_get_user_by_email")]
    async fn get_user_by_email(&self, email: &str) -> Result<Option<User>> {
        Ok(self.get_user_with_password(email).await?.map(|(user, _)| user))
    }

    #[instrument(skip(self, email), name = "db_get_user_with_password")]
    async fn get_user_with_password(&self, email: &str) -> Result<Option<(User, String)>> {
        let row = sqlx::query_as::<_, UserRow>(&format!(
            "SELECT {} FROM users WHERE email = $1",
            USER_COLUMNS
        ))
        .bind(User::normalize_email(email))
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| StaffdeskError::Database {
            source: e,
            context: "Failed to fetch user by email".to_string(),
        })?;

        let Some(row) = row else {
            return Ok(None);
        };
        let password_hash = row.password_hash.clone();
        Ok(self.hydrate_one(Some(row)).await?.map(|user| (user, password_hash)))
    }

    #[instrument(skip(self, ids), fields(count = ids.len()), name = "db_get_users")]
    async fn get_users(&self, ids: &[UserId]) -> Result<Vec<User>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let mut builder: QueryBuilder<'_, Sqlite> =
            QueryBuilder::new(format!("SELECT {} FROM users WHERE id", USER_COLUMNS));
        push_in_list(&mut builder, ids.iter().map(|id| id.to_string()));

        let rows = builder.build_query_as::<UserRow>().fetch_all(&self.pool).await.map_err(
            |e| StaffdeskError::Database {
                source: e,
                context: "Failed to fetch users by id".to_string(),
            },
        )?;

        self.hydrate(rows).await
    }

    #[instrument(skip(self, email), name = "db_email_exists")]
    async fn email_exists(&self, email: &str) -> Result<bool> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users WHERE email = $1")
            .bind(User::normalize_email(email))
            .fetch_one(&self.pool)
            .await
            .map_err(|e| StaffdeskError::Database {
                source: e,
                context: "Failed to check email".to_string(),
            })?;

        Ok(count > 0)
    }

    #[instrument(skip(self), fields(user_id = %id, amount), name = "db_add_points")]
    async fn add_points(&self, id: &UserId, amount: i64) -> Result<Option<i64>> {
        let total: Option<i64> = sqlx::query_scalar(
            "UPDATE users SET points = points + $1
             WHERE id = $2 AND role = 'Funcionario' AND points <= $3
             RETURNING points",
        )
        .bind(amount)
        .bind(id)
        .bind(i64::MAX.saturating_sub(amount))
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| StaffdeskError::Database {
            source: e,
            context: format!("Failed to add points to user {}", id),
        })?;

        Ok(total)
    }
}
