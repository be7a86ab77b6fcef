//! Account provisioning and login.

use std::sync::{Arc, LazyLock};

use tracing::{info, instrument, warn};
use validator::Validate;

use crate::auth::authorization::{DecisionTable, Operation};
use crate::auth::hashing;
use crate::auth::jwt::TokenService;
use crate::auth::models::Session;
use crate::auth::user::{LoginRequest, LoginResponse, RegisterEmployeeRequest, RegisterRequest};
use crate::auth::validation::{parse_id, parse_id_list};
use crate::config::{PolicyConfig, RegistrationTeamPolicy};
use crate::domain::{NewUser, PublicUser, Role, TeamId, User};
use crate::errors::{AuthErrorType, Result, StaffdeskError};
use crate::observability::metrics;
use crate::storage::{
    DbPool, SqlxTeamRepository, SqlxUserRepository, TeamRepository, UserRepository,
};

/// Pre-computed dummy hash for timing-safe user enumeration prevention.
/// Unknown emails still run one Argon2 verification against this hash.
static DUMMY_HASH: LazyLock<String> = LazyLock::new(|| {
    hashing::hash_password("dummy_startup_value").unwrap_or_else(|_| {
        "$argon2id$v=19$m=19456,t=2,p=1$ZHVtbXlzYWx0$ZHVtbXloYXNoZHVtbXloYXNoZHVtbXloYXNoMTI".to_string()
    })
});

const INVALID_CREDENTIALS: &str = "Invalid email or password";

/// Registers accounts and issues session tokens.
#[derive(Clone)]
pub struct AccountService {
    users: Arc<dyn UserRepository>,
    teams: Arc<dyn TeamRepository>,
    tokens: Arc<TokenService>,
    decisions: DecisionTable,
    policies: PolicyConfig,
}

impl AccountService {
    pub fn new(
        users: Arc<dyn UserRepository>,
        teams: Arc<dyn TeamRepository>,
        tokens: Arc<TokenService>,
        policies: PolicyConfig,
    ) -> Self {
        let decisions = DecisionTable::new(policies.team_creation);
        Self { users, teams, tokens, decisions, policies }
    }

    pub fn with_sqlx(pool: DbPool, tokens: Arc<TokenService>, policies: PolicyConfig) -> Self {
        Self::new(
            Arc::new(SqlxUserRepository::new(pool.clone())),
            Arc::new(SqlxTeamRepository::new(pool)),
            tokens,
            policies,
        )
    }

    /// Public registration from a raw JSON body.
    ///
    /// The requested role is read first so an employee self-registration is refused
    /// whatever else the payload contains.
    #[instrument(skip(self, body), name = "register_self_json")]
    pub async fn register_self_json(&self, body: serde_json::Value) -> Result<PublicUser> {
        if let Some(role) = RegisterRequest::requested_role(&body) {
            reject_employee_self_registration(role)?;
        }

        let request: RegisterRequest = serde_json::from_value(body).map_err(|e| {
            StaffdeskError::validation(format!("Invalid registration payload: {}", e))
        })?;
        self.register_self(request).await
    }

    /// Public registration of a leader or manager account.
    #[instrument(skip(self, request), fields(role = %request.role), name = "register_self")]
    pub async fn register_self(&self, request: RegisterRequest) -> Result<PublicUser> {
        reject_employee_self_registration(request.role)?;
        request.validate()?;

        let team_ids = self.resolve_registration_teams(request.role, &request.team_refs).await?;
        self.ensure_email_available(&request.email).await?;

        let password_hash = hash_off_thread(request.password).await?;
        let new_user = NewUser::new(
            request.name.trim().to_string(),
            request.email,
            password_hash,
            request.role,
        )
        .with_teams(team_ids);

        let user = self.users.create_user(new_user).await?;
        metrics::record_operation(Operation::RegisterSelf, "success");
        info!(user_id = %user.id, role = %user.role, "account registered");
        Ok(user.into())
    }

    /// Manager onboarding of an employee, optionally straight into a team.
    #[instrument(
        skip(self, session, request),
        fields(manager_id = %session.user_id),
        name = "register_employee"
    )]
    pub async fn register_employee(
        &self,
        session: &Session,
        request: RegisterEmployeeRequest,
    ) -> Result<PublicUser> {
        self.decisions.authorize(session, Operation::RegisterEmployee)?;
        request.validate()?;

        let team = match request.team_ref.as_deref() {
            Some(raw) if !raw.trim().is_empty() => {
                let team_id: TeamId = parse_id(raw, "teamRef")?;
                if self.teams.get_team(&team_id).await?.is_none() {
                    return Err(StaffdeskError::validation_field(
                        format!("Team '{}' does not exist", team_id),
                        "teamRef",
                    ));
                }
                Some(team_id)
            }
            _ => None,
        };

        self.ensure_email_available(&request.email).await?;

        let password_hash = hash_off_thread(request.password).await?;
        let new_user = NewUser::new(
            request.name.trim().to_string(),
            request.email,
            password_hash,
            Role::Funcionario,
        )
        .registered_by(session.user_id.clone());

        let user = match team {
            Some(team_id) => {
                let new_user = new_user.with_teams(vec![team_id.clone()]);
                self.users.create_team_member(new_user, &team_id).await?
            }
            None => self.users.create_user(new_user).await?,
        };

        metrics::record_operation(Operation::RegisterEmployee, "success");
        info!(user_id = %user.id, "employee registered");
        Ok(user.into())
    }

    /// Verify credentials and issue a session token.
    #[instrument(skip(self, request), name = "login")]
    pub async fn login(&self, request: LoginRequest) -> Result<LoginResponse> {
        request.validate()?;

        let email = User::normalize_email(&request.email);

        let (user, password_hash) = match self.users.get_user_with_password(&email).await? {
            Some(found) => found,
            None => {
                // keep response time in line with a real verification
                if let Err(e) = verify_off_thread(request.password, DUMMY_HASH.clone()).await {
                    warn!(error = %e, "dummy hash verification failed unexpectedly");
                }
                metrics::record_authentication("invalid_credentials");
                return Err(StaffdeskError::auth(
                    INVALID_CREDENTIALS,
                    AuthErrorType::InvalidCredentials,
                ));
            }
        };

        if !verify_off_thread(request.password, password_hash).await? {
            warn!(user_id = %user.id, "login attempt with incorrect password");
            metrics::record_authentication("invalid_credentials");
            return Err(StaffdeskError::auth(
                INVALID_CREDENTIALS,
                AuthErrorType::InvalidCredentials,
            ));
        }

        let token = self.tokens.issue(&user)?;
        metrics::record_authentication("login");
        info!(user_id = %user.id, role = %user.role, "login succeeded");

        Ok(LoginResponse { token, expires_in: self.tokens.ttl().as_secs(), user: user.into() })
    }

    async fn ensure_email_available(&self, email: &str) -> Result<()> {
        if self.users.email_exists(email).await? {
            return Err(StaffdeskError::conflict(
                format!("Email '{}' is already registered", User::normalize_email(email)),
                "user",
            ));
        }
        Ok(())
    }

    async fn resolve_registration_teams(&self, role: Role, refs: &[String]) -> Result<Vec<TeamId>> {
        let refs: Vec<String> =
            refs.iter().filter(|value| !value.trim().is_empty()).cloned().collect();

        if refs.is_empty() {
            if role == Role::Lider
                && self.policies.registration_teams == RegistrationTeamPolicy::RequiredForLider
            {
                return Err(StaffdeskError::validation_field(
                    "A leader must reference at least one team",
                    "teamRefs",
                ));
            }
            return Ok(Vec::new());
        }

        if role != Role::Lider {
            return Err(StaffdeskError::validation_field(
                "Only leaders may reference teams at registration",
                "teamRefs",
            ));
        }

        let ids: Vec<TeamId> = parse_id_list(&refs, "teamRefs")?;
        let found = self.teams.get_teams(&ids).await?;
        if found.len() != ids.len() {
            return Err(StaffdeskError::validation_field(
                "Some team references do not match existing teams",
                "teamRefs",
            ));
        }
        Ok(ids)
    }
}

fn reject_employee_self_registration(role: Role) -> Result<()> {
    if role == Role::Funcionario {
        warn!("self-registration attempted with employee role");
        return Err(StaffdeskError::forbidden(
            "Employees are registered by a manager, not through self-registration",
        ));
    }
    Ok(())
}

async fn hash_off_thread(password: String) -> Result<String> {
    tokio::task::spawn_blocking(move || hashing::hash_password(&password))
        .await
        .map_err(|e| StaffdeskError::internal(format!("Password hashing task failed: {}", e)))?
}

async fn verify_off_thread(password: String, hash: String) -> Result<bool> {
    tokio::task::spawn_blocking(move || hashing::verify_password(&password, &hash))
        .await
        .map_err(|e| StaffdeskError::internal(format!("Password verification task failed: {}", e)))?
}
