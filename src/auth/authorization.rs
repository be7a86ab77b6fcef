//! Role-based authorization.
//!
//! Every core operation is listed in [`Operation`]. A [`DecisionTable`] maps each one
//! to a [`Requirement`], and services call [`DecisionTable::authorize`] before they
//! validate input or touch the store. The decision depends only on the session role
//! and the table.
//!
//! ```rust
//! use staffdesk::auth::authorization::{DecisionTable, Operation};
//! use staffdesk::auth::Session;
//! use staffdesk::config::TeamCreationPolicy;
//! use staffdesk::domain::{Role, UserId};
//!
//! let table = DecisionTable::new(TeamCreationPolicy::Both);
//! let leader = Session::new(UserId::new(), "Lia", Role::Lider);
//!
//! assert!(table.authorize(&leader, Operation::AwardPoints).is_ok());
//! assert!(table.authorize(&leader, Operation::SubmitResume).is_err());
//! ```

use std::fmt;

use crate::auth::models::Session;
use crate::config::TeamCreationPolicy;
use crate::domain::Role;
use crate::errors::{AuthErrorType, Result, StaffdeskError};

const LEADERS: &[Role] = &[Role::Lider];
const MANAGERS: &[Role] = &[Role::Gerenciador];
const LEADERS_AND_MANAGERS: &[Role] = &[Role::Lider, Role::Gerenciador];

/// Core operations subject to authorization
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    RegisterSelf,
    Login,
    RegisterEmployee,
    AwardPoints,
    CreateTeam,
    ListTeams,
    SubmitResume,
    ListOwnResumes,
    CreateRecruitment,
    ListOwnRecruitments,
    CreateAnnotation,
    ListOwnAnnotations,
    GetOwnProfile,
}

impl Operation {
    pub const ALL: [Operation; 13] = [
        Operation::RegisterSelf,
        Operation::Login,
        Operation::RegisterEmployee,
        Operation::AwardPoints,
        Operation::CreateTeam,
        Operation::ListTeams,
        Operation::SubmitResume,
        Operation::ListOwnResumes,
        Operation::CreateRecruitment,
        Operation::ListOwnRecruitments,
        Operation::CreateAnnotation,
        Operation::ListOwnAnnotations,
        Operation::GetOwnProfile,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Operation::RegisterSelf => "register_self",
            Operation::Login => "login",
            Operation::RegisterEmployee => "register_employee",
            Operation::AwardPoints => "award_points",
            Operation::CreateTeam => "create_team",
            Operation::ListTeams => "list_teams",
            Operation::SubmitResume => "submit_resume",
            Operation::ListOwnResumes => "list_own_resumes",
            Operation::CreateRecruitment => "create_recruitment",
            Operation::ListOwnRecruitments => "list_own_recruitments",
            Operation::CreateAnnotation => "create_annotation",
            Operation::ListOwnAnnotations => "list_own_annotations",
            Operation::GetOwnProfile => "get_own_profile",
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What a caller needs to perform an operation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Requirement {
    /// No session needed
    Public,
    /// Any valid session
    Authenticated,
    /// A session whose role is one of these
    Roles(&'static [Role]),
}

impl Requirement {
    pub fn permits(&self, role: Role) -> bool {
        match self {
            Requirement::Public | Requirement::Authenticated => true,
            Requirement::Roles(roles) => roles.contains(&role),
        }
    }
}

/// Static mapping from operation to requirement
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DecisionTable {
    team_creators: &'static [Role],
}

impl Default for DecisionTable {
    fn default() -> Self {
        Self::new(TeamCreationPolicy::default())
    }
}

impl DecisionTable {
    pub fn new(team_creation: TeamCreationPolicy) -> Self {
        let team_creators = match team_creation {
            TeamCreationPolicy::LeaderSelf => LEADERS,
            TeamCreationPolicy::ManagerForLeader => MANAGERS,
            TeamCreationPolicy::Both => LEADERS_AND_MANAGERS,
        };
        Self { team_creators }
    }

    pub fn requirement(&self, operation: Operation) -> Requirement {
        match operation {
            Operation::RegisterSelf | Operation::Login => Requirement::Public,
            Operation::GetOwnProfile => Requirement::Authenticated,
            Operation::RegisterEmployee
            | Operation::SubmitResume
            | Operation::ListOwnResumes
            | Operation::CreateRecruitment
            | Operation::ListOwnRecruitments => Requirement::Roles(MANAGERS),
            Operation::AwardPoints
            | Operation::CreateAnnotation
            | Operation::ListOwnAnnotations => Requirement::Roles(LEADERS),
            Operation::ListTeams => Requirement::Roles(LEADERS_AND_MANAGERS),
            Operation::CreateTeam => Requirement::Roles(self.team_creators),
        }
    }

    /// Whether `role` may perform `operation`
    pub fn permits(&self, role: Role, operation: Operation) -> bool {
        self.requirement(operation).permits(role)
    }

    /// Fail with `Forbidden` unless the session's role may perform `operation`
    pub fn authorize(&self, session: &Session, operation: Operation) -> Result<()> {
        if self.permits(session.role, operation) {
            return Ok(());
        }

        tracing::warn!(
            user_id = %session.user_id,
            role = %session.role,
            operation = %operation,
            "authorization denied"
        );
        Err(StaffdeskError::forbidden(format!(
            "Role {} may not perform {}",
            session.role, operation
        )))
    }

    /// Authorize a caller that may not have a session at all
    pub fn authorize_optional(
        &self,
        session: Option<&Session>,
        operation: Operation,
    ) -> Result<()> {
        match (self.requirement(operation), session) {
            (Requirement::Public, _) => Ok(()),
            (_, Some(session)) => self.authorize(session, operation),
            (_, None) => Err(StaffdeskError::auth(
                format!("Authentication required for {}", operation),
                AuthErrorType::MissingToken,
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::UserId;
    use crate::errors::ErrorKind;
    use proptest::prelude::*;

    fn session(role: Role) -> Session {
        Session::new(UserId::new(), "Test", role)
    }

    #[test]
    fn manager_operations() {
        let table = DecisionTable::default();
        for op in [
            Operation::RegisterEmployee,
            Operation::SubmitResume,
            Operation::ListOwnResumes,
            Operation::CreateRecruitment,
            Operation::ListOwnRecruitments,
        ] {
            assert!(table.permits(Role::Gerenciador, op));
            assert!(!table.permits(Role::Lider, op));
            assert!(!table.permits(Role::Funcionario, op));
        }
    }

    #[test]
    fn leader_operations() {
        let table = DecisionTable::default();
        let leader_only =
            [Operation::AwardPoints, Operation::CreateAnnotation, Operation::ListOwnAnnotations];
        for op in leader_only {
            assert!(table.permits(Role::Lider, op));
            assert!(!table.permits(Role::Gerenciador, op));
            assert!(!table.permits(Role::Funcionario, op));
        }
    }

    #[test]
    fn team_creation_follows_policy() {
        let leader_only = DecisionTable::new(TeamCreationPolicy::LeaderSelf);
        assert!(leader_only.permits(Role::Lider, Operation::CreateTeam));
        assert!(!leader_only.permits(Role::Gerenciador, Operation::CreateTeam));

        let manager_only = DecisionTable::new(TeamCreationPolicy::ManagerForLeader);
        assert!(!manager_only.permits(Role::Lider, Operation::CreateTeam));
        assert!(manager_only.permits(Role::Gerenciador, Operation::CreateTeam));

        let both = DecisionTable::new(TeamCreationPolicy::Both);
        assert!(both.permits(Role::Lider, Operation::CreateTeam));
        assert!(both.permits(Role::Gerenciador, Operation::CreateTeam));
        assert!(!both.permits(Role::Funcionario, Operation::CreateTeam));
    }

    #[test]
    fn employees_can_only_read_their_profile() {
        let table = DecisionTable::default();
        let allowed: Vec<_> =
            Operation::ALL.into_iter().filter(|op| table.permits(Role::Funcionario, *op)).collect();
        assert_eq!(
            allowed,
            vec![Operation::RegisterSelf, Operation::Login, Operation::GetOwnProfile]
        );
    }

    #[test]
    fn denial_is_forbidden() {
        let err = DecisionTable::default()
            .authorize(&session(Role::Funcionario), Operation::ListTeams)
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Forbidden);
    }

    #[test]
    fn missing_session_is_unauthenticated() {
        let table = DecisionTable::default();
        assert!(table.authorize_optional(None, Operation::Login).is_ok());
        let err = table.authorize_optional(None, Operation::GetOwnProfile).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Unauthenticated);
    }

    fn any_role() -> impl Strategy<Value = Role> {
        prop::sample::select(Role::ALL.to_vec())
    }

    fn any_operation() -> impl Strategy<Value = Operation> {
        prop::sample::select(Operation::ALL.to_vec())
    }

    fn any_policy() -> impl Strategy<Value = TeamCreationPolicy> {
        prop::sample::select(vec![
            TeamCreationPolicy::LeaderSelf,
            TeamCreationPolicy::ManagerForLeader,
            TeamCreationPolicy::Both,
        ])
    }

    proptest! {
        #[test]
        fn decision_depends_only_on_role(
            role in any_role(),
            op in any_operation(),
            policy in any_policy(),
            name in "[a-zA-Z ]{0,16}",
        ) {
            let table = DecisionTable::new(policy);
            let first = table.authorize(&session(role), op).is_ok();
            let other = Session::new(UserId::new(), name, role);
            prop_assert_eq!(first, table.authorize(&other, op).is_ok());
            prop_assert_eq!(first, table.permits(role, op));
        }

        #[test]
        fn public_operations_allow_everyone(role in any_role(), policy in any_policy()) {
            let table = DecisionTable::new(policy);
            prop_assert!(table.permits(role, Operation::RegisterSelf));
            prop_assert!(table.permits(role, Operation::Login));
            prop_assert!(table.permits(role, Operation::GetOwnProfile));
        }
    }
}
