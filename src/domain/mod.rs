//! Domain layer
//!
//! Entities and value types with no HTTP or storage dependencies beyond the sqlx
//! encodings of the id newtypes.
//!
//! ## Module Organization
//!
//! - `id`: Type-safe identifiers with NewType pattern
//! - `role`: Account roles
//! - `user`, `team`: accounts and team membership
//! - `resume`, `recruitment`: manager-owned hiring records
//! - `annotation`: leader-authored notes about employees

pub mod annotation;
pub mod id;
pub mod recruitment;
pub mod resume;
pub mod role;
pub mod team;
pub mod user;

pub use annotation::{Annotation, AnnotationView, EmployeeRef, NewAnnotation};
pub use id::{AnnotationId, RecruitmentId, ResumeId, TeamId, UserId};
pub use recruitment::{NewRecruitment, Recruitment};
pub use resume::{Cpf, CpfParseError, NewResume, Resume};
pub use role::{Role, RoleParseError};
pub use team::{NewTeam, Team, TeamView};
pub use user::{NewUser, PublicUser, User, UserSummary};
