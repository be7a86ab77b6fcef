//! HTTP request handlers organized by resource type

pub mod accounts;
pub mod annotations;
pub mod health;
pub mod points;
pub mod profile;
pub mod recruitments;
pub mod resumes;
pub mod teams;

pub use accounts::{login_handler, register_employee_handler, register_handler};
pub use annotations::{create_annotation_handler, list_annotations_handler};
pub use health::health_handler;
pub use points::award_points_handler;
pub use profile::get_profile_handler;
pub use recruitments::{create_recruitment_handler, list_recruitments_handler};
pub use resumes::{list_resumes_handler, submit_resume_handler};
pub use teams::{create_team_handler, list_teams_handler};
