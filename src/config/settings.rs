//! # Configuration Settings
//!
//! Defines the configuration structure for the staffdesk service.

use crate::errors::{Result, StaffdeskError};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;
use validator::Validate;

/// Main application configuration
#[derive(Debug, Clone, Serialize, Deserialize, Validate, Default)]
pub struct AppConfig {
    #[validate(nested)]
    pub server: ServerConfig,

    #[validate(nested)]
    pub database: DatabaseConfig,

    #[validate(nested)]
    pub auth: AuthConfig,

    #[validate(nested)]
    pub uploads: UploadConfig,

    pub policies: PolicyConfig,

    #[validate(nested)]
    pub observability: ObservabilityConfig,
}

impl AppConfig {
    /// Validate the entire configuration
    pub fn validate(&self) -> Result<()> {
        Validate::validate(self).map_err(StaffdeskError::from)?;
        self.validate_custom()
    }

    /// Checks the validator derive cannot express
    fn validate_custom(&self) -> Result<()> {
        if !self.database.url.starts_with("sqlite:") {
            return Err(StaffdeskError::config("Database URL must start with 'sqlite:'"));
        }

        if self.auth.jwt_secret.len() < 32 {
            return Err(StaffdeskError::config("JWT secret must be at least 32 characters long"));
        }

        if self.server.max_body_size < self.uploads.max_file_size {
            return Err(StaffdeskError::config(
                "Server body limit must not be smaller than the upload size limit",
            ));
        }

        Ok(())
    }
}

/// HTTP server configuration
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct ServerConfig {
    #[validate(length(min = 1, message = "Host cannot be empty"))]
    pub host: String,

    #[validate(range(min = 1, max = 65535, message = "Port must be between 1 and 65535"))]
    pub port: u16,

    /// Maximum request body size in bytes (multipart uploads included)
    #[validate(range(min = 1024, message = "Max body size must be at least 1KB"))]
    pub max_body_size: usize,

    pub enable_cors: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 3000,
            // upload limit plus room for the multipart envelope and text fields
            max_body_size: 6 * 1024 * 1024,
            enable_cors: true,
        }
    }
}

impl ServerConfig {
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Database configuration
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct DatabaseConfig {
    #[validate(length(min = 1, message = "Database URL cannot be empty"))]
    pub url: String,

    #[validate(range(min = 1, max = 100, message = "Max connections must be between 1 and 100"))]
    pub max_connections: u32,

    #[validate(range(min = 0, max = 50, message = "Min connections must be between 0 and 50"))]
    pub min_connections: u32,

    #[validate(range(
        min = 1,
        max = 60,
        message = "Connect timeout must be between 1 and 60 seconds"
    ))]
    pub connect_timeout_seconds: u64,

    /// Idle timeout in seconds (0 = no timeout)
    pub idle_timeout_seconds: u64,

    /// Run embedded migrations when the pool is created
    pub auto_migrate: bool,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: "sqlite://./data/staffdesk.db".to_string(),
            max_connections: 10,
            min_connections: 0,
            connect_timeout_seconds: 10,
            idle_timeout_seconds: 600,
            auto_migrate: true,
        }
    }
}

impl DatabaseConfig {
    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_seconds)
    }

    pub fn idle_timeout(&self) -> Option<Duration> {
        if self.idle_timeout_seconds == 0 {
            None
        } else {
            Some(Duration::from_secs(self.idle_timeout_seconds))
        }
    }

    /// In-memory database with migrations, for tests and local experiments
    pub fn in_memory() -> Self {
        Self {
            url: "sqlite::memory:".to_string(),
            max_connections: 1,
            min_connections: 1,
            idle_timeout_seconds: 0,
            ..Default::default()
        }
    }
}

/// Session token configuration
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct AuthConfig {
    #[serde(skip_serializing)]
    pub jwt_secret: String,

    /// Session token lifetime in seconds
    #[validate(range(min = 60, message = "Token lifetime must be at least one minute"))]
    pub token_ttl_seconds: u64,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self { jwt_secret: String::new(), token_ttl_seconds: 7 * 24 * 60 * 60 }
    }
}

impl AuthConfig {
    pub fn token_ttl(&self) -> Duration {
        Duration::from_secs(self.token_ttl_seconds)
    }
}

/// Résumé upload configuration
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct UploadConfig {
    /// Directory the blob store writes into; served under `/uploads`
    pub root_dir: PathBuf,

    #[validate(range(min = 1, message = "Max file size must be positive"))]
    pub max_file_size: usize,

    /// Lowercase extensions without the dot
    #[validate(length(min = 1, message = "At least one extension must be allowed"))]
    pub allowed_extensions: Vec<String>,
}

impl Default for UploadConfig {
    fn default() -> Self {
        Self {
            root_dir: PathBuf::from("uploads"),
            max_file_size: 5 * 1024 * 1024,
            allowed_extensions: vec!["pdf".to_string()],
        }
    }
}

/// Who may create teams.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum TeamCreationPolicy {
    /// Leaders create teams they lead
    LeaderSelf,
    /// Managers create teams on behalf of a named leader
    ManagerForLeader,
    #[default]
    Both,
}

/// Whether team membership is re-checked when teams are read.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum MembershipPolicy {
    /// Members are whoever was valid at creation time
    #[default]
    Snapshot,
    /// Members whose role is no longer employee are hidden from listings
    Live,
}

/// Team references at self-registration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum RegistrationTeamPolicy {
    #[default]
    Optional,
    /// A leader must name at least one existing team when registering
    RequiredForLider,
}

/// Accepted forms of annotation target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum AnnotationTargetPolicy {
    /// Target must be the id of an existing employee
    #[default]
    EmployeeId,
    /// Any non-empty text is accepted and stored as a name
    FreeText,
}

/// Behavioral switches for rules that changed across schema revisions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct PolicyConfig {
    pub team_creation: TeamCreationPolicy,
    pub membership: MembershipPolicy,
    pub registration_teams: RegistrationTeamPolicy,
    pub annotation_target: AnnotationTargetPolicy,
}

macro_rules! policy_from_str {
    ($ty:ident { $($text:literal => $variant:ident),+ $(,)? }) => {
        impl FromStr for $ty {
            type Err = StaffdeskError;

            fn from_str(s: &str) -> Result<Self> {
                match s.trim().to_ascii_lowercase().as_str() {
                    $($text => Ok($ty::$variant),)+
                    other => Err(StaffdeskError::config(format!(
                        "Invalid {} value '{}'",
                        stringify!($ty),
                        other
                    ))),
                }
            }
        }
    };
}

policy_from_str!(TeamCreationPolicy {
    "leader-self" => LeaderSelf,
    "manager-for-leader" => ManagerForLeader,
    "both" => Both,
});
policy_from_str!(MembershipPolicy { "snapshot" => Snapshot, "live" => Live });
policy_from_str!(RegistrationTeamPolicy {
    "optional" => Optional,
    "required-for-lider" => RequiredForLider,
});
policy_from_str!(AnnotationTargetPolicy { "employee-id" => EmployeeId, "free-text" => FreeText });

/// Logging and metrics configuration
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct ObservabilityConfig {
    #[validate(length(min = 1, message = "Service name cannot be empty"))]
    pub service_name: String,

    /// Default filter directive when `RUST_LOG` is unset
    #[validate(length(min = 1, message = "Log level cannot be empty"))]
    pub log_level: String,

    /// Emit JSON lines instead of the human-readable format
    pub json_logging: bool,

    pub enable_metrics: bool,

    pub metrics_port: u16,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            service_name: "staffdesk".to_string(),
            log_level: "info".to_string(),
            json_logging: false,
            enable_metrics: false,
            metrics_port: 9090,
        }
    }
}
