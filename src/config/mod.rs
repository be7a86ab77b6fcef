//! # Configuration Management
//!
//! Loads [`AppConfig`] from environment variables. Call `dotenvy::dotenv()` first if
//! a `.env` file should be honoured.
//!
//! | Variable | Default |
//! |---|---|
//! | `STAFFDESK_HOST` / `STAFFDESK_PORT` (or `PORT`) | `0.0.0.0` / `3000` |
//! | `STAFFDESK_MAX_BODY_BYTES` | 6 MiB |
//! | `DATABASE_URL` | `sqlite://./data/staffdesk.db` |
//! | `STAFFDESK_DB_MAX_CONNECTIONS` | `10` |
//! | `STAFFDESK_DB_AUTO_MIGRATE` | `true` |
//! | `JWT_SECRET` | required |
//! | `STAFFDESK_TOKEN_TTL_SECONDS` | 7 days |
//! | `STAFFDESK_UPLOAD_DIR` | `uploads` |
//! | `STAFFDESK_UPLOAD_MAX_BYTES` | 5 MiB |
//! | `STAFFDESK_TEAM_CREATION` | `both` |
//! | `STAFFDESK_MEMBERSHIP` | `snapshot` |
//! | `STAFFDESK_REGISTRATION_TEAMS` | `optional` |
//! | `STAFFDESK_ANNOTATION_TARGET` | `employee-id` |
//! | `STAFFDESK_LOG_LEVEL` / `STAFFDESK_LOG_FORMAT` | `info` / `text` |
//! | `STAFFDESK_ENABLE_METRICS` / `STAFFDESK_METRICS_PORT` | `false` / `9090` |

pub mod settings;

pub use settings::{
    AnnotationTargetPolicy, AppConfig, AuthConfig, DatabaseConfig, MembershipPolicy,
    ObservabilityConfig, PolicyConfig, RegistrationTeamPolicy, ServerConfig, TeamCreationPolicy,
    UploadConfig,
};

use std::path::PathBuf;
use std::str::FromStr;

use crate::errors::{Result, StaffdeskError};

/// Top-level configuration alias used by `main`
pub type Config = AppConfig;

impl AppConfig {
    /// Create configuration from environment variables and validate it
    pub fn from_env() -> Result<Self> {
        let defaults = AppConfig::default();

        let server = ServerConfig {
            host: env_or("STAFFDESK_HOST", defaults.server.host),
            port: match std::env::var("STAFFDESK_PORT").or_else(|_| std::env::var("PORT")) {
                Ok(raw) => parse_value("STAFFDESK_PORT", &raw)?,
                Err(_) => defaults.server.port,
            },
            max_body_size: env_parse("STAFFDESK_MAX_BODY_BYTES", defaults.server.max_body_size)?,
            enable_cors: env_parse("STAFFDESK_ENABLE_CORS", defaults.server.enable_cors)?,
        };

        let database = DatabaseConfig {
            url: env_or("DATABASE_URL", defaults.database.url),
            max_connections: env_parse(
                "STAFFDESK_DB_MAX_CONNECTIONS",
                defaults.database.max_connections,
            )?,
            auto_migrate: env_parse("STAFFDESK_DB_AUTO_MIGRATE", defaults.database.auto_migrate)?,
            ..defaults.database
        };

        let auth = AuthConfig {
            jwt_secret: std::env::var("JWT_SECRET")
                .map_err(|_| StaffdeskError::config("JWT_SECRET must be set"))?,
            token_ttl_seconds: env_parse(
                "STAFFDESK_TOKEN_TTL_SECONDS",
                defaults.auth.token_ttl_seconds,
            )?,
        };

        let uploads = UploadConfig {
            root_dir: std::env::var("STAFFDESK_UPLOAD_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.uploads.root_dir),
            max_file_size: env_parse("STAFFDESK_UPLOAD_MAX_BYTES", defaults.uploads.max_file_size)?,
            allowed_extensions: defaults.uploads.allowed_extensions,
        };

        let policies = PolicyConfig {
            team_creation: env_parse("STAFFDESK_TEAM_CREATION", defaults.policies.team_creation)?,
            membership: env_parse("STAFFDESK_MEMBERSHIP", defaults.policies.membership)?,
            registration_teams: env_parse(
                "STAFFDESK_REGISTRATION_TEAMS",
                defaults.policies.registration_teams,
            )?,
            annotation_target: env_parse(
                "STAFFDESK_ANNOTATION_TARGET",
                defaults.policies.annotation_target,
            )?,
        };

        let observability = ObservabilityConfig {
            log_level: env_or("STAFFDESK_LOG_LEVEL", defaults.observability.log_level),
            json_logging: std::env::var("STAFFDESK_LOG_FORMAT")
                .map(|format| format.eq_ignore_ascii_case("json"))
                .unwrap_or(defaults.observability.json_logging),
            enable_metrics: env_parse(
                "STAFFDESK_ENABLE_METRICS",
                defaults.observability.enable_metrics,
            )?,
            metrics_port: env_parse(
                "STAFFDESK_METRICS_PORT",
                defaults.observability.metrics_port,
            )?,
            ..defaults.observability
        };

        let config = AppConfig { server, database, auth, uploads, policies, observability };
        config.validate()?;
        Ok(config)
    }
}

fn env_or(key: &str, default: String) -> String {
    std::env::var(key).unwrap_or(default)
}

fn env_parse<T>(key: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match std::env::var(key) {
        Ok(raw) => parse_value(key, &raw),
        Err(_) => Ok(default),
    }
}

fn parse_value<T>(key: &str, raw: &str) -> Result<T>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    raw.trim()
        .parse()
        .map_err(|e| StaffdeskError::config(format!("Invalid value for {}: {}", key, e)))
}
