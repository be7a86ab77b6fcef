//! # Structured Logging
//!
//! Subscriber setup and the startup configuration log line.
//!
//! `RUST_LOG` wins over the configured level when set. JSON output is one object per
//! line with span fields flattened in, which is what log shippers expect.

use crate::config::{AppConfig, ObservabilityConfig};
use crate::errors::{Result, StaffdeskError};
use tracing_subscriber::EnvFilter;

/// Install the global subscriber.
///
/// Fails if a subscriber is already installed, which only happens when tests or an
/// embedding binary set one up first.
pub fn init_logging(config: &ObservabilityConfig) -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.log_level))
        .map_err(|e| {
            StaffdeskError::config_with_source(
                format!("Invalid log filter '{}'", config.log_level),
                Box::new(e),
            )
        })?;

    let builder = tracing_subscriber::fmt().with_env_filter(filter).with_target(true);

    let installed = if config.json_logging {
        builder.json().flatten_event(true).with_current_span(true).try_init()
    } else {
        builder.try_init()
    };

    installed.map_err(|e| {
        StaffdeskError::config_with_source("Failed to install tracing subscriber", e)
    })
}

/// Log configuration at startup. Secrets are never included.
pub fn log_config_info(config: &AppConfig) {
    tracing::info!(
        server_address = %config.server.bind_address(),
        database_url = %config.database.url,
        upload_dir = %config.uploads.root_dir.display(),
        token_ttl_seconds = config.auth.token_ttl_seconds,
        team_creation = ?config.policies.team_creation,
        membership = ?config.policies.membership,
        registration_teams = ?config.policies.registration_teams,
        annotation_target = ?config.policies.annotation_target,
        metrics_enabled = %config.observability.enable_metrics,
        "staffdesk configuration"
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_config_info() {
        let config = AppConfig::default();
        log_config_info(&config);
    }

    #[test]
    fn invalid_filter_is_a_config_error() {
        if std::env::var("RUST_LOG").is_ok() {
            return;
        }
        let config =
            ObservabilityConfig { log_level: "=[broken".to_string(), ..Default::default() };
        let err = init_logging(&config).unwrap_err();
        assert!(err.to_string().contains("=[broken"));
        assert!(std::error::Error::source(&err).is_some());
    }
}
