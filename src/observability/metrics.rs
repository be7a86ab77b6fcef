//! # Metrics Collection
//!
//! Counters for authentication and core operation outcomes, exported through
//! Prometheus when enabled. Recording is a no-op until [`init_metrics`] has run.

use crate::auth::authorization::Operation;
use crate::config::ObservabilityConfig;
use crate::errors::{Result, StaffdeskError};
use ::tracing::info;
use metrics::{counter, describe_counter, gauge, histogram, Unit};
use metrics_exporter_prometheus::PrometheusBuilder;
use once_cell::sync::OnceCell;
use std::net::SocketAddr;

/// Metrics recorder that tracks application metrics
#[derive(Debug, Clone, Default)]
pub struct MetricsRecorder;

impl MetricsRecorder {
    pub fn new() -> Self {
        Self
    }

    /// Record an HTTP request
    pub fn record_http_request(&self, method: &str, path: &str, status: u16, duration: f64) {
        let labels = [
            ("method", method.to_string()),
            ("path", path.to_string()),
            ("status", status.to_string()),
        ];
        counter!("http_requests_total", &labels).increment(1);
        histogram!("http_request_duration_seconds").record(duration);
    }

    /// Record authentication attempt outcome
    pub fn record_authentication(&self, status: &str) {
        let labels = [("status", status.to_string())];
        counter!("auth_authentications_total", &labels).increment(1);
    }

    /// Record the outcome of a core operation
    pub fn record_operation(&self, operation: Operation, outcome: &str) {
        let labels =
            [("operation", operation.as_str().to_string()), ("outcome", outcome.to_string())];
        counter!("core_operations_total", &labels).increment(1);
    }

    /// Record points awarded to employees
    pub fn record_points_awarded(&self, amount: i64) {
        counter!("points_awarded_total").increment(amount.max(0) as u64);
    }

    /// Update database connection gauge
    pub fn update_db_connections(&self, active: u32) {
        gauge!("db_connections_active").set(active as f64);
    }

    fn register(&self) {
        describe_counter!(
            "auth_authentications_total",
            Unit::Count,
            "Authentication attempts by outcome"
        );
        describe_counter!("core_operations_total", Unit::Count, "Core operations by outcome");
        describe_counter!("points_awarded_total", Unit::Count, "Points awarded to employees");
        describe_counter!("http_requests_total", Unit::Count, "HTTP requests served");
    }
}

/// Global metrics recorder instance
static METRICS: OnceCell<MetricsRecorder> = OnceCell::new();

/// Initialize metrics collection and the Prometheus exporter
pub fn init_metrics(config: &ObservabilityConfig) -> Result<()> {
    if !config.enable_metrics {
        return Ok(());
    }

    let metrics_addr = format!("0.0.0.0:{}", config.metrics_port);
    let socket_addr: SocketAddr = metrics_addr.parse().map_err(|e| {
        StaffdeskError::config(format!("Invalid metrics bind address '{}': {}", metrics_addr, e))
    })?;

    PrometheusBuilder::new()
        .with_http_listener(socket_addr)
        .add_global_label("service", &config.service_name)
        .install()
        .map_err(|e| {
            StaffdeskError::config(format!("Failed to initialize metrics exporter: {}", e))
        })?;

    let recorder = METRICS.get_or_init(MetricsRecorder::new);
    recorder.register();

    info!(
        metrics_addr = %metrics_addr,
        service_name = %config.service_name,
        "Metrics collection initialized"
    );

    Ok(())
}

/// Get the global metrics recorder
pub fn get_metrics() -> Option<&'static MetricsRecorder> {
    METRICS.get()
}

/// Record an HTTP request using the global metrics recorder
pub fn record_http_request(method: &str, path: &str, status: u16, duration: f64) {
    if let Some(metrics) = get_metrics() {
        metrics.record_http_request(method, path, status, duration);
    }
}

/// Record authentication attempt outcome via the global recorder
pub fn record_authentication(status: &str) {
    if let Some(metrics) = get_metrics() {
        metrics.record_authentication(status);
    }
}

/// Record a core operation outcome via the global recorder
pub fn record_operation(operation: Operation, outcome: &str) {
    if let Some(metrics) = get_metrics() {
        metrics.record_operation(operation, outcome);
    }
}

/// Record awarded points via the global recorder
pub fn record_points_awarded(amount: i64) {
    if let Some(metrics) = get_metrics() {
        metrics.record_points_awarded(amount);
    }
}

/// Update the active connection gauge via the global recorder
pub fn update_db_connections(active: u32) {
    if let Some(metrics) = get_metrics() {
        metrics.update_db_connections(active);
    }
}
