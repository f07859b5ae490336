//! Prometheus metrics for the greeter service.
//!
//! - [`MetricsConfig`]: whether metrics are enabled and where they are served
//! - [`init_metrics`]: install the Prometheus recorder
//! - [`metrics_handler`]: axum handler rendering the exposition text
//! - [`record_greeting`]: business counter for `/your-name` outcomes
//!
//! # Example
//!
//! ```no_run
//! use axum::{routing::get, Router};
//! use greeter_service_shared::metrics::{init_metrics, metrics_handler, MetricsConfig};
//!
//! let config = MetricsConfig::default();
//! init_metrics(&config).expect("failed to initialize metrics");
//!
//! let app: Router = Router::new().route(&config.path, get(metrics_handler));
//! ```

use greeter_api::{HELLO_WORLD_PATH, YOUR_NAME_PATH};
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use once_cell::sync::OnceCell;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::health::HEALTH_LIVE_PATH;

/// Counter of `/your-name` outcomes, labelled by `outcome` and `service`.
pub const GREETINGS_TOTAL: &str = "greeter_greetings_total";

static PROMETHEUS_HANDLE: OnceCell<PrometheusHandle> = OnceCell::new();

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetricsConfig {
    pub enabled: bool,
    /// Path for the exposition endpoint.
    pub path: String,
}

impl Default for MetricsConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            path: "/metrics".to_string(),
        }
    }
}

impl MetricsConfig {
    /// Create configuration from environment variables.
    ///
    /// - `METRICS_ENABLED`: "false" disables metrics (default: enabled)
    /// - `METRICS_PATH`: endpoint path (default: "/metrics")
    ///
    /// A `METRICS_PATH` that is not absolute, contains route parameters or
    /// names an API route is ignored in favour of the default.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let enabled = lookup("METRICS_ENABLED")
            .map(|v| !v.trim().eq_ignore_ascii_case("false"))
            .unwrap_or(true);

        let path = match lookup("METRICS_PATH") {
            Some(path) if is_usable_path(&path) => path,
            Some(path) => {
                tracing::warn!(path = %path, "ignoring unusable METRICS_PATH");
                Self::default().path
            }
            None => Self::default().path,
        };

        Self { enabled, path }
    }
}

fn is_usable_path(path: &str) -> bool {
    const RESERVED: [&str; 3] = [HELLO_WORLD_PATH, YOUR_NAME_PATH, HEALTH_LIVE_PATH];

    path.starts_with('/')
        && !path.contains(|c| c == '{' || c == '}')
        && !RESERVED.contains(&path)
}

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum MetricsError {
    #[error("metrics are disabled")]
    Disabled,

    #[error("metrics recorder already initialized")]
    AlreadyInitialized,

    #[error("failed to install metrics recorder: {0}")]
    InstallFailed(String),
}

/// Install the Prometheus recorder.
///
/// Must run once at startup before any metric is recorded.
pub fn init_metrics(config: &MetricsConfig) -> Result<(), MetricsError> {
    if !config.enabled {
        return Err(MetricsError::Disabled);
    }

    if PROMETHEUS_HANDLE.get().is_some() {
        return Err(MetricsError::AlreadyInitialized);
    }

    let handle = PrometheusBuilder::new()
        .install_recorder()
        .map_err(|e| MetricsError::InstallFailed(e.to_string()))?;

    PROMETHEUS_HANDLE
        .set(handle)
        .map_err(|_| MetricsError::AlreadyInitialized)
}

/// `GET /metrics` in Prometheus exposition format.
pub async fn metrics_handler() -> String {
    PROMETHEUS_HANDLE
        .get()
        .map(|h| h.render())
        .unwrap_or_else(|| "# Metrics not initialized\n".to_string())
}

/// Count one `/your-name` outcome (`greeted`, `invalid_body`, `missing_name`).
pub fn record_greeting(outcome: &'static str, service: &str) {
    metrics::counter!(
        GREETINGS_TOTAL,
        "outcome" => outcome,
        "service" => service.to_string()
    )
    .increment(1);
}

/// Helpers for asserting on recorded metrics without a global recorder.
#[cfg(test)]
pub(crate) mod testing {
    use std::future::Future;

    use metrics_exporter_prometheus::PrometheusBuilder;

    /// Run `work` on a current-thread runtime with a thread-local Prometheus
    /// recorder and return the rendered exposition text.
    pub fn render_local<F: Future<Output = ()>>(work: F) -> String {
        let recorder = PrometheusBuilder::new().build_recorder();
        let handle = recorder.handle();
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .unwrap();

        metrics::with_local_recorder(&recorder, || runtime.block_on(work));

        handle.render()
    }

    /// Value of the sample named `name` carrying every label in `labels`.
    pub fn sample(rendered: &str, name: &str, labels: &[&str]) -> Option<f64> {
        rendered
            .lines()
            .filter(|line| line.starts_with(&format!("{}{{", name)))
            .find(|line| labels.iter().all(|label| line.contains(label)))
            .and_then(|line| line.rsplit(' ').next())
            .and_then(|value| value.parse().ok())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metrics_config_default() {
        let config = MetricsConfig::default();
        assert!(config.enabled);
        assert_eq!(config.path, "/metrics");
    }

    #[test]
    fn test_init_metrics_disabled() {
        let config = MetricsConfig {
            enabled: false,
            ..MetricsConfig::default()
        };
        assert_eq!(init_metrics(&config), Err(MetricsError::Disabled));
    }

    #[test]
    fn test_metrics_path_from_lookup() {
        let config = MetricsConfig::from_lookup(|key| match key {
            "METRICS_ENABLED" => Some("FALSE".to_string()),
            "METRICS_PATH" => Some("/internal/metrics".to_string()),
            _ => None,
        });
        assert!(!config.enabled);
        assert_eq!(config.path, "/internal/metrics");
    }

    #[test]
    fn test_metrics_path_rejects_api_routes() {
        for path in ["/hello-world", "/your-name", "/health/live", "metrics", "/{id}"] {
            let config = MetricsConfig::from_lookup(|key| {
                (key == "METRICS_PATH").then(|| path.to_string())
            });
            assert_eq!(config.path, "/metrics", "{}", path);
        }
    }

    #[tokio::test]
    async fn test_metrics_handler_without_recorder() {
        assert_eq!(metrics_handler().await, "# Metrics not initialized\n");
    }

    #[test]
    fn test_record_greeting_counts_by_outcome() {
        let rendered = testing::render_local(async {
            record_greeting("greeted", "greeter");
            record_greeting("greeted", "greeter");
            record_greeting("missing_name", "greeter");
        });

        assert_eq!(
            testing::sample(&rendered, GREETINGS_TOTAL, &[r#"outcome="greeted""#]),
            Some(2.0)
        );
        assert_eq!(
            testing::sample(&rendered, GREETINGS_TOTAL, &[r#"outcome="missing_name""#]),
            Some(1.0)
        );
        assert_eq!(
            testing::sample(&rendered, GREETINGS_TOTAL, &[r#"outcome="invalid_body""#]),
            None
        );
    }

    #[test]
    fn test_metrics_error_display() {
        assert_eq!(MetricsError::Disabled.to_string(), "metrics are disabled");
        assert_eq!(
            MetricsError::AlreadyInitialized.to_string(),
            "metrics recorder already initialized"
        );
        assert!(MetricsError::InstallFailed("boom".to_string())
            .to_string()
            .contains("boom"));
    }
}
