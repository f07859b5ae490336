//! Greeter HTTP API served directly over TCP.
//!
//! The same router the Lambda adapter proxies to, plus the endpoints a
//! long-running process is expected to expose.
//!
//! # Endpoints
//!
//! - `GET /hello-world` - fixed greeting
//! - `POST /your-name` - echo the caller's name
//! - `GET /metrics` - Prometheus metrics endpoint (path configurable)
//! - `GET /health/live` - liveness check
//!
//! # Configuration
//!
//! - `RUST_LOG` - Log level (default: info)
//! - `LOG_FORMAT` - Log format: json (default) or text
//! - `SERVICE_HOST` - Bind address (default: 0.0.0.0)
//! - `SERVICE_PORT` - HTTP port (default: 8080)
//! - `METRICS_ENABLED` - "false" drops the metrics route
//! - `METRICS_PATH` - Metrics route path (default: /metrics)

#![deny(warnings)]

use axum::{routing::get, Router};
use greeter_service_shared::{health_live, metrics_handler, MetricsLayer};

pub use greeter_service_shared::HEALTH_LIVE_PATH;

/// Build the service router.
///
/// `metrics_path` mounts the Prometheus endpoint when set.
pub fn app(metrics_path: Option<&str>) -> Router {
    let mut app = greeter_api::router().route(HEALTH_LIVE_PATH, get(health_live));

    if let Some(path) = metrics_path {
        app = app.route(path, get(metrics_handler));
    }

    app.layer(MetricsLayer)
}
