//! Shared infrastructure for the greeter HTTP service.
//!
//! This crate provides the ambient pieces a long-running service needs on
//! top of the greeter router:
//!
//! - [`config`]: listen address configuration from the environment
//! - [`logging`]: structured JSON or text logging setup
//! - [`metrics`]: Prometheus recorder, `/metrics` handler, greeting counters
//! - [`middleware`]: request-id propagation and HTTP metrics
//! - [`health_live`]: liveness check handler

#![deny(warnings)]

pub mod config;
mod health;
pub mod logging;
pub mod metrics;
pub mod middleware;

pub use config::{ConfigError, ServiceConfig};
pub use health::{health_live, HealthStatus, HEALTH_LIVE_PATH, SERVICE_NAME};
pub use logging::{init_logging, LogFormat, LoggingConfig};
pub use self::metrics::{
    init_metrics, metrics_handler, record_greeting, MetricsConfig, MetricsError,
};
pub use middleware::{
    extract_or_generate_request_id, MetricsLayer, RequestId, REQUEST_ID_HEADER, UNMATCHED_ROUTE,
};
