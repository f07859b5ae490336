//! Liveness check.

use axum::{http::StatusCode, response::IntoResponse, Json};
use serde::{Deserialize, Serialize};

/// Service name reported by the health endpoint.
pub const SERVICE_NAME: &str = "greeter";

pub const HEALTH_LIVE_PATH: &str = "/health/live";

/// Health status response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthStatus {
    /// "ok" while the process is serving.
    pub status: String,
    pub service: String,
    pub version: String,
}

impl HealthStatus {
    pub fn alive(service: &str, version: &str) -> Self {
        Self {
            status: "ok".to_string(),
            service: service.to_string(),
            version: version.to_string(),
        }
    }
}

/// `GET /health/live`.
///
/// The greeter holds no state, so being able to answer is the whole check.
///
/// ```text
/// GET /health/live
/// {"status":"ok","service":"greeter","version":"0.1.0"}
/// ```
pub async fn health_live() -> impl IntoResponse {
    let status = HealthStatus::alive(SERVICE_NAME, env!("CARGO_PKG_VERSION"));
    (StatusCode::OK, Json(status))
}
