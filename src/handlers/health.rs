//! Health check handler

use axum::Json;
use serde::Serialize;

/// Public health check response
#[derive(Debug, Serialize)]
pub struct HealthCheckResponse {
    /// Status indicator (always "ok")
    pub status: String,
}

/// GET /api/v1/health
///
/// Liveness check for load balancers. Does not touch the database.
pub async fn health_check() -> Json<HealthCheckResponse> {
    tracing::debug!("Health check requested");
    Json(HealthCheckResponse {
        status: "ok".to_string(),
    })
}
