//! Liveness and readiness probes

use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use chrono::Utc;
use serde::Serialize;
use tracing::warn;
use utoipa::ToSchema;

use crate::infrastructure::database::DatasetReader;
use crate::interfaces::http::common::ErrorBody;

#[derive(Clone)]
pub struct HealthState {
    pub reader: DatasetReader,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct HealthResponse {
    /// `healthy` or `unhealthy`
    pub status: String,
    pub timestamp: String,
    /// `connected` or `disconnected`
    pub database: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ReadyResponse {
    pub ready: bool,
    pub timestamp: String,
}

/// Always 200; the body reports database reachability
#[utoipa::path(
    get,
    path = "/health",
    tag = "Health",
    responses((status = 200, description = "Service health", body = HealthResponse))
)]
pub async fn health_check(State(state): State<HealthState>) -> Json<HealthResponse> {
    let (status, database) = match state.reader.ping().await {
        Ok(()) => ("healthy", "connected"),
        Err(e) => {
            warn!("Health check database ping failed: {}", e);
            ("unhealthy", "disconnected")
        }
    };

    Json(HealthResponse {
        status: status.to_string(),
        timestamp: Utc::now().to_rfc3339(),
        database: database.to_string(),
    })
}

#[utoipa::path(
    get,
    path = "/health/ready",
    tag = "Health",
    responses(
        (status = 200, description = "Ready to serve", body = ReadyResponse),
        (status = 503, description = "Database unreachable", body = ErrorBody)
    )
)]
pub async fn readiness_check(State(state): State<HealthState>) -> axum::response::Response {
    match state.reader.ping().await {
        Ok(()) => Json(ReadyResponse {
            ready: true,
            timestamp: Utc::now().to_rfc3339(),
        })
        .into_response(),
        Err(e) => {
            warn!("Readiness check failed: {}", e);
            ErrorBody::new(StatusCode::SERVICE_UNAVAILABLE, "Service not ready")
                .into_response_with(StatusCode::SERVICE_UNAVAILABLE)
        }
    }
}
