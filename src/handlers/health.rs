use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use chrono::Utc;
use serde::Serialize;
use utoipa::ToSchema;

use crate::AppState;

/// Liveness report including a database ping.
#[derive(Debug, Serialize, ToSchema)]
pub struct HealthResponse {
    pub status: String,
    pub database: String,
    pub version: String,
    pub timestamp: String,
}

/// Basic health check: process is up and the database answers a ping.
#[utoipa::path(
    get,
    path = "/health",
    responses(
        (status = 200, description = "Service healthy", body = HealthResponse),
        (status = 503, description = "Database unreachable", body = HealthResponse)
    ),
    tag = "health"
)]
pub async fn health(State(state): State<AppState>) -> impl IntoResponse {
    let db_status = match state.db.ping().await {
        Ok(()) => "up",
        Err(e) => {
            tracing::error!(error = %e, "database ping failed");
            "down"
        }
    };

    let status = if db_status == "up" { "up" } else { "degraded" };
    let code = if db_status == "up" {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    let body = HealthResponse {
        status: status.to_string(),
        database: db_status.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        timestamp: Utc::now().to_rfc3339(),
    };
    (code, Json(body))
}
