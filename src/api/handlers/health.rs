//! Health check endpoint

use axum::{extract::State, Json};
use chrono::Utc;
use sea_orm::DatabaseConnection;
use serde::Serialize;
use utoipa::ToSchema;

/// Health state
#[derive(Clone)]
pub struct HealthHandlerState {
    pub db: DatabaseConnection,
}

/// Service health
#[derive(Debug, Serialize, ToSchema)]
pub struct HealthResponse {
    /// `ok` when the service and its database are reachable
    pub status: String,
    /// Service version (from Cargo.toml)
    pub version: String,
    /// Current server time (ISO 8601)
    pub timestamp: String,
    /// `connected` or `disconnected`
    pub database: String,
}

/// Service health check
///
/// Pings the database and reports overall status. No authentication
/// required; intended for uptime monitoring.
#[utoipa::path(
    get,
    path = "/health",
    tag = "Health",
    responses(
        (status = 200, description = "Health report (status field reflects database reachability)", body = HealthResponse)
    )
)]
pub async fn health_check(State(state): State<HealthHandlerState>) -> Json<HealthResponse> {
    let database_ok = state.db.ping().await.is_ok();

    Json(HealthResponse {
        status: if database_ok { "ok" } else { "error" }.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        timestamp: Utc::now().to_rfc3339(),
        database: if database_ok {
            "connected"
        } else {
            "disconnected"
        }
        .to_string(),
    })
}
