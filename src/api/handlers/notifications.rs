//! Maintenance notifications handler
//!
//! Thin wrapper over the alerting core: read the active maintenance
//! records, classify them against the current instant, return the derived
//! notifications. Nothing is persisted.

use std::sync::Arc;

use axum::{extract::State, http::StatusCode, Json};
use chrono::{Duration, Utc};
use serde::Serialize;
use utoipa::ToSchema;

use crate::alerts::{classify, Notification};
use crate::api::dto::ApiResponse;
use crate::domain::MaintenanceStore;

/// Notifications state
#[derive(Clone)]
pub struct NotificationsHandlerState {
    pub store: Arc<dyn MaintenanceStore>,
    /// Upcoming-maintenance window
    pub lookahead: Duration,
}

/// Derived maintenance notifications
#[derive(Debug, Serialize, ToSchema)]
pub struct NotificationsResponse {
    pub notifications: Vec<Notification>,
    pub total: usize,
}

/// Maintenance notifications
///
/// Overdue maintenance first (high priority), then maintenance due within
/// the lookahead window (medium priority). Recomputed on every call;
/// notification ids are not stable across calls.
#[utoipa::path(
    get,
    path = "/api/v1/notifications",
    tag = "Notifications",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Derived notifications", body = ApiResponse<NotificationsResponse>),
        (status = 401, description = "Not authenticated"),
        (status = 500, description = "Maintenance store unavailable")
    )
)]
pub async fn list_notifications(
    State(state): State<NotificationsHandlerState>,
) -> Result<Json<ApiResponse<NotificationsResponse>>, (StatusCode, Json<ApiResponse<()>>)> {
    let records = state.store.list_active().await.map_err(|e| {
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ApiResponse::error(e.to_string())),
        )
    })?;

    let notifications = classify(Utc::now(), &records, state.lookahead);
    let total = notifications.len();

    Ok(Json(ApiResponse::success(NotificationsResponse {
        notifications,
        total,
    })))
}
