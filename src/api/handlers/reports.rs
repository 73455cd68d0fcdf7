//! Summary report handler

use axum::{extract::State, http::StatusCode, Extension, Json};
use chrono::Utc;
use sea_orm::{ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter};
use serde::Serialize;
use utoipa::ToSchema;

use crate::api::dto::ApiResponse;
use crate::auth::middleware::AuthenticatedUser;
use crate::infrastructure::database::entities::{equipment, maintenance};

/// Reports state
#[derive(Clone)]
pub struct ReportsHandlerState {
    pub db: sea_orm::DatabaseConnection,
}

/// Equipment counters
#[derive(Debug, Serialize, ToSchema)]
pub struct EquipmentStats {
    pub total: u64,
}

/// Maintenance counters
#[derive(Debug, Serialize, ToSchema)]
pub struct MaintenanceStats {
    pub total: u64,
    pub pending: u64,
    pub completed: u64,
}

/// Inventory and maintenance summary
#[derive(Debug, Serialize, ToSchema)]
pub struct ReportResponse {
    pub equipment: EquipmentStats,
    pub maintenance: MaintenanceStats,
    /// Report generation time (ISO 8601)
    pub generated_at: String,
    /// Username that requested the report
    pub generated_by: String,
}

/// Summary report
///
/// Equipment and maintenance counts, broken down by maintenance status.
#[utoipa::path(
    get,
    path = "/api/v1/reports",
    tag = "Reports",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Summary report", body = ApiResponse<ReportResponse>),
        (status = 401, description = "Not authenticated")
    )
)]
pub async fn get_report(
    State(state): State<ReportsHandlerState>,
    Extension(user): Extension<AuthenticatedUser>,
) -> Result<Json<ApiResponse<ReportResponse>>, (StatusCode, Json<ApiResponse<()>>)> {
    let equipment_total = equipment::Entity::find()
        .count(&state.db)
        .await
        .map_err(internal_error)?;

    let maintenance_total = maintenance::Entity::find()
        .count(&state.db)
        .await
        .map_err(internal_error)?;

    let pending = maintenance::Entity::find()
        .filter(maintenance::Column::Status.eq("pending"))
        .count(&state.db)
        .await
        .map_err(internal_error)?;

    let completed = maintenance::Entity::find()
        .filter(maintenance::Column::Status.eq("completed"))
        .count(&state.db)
        .await
        .map_err(internal_error)?;

    let response = ReportResponse {
        equipment: EquipmentStats {
            total: equipment_total,
        },
        maintenance: MaintenanceStats {
            total: maintenance_total,
            pending,
            completed,
        },
        generated_at: Utc::now().to_rfc3339(),
        generated_by: user.username,
    };

    Ok(Json(ApiResponse::success(response)))
}

fn internal_error(e: sea_orm::DbErr) -> (StatusCode, Json<ApiResponse<()>>) {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(ApiResponse::error(e.to_string())),
    )
}
