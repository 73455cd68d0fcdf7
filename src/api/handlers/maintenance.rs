//! Maintenance management handlers
//!
//! Like equipment, maintenance bodies are free-form beyond the typed
//! columns the alerting core reads (`scheduled_at`, `status`).

use axum::{
    extract::{Query, State},
    http::StatusCode,
    Extension, Json,
};
use chrono::{DateTime, Utc};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder,
    QuerySelect, Set,
};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use crate::api::dto::{ApiResponse, PaginatedResponse};
use crate::api::validated_json::ValidatedJson;
use crate::auth::middleware::AuthenticatedUser;
use crate::infrastructure::database::entities::maintenance;

/// Maintenance state
#[derive(Clone)]
pub struct MaintenanceHandlerState {
    pub db: sea_orm::DatabaseConnection,
}

/// A scheduled maintenance record
#[derive(Debug, Serialize, ToSchema)]
pub struct MaintenanceDto {
    /// Unique identifier (UUID)
    pub id: String,
    /// The equipment this maintenance belongs to
    pub equipment_id: String,
    /// Scheduled date (ISO 8601)
    pub scheduled_at: String,
    /// `pending`, `completed`, or any client-defined status
    pub status: String,
    /// Free-form record body
    #[schema(value_type = Object)]
    #[serde(flatten)]
    pub data: serde_json::Value,
    /// Username of the creator
    pub created_by: String,
    /// Creation date (ISO 8601)
    pub created_at: String,
    /// Last update date (ISO 8601)
    pub updated_at: String,
}

impl From<maintenance::Model> for MaintenanceDto {
    fn from(m: maintenance::Model) -> Self {
        Self {
            id: m.id,
            equipment_id: m.equipment_id,
            scheduled_at: m.scheduled_at.to_rfc3339(),
            status: m.status,
            data: m.data,
            created_by: m.created_by,
            created_at: m.created_at.to_rfc3339(),
            updated_at: m.updated_at.to_rfc3339(),
        }
    }
}

/// Maintenance creation request
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[schema(example = json!({
    "equipment_id": "6f1c0a2e-9d0b-4a6e-8c3f-2b7d5e4a1f90",
    "scheduled_at": "2024-06-12T00:00:00Z",
    "description": "Quarterly calibration"
}))]
pub struct CreateMaintenanceRequest {
    /// Target equipment identifier
    #[validate(length(min = 1))]
    pub equipment_id: String,
    /// When the maintenance is due
    pub scheduled_at: DateTime<Utc>,
    /// Initial status. Default: `pending`
    #[serde(default = "default_status")]
    pub status: String,
    /// Any additional keys
    #[serde(flatten)]
    #[schema(value_type = Object)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

fn default_status() -> String {
    "pending".to_string()
}

/// Maintenance list filter parameters
#[derive(Debug, Deserialize, IntoParams)]
pub struct ListMaintenanceParams {
    /// Filter by status (e.g. `pending`, `completed`)
    pub status: Option<String>,
    /// Filter by equipment
    pub equipment_id: Option<String>,
    /// Page number (1-based). Default: 1
    #[serde(default = "default_page")]
    pub page: u64,
    /// Items per page. Default: 50
    #[serde(default = "default_limit")]
    pub limit: u64,
}

fn default_page() -> u64 {
    1
}

fn default_limit() -> u64 {
    50
}

/// List maintenance records
///
/// Newest first, paginated, optionally filtered by status and equipment.
#[utoipa::path(
    get,
    path = "/api/v1/maintenance",
    tag = "Maintenance",
    security(("bearer_auth" = [])),
    params(ListMaintenanceParams),
    responses(
        (status = 200, description = "Paginated maintenance list", body = PaginatedResponse<MaintenanceDto>),
        (status = 401, description = "Not authenticated")
    )
)]
pub async fn list_maintenance(
    State(state): State<MaintenanceHandlerState>,
    Query(params): Query<ListMaintenanceParams>,
) -> Result<Json<PaginatedResponse<MaintenanceDto>>, (StatusCode, Json<ApiResponse<()>>)> {
    let page = params.page.max(1);
    let limit = params.limit.clamp(1, 100);

    let mut query = maintenance::Entity::find().order_by_desc(maintenance::Column::CreatedAt);

    if let Some(status) = &params.status {
        query = query.filter(maintenance::Column::Status.eq(status));
    }
    if let Some(equipment_id) = &params.equipment_id {
        query = query.filter(maintenance::Column::EquipmentId.eq(equipment_id));
    }

    let total = query
        .clone()
        .count(&state.db)
        .await
        .map_err(internal_error)?;

    let models = query
        .offset((page - 1) * limit)
        .limit(limit)
        .all(&state.db)
        .await
        .map_err(internal_error)?;

    let items = models.into_iter().map(MaintenanceDto::from).collect();
    Ok(Json(PaginatedResponse::new(items, total, page, limit)))
}

/// Schedule new maintenance
#[utoipa::path(
    post,
    path = "/api/v1/maintenance",
    tag = "Maintenance",
    security(("bearer_auth" = [])),
    request_body = CreateMaintenanceRequest,
    responses(
        (status = 201, description = "Maintenance created", body = ApiResponse<MaintenanceDto>),
        (status = 401, description = "Not authenticated"),
        (status = 422, description = "Validation failed"),
        (status = 500, description = "Unknown equipment or storage failure")
    )
)]
pub async fn create_maintenance(
    State(state): State<MaintenanceHandlerState>,
    Extension(user): Extension<AuthenticatedUser>,
    ValidatedJson(request): ValidatedJson<CreateMaintenanceRequest>,
) -> Result<(StatusCode, Json<ApiResponse<MaintenanceDto>>), (StatusCode, Json<ApiResponse<()>>)> {
    let now = Utc::now();

    let mut extra = request.extra;
    for reserved in [
        "id",
        "equipment_id",
        "scheduled_at",
        "status",
        "created_by",
        "created_at",
        "updated_at",
    ] {
        extra.remove(reserved);
    }

    let new_maintenance = maintenance::ActiveModel {
        id: Set(uuid::Uuid::new_v4().to_string()),
        equipment_id: Set(request.equipment_id),
        scheduled_at: Set(request.scheduled_at),
        status: Set(request.status),
        data: Set(serde_json::Value::Object(extra)),
        created_by: Set(user.username),
        created_at: Set(now),
        updated_at: Set(now),
    };

    let model = new_maintenance
        .insert(&state.db)
        .await
        .map_err(internal_error)?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(MaintenanceDto::from(model))),
    ))
}

fn internal_error(e: sea_orm::DbErr) -> (StatusCode, Json<ApiResponse<()>>) {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(ApiResponse::error(e.to_string())),
    )
}
