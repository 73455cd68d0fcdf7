//! Equipment management handlers
//!
//! Equipment bodies are free-form: the request carries a required `name`
//! plus any other keys the client cares to store. The handler stamps
//! identity and audit metadata, persists, and echoes the record back.

use axum::{
    extract::{Query, State},
    http::StatusCode,
    Extension, Json,
};
use chrono::Utc;
use sea_orm::{ActiveModelTrait, EntityTrait, PaginatorTrait, QueryOrder, QuerySelect, Set};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::api::dto::{ApiResponse, PaginatedResponse, PaginationParams};
use crate::api::validated_json::ValidatedJson;
use crate::auth::middleware::AuthenticatedUser;
use crate::infrastructure::database::entities::equipment;

/// Equipment state
#[derive(Clone)]
pub struct EquipmentHandlerState {
    pub db: sea_orm::DatabaseConnection,
}

/// A piece of tracked equipment
#[derive(Debug, Serialize, ToSchema)]
pub struct EquipmentDto {
    /// Unique identifier (UUID)
    pub id: String,
    /// Free-form record body as submitted at creation
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

impl From<equipment::Model> for EquipmentDto {
    fn from(m: equipment::Model) -> Self {
        Self {
            id: m.id,
            data: m.data,
            created_by: m.created_by,
            created_at: m.created_at.to_rfc3339(),
            updated_at: m.updated_at.to_rfc3339(),
        }
    }
}

/// Equipment creation request
///
/// Any field beyond `name` is stored verbatim in the record body.
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[schema(example = json!({
    "name": "Infusion pump",
    "manufacturer": "Acme Medical",
    "serial_number": "IP-2024-0042",
    "location": "ICU room 3"
}))]
pub struct CreateEquipmentRequest {
    /// Display name
    #[validate(length(min = 1, max = 255))]
    pub name: String,
    /// Any additional keys
    #[serde(flatten)]
    #[schema(value_type = Object)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

/// Assemble the stored JSON body from the validated request.
///
/// Client-supplied identity and audit keys are dropped; the server is the
/// only writer of those fields.
fn record_body(name: String, mut extra: serde_json::Map<String, serde_json::Value>) -> serde_json::Value {
    for reserved in ["id", "created_by", "created_at", "updated_at"] {
        extra.remove(reserved);
    }
    extra.insert("name".to_string(), serde_json::Value::String(name));
    serde_json::Value::Object(extra)
}

/// List equipment
///
/// Newest first, paginated.
#[utoipa::path(
    get,
    path = "/api/v1/equipment",
    tag = "Equipment",
    security(("bearer_auth" = [])),
    params(PaginationParams),
    responses(
        (status = 200, description = "Paginated equipment list", body = PaginatedResponse<EquipmentDto>),
        (status = 401, description = "Not authenticated")
    )
)]
pub async fn list_equipment(
    State(state): State<EquipmentHandlerState>,
    Query(params): Query<PaginationParams>,
) -> Result<Json<PaginatedResponse<EquipmentDto>>, (StatusCode, Json<ApiResponse<()>>)> {
    let page = params.page.max(1);
    let limit = params.limit.clamp(1, 100);

    let query = equipment::Entity::find().order_by_desc(equipment::Column::CreatedAt);

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

    let items = models.into_iter().map(EquipmentDto::from).collect();
    Ok(Json(PaginatedResponse::new(items, total, page, limit)))
}

/// Register new equipment
#[utoipa::path(
    post,
    path = "/api/v1/equipment",
    tag = "Equipment",
    security(("bearer_auth" = [])),
    request_body = CreateEquipmentRequest,
    responses(
        (status = 201, description = "Equipment created", body = ApiResponse<EquipmentDto>),
        (status = 401, description = "Not authenticated"),
        (status = 422, description = "Validation failed")
    )
)]
pub async fn create_equipment(
    State(state): State<EquipmentHandlerState>,
    Extension(user): Extension<AuthenticatedUser>,
    ValidatedJson(request): ValidatedJson<CreateEquipmentRequest>,
) -> Result<(StatusCode, Json<ApiResponse<EquipmentDto>>), (StatusCode, Json<ApiResponse<()>>)> {
    let now = Utc::now();

    let new_equipment = equipment::ActiveModel {
        id: Set(uuid::Uuid::new_v4().to_string()),
        data: Set(record_body(request.name, request.extra)),
        created_by: Set(user.username),
        created_at: Set(now),
        updated_at: Set(now),
    };

    let model = new_equipment
        .insert(&state.db)
        .await
        .map_err(internal_error)?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(EquipmentDto::from(model))),
    ))
}

fn internal_error(e: sea_orm::DbErr) -> (StatusCode, Json<ApiResponse<()>>) {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(ApiResponse::error(e.to_string())),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn record_body_drops_reserved_keys() {
        let mut extra = serde_json::Map::new();
        extra.insert("id".into(), serde_json::json!("client-supplied"));
        extra.insert("location".into(), serde_json::json!("ICU"));

        let body = record_body("Infusion pump".into(), extra);

        assert_eq!(body["name"], "Infusion pump");
        assert_eq!(body["location"], "ICU");
        assert!(body.get("id").is_none());
    }
}
