//! API router with Swagger UI

use std::sync::Arc;

use axum::{
    middleware,
    routing::{get, post},
    Router,
};
use metrics_exporter_prometheus::PrometheusHandle;
use sea_orm::DatabaseConnection;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};
use utoipa_swagger_ui::SwaggerUi;

use crate::alerts;
use crate::api::dto::{ApiResponse, PaginatedResponse, PaginationParams};
use crate::api::handlers::{auth, equipment, health, maintenance, notifications, reports};
use crate::api::metrics::{http_metrics_middleware, prometheus_metrics, MetricsState};
use crate::auth::middleware::{auth_middleware, AuthState};
use crate::auth::AuthService;
use crate::config::AlertsConfig;
use crate::domain::MaintenanceStore;

/// Security scheme modifier for OpenAPI
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .description(Some("JWT Bearer token"))
                        .build(),
                ),
            );
        }
    }
}

/// OpenAPI documentation
#[derive(OpenApi)]
#[openapi(
    paths(
        // Health
        health::health_check,
        // Auth
        auth::login,
        auth::get_current_user,
        // Equipment
        equipment::list_equipment,
        equipment::create_equipment,
        // Maintenance
        maintenance::list_maintenance,
        maintenance::create_maintenance,
        // Reports
        reports::get_report,
        // Notifications
        notifications::list_notifications,
    ),
    components(
        schemas(
            // Common
            ApiResponse<String>,
            PaginationParams,
            // Auth
            auth::LoginRequest,
            auth::LoginResponse,
            auth::UserInfo,
            // Equipment
            equipment::EquipmentDto,
            equipment::CreateEquipmentRequest,
            PaginatedResponse<equipment::EquipmentDto>,
            // Maintenance
            maintenance::MaintenanceDto,
            maintenance::CreateMaintenanceRequest,
            PaginatedResponse<maintenance::MaintenanceDto>,
            // Reports
            reports::ReportResponse,
            reports::EquipmentStats,
            reports::MaintenanceStats,
            // Notifications
            alerts::Notification,
            alerts::NotificationKind,
            alerts::NotificationPriority,
            notifications::NotificationsResponse,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Health", description = "Service health check. Use for uptime/readiness monitoring."),
        (name = "Authentication", description = "Password login returning a JWT. Send the token in the `Authorization: Bearer <token>` header. The first `admin`/`admin` login creates the default administrator."),
        (name = "Equipment", description = "Medical equipment inventory. Records are free-form beyond the required `name`; the server stamps id, timestamps and creator."),
        (name = "Maintenance", description = "Scheduled maintenance records per equipment. `status` starts as `pending`; `completed` records are excluded from alerting."),
        (name = "Reports", description = "Inventory and maintenance summary counters."),
        (name = "Notifications", description = "Derived maintenance alerts: overdue (high priority) first, then upcoming within the configured window (medium priority). Recomputed on every request, never stored."),
    ),
    info(
        title = "Medequip Service API",
        version = "1.2.0",
        description = "REST API for tracking medical equipment and scheduled maintenance.

## Authentication

Obtain a token via `POST /api/v1/auth/login` and send it in the
`Authorization: Bearer <token>` header. On a fresh deployment the first
`admin`/`admin` login bootstraps the administrator account.

## Response format

Every REST response is wrapped in a standard envelope:
```json
{\"success\": true, \"data\": {...}, \"error\": null}
```

On failure:
```json
{\"success\": false, \"data\": null, \"error\": \"description\"}
```

## Pagination

List endpoints accept `page` (1-based) and `limit` (default 50).",
        license(
            name = "MIT"
        )
    )
)]
pub struct ApiDoc;

/// Create the API router with all routes
pub fn create_api_router(
    db: DatabaseConnection,
    auth_service: Arc<AuthService>,
    maintenance_store: Arc<dyn MaintenanceStore>,
    alerts_config: &AlertsConfig,
    prometheus_handle: PrometheusHandle,
) -> Router {
    let middleware_state = AuthState {
        auth: auth_service.clone(),
    };

    // Auth routes (public)
    let auth_routes = Router::new()
        .route("/login", post(auth::login))
        .with_state(auth::AuthHandlerState {
            auth: auth_service.clone(),
        });

    // Auth routes (protected)
    let auth_protected_routes = Router::new()
        .route("/me", get(auth::get_current_user))
        .layer(middleware::from_fn_with_state(
            middleware_state.clone(),
            auth_middleware,
        ));

    // Equipment routes (protected)
    let equipment_routes = Router::new()
        .route(
            "/",
            get(equipment::list_equipment).post(equipment::create_equipment),
        )
        .layer(middleware::from_fn_with_state(
            middleware_state.clone(),
            auth_middleware,
        ))
        .with_state(equipment::EquipmentHandlerState { db: db.clone() });

    // Maintenance routes (protected)
    let maintenance_routes = Router::new()
        .route(
            "/",
            get(maintenance::list_maintenance).post(maintenance::create_maintenance),
        )
        .layer(middleware::from_fn_with_state(
            middleware_state.clone(),
            auth_middleware,
        ))
        .with_state(maintenance::MaintenanceHandlerState { db: db.clone() });

    // Reports routes (protected)
    let reports_routes = Router::new()
        .route("/", get(reports::get_report))
        .layer(middleware::from_fn_with_state(
            middleware_state.clone(),
            auth_middleware,
        ))
        .with_state(reports::ReportsHandlerState { db: db.clone() });

    // Notifications routes (protected)
    let notifications_routes = Router::new()
        .route("/", get(notifications::list_notifications))
        .layer(middleware::from_fn_with_state(
            middleware_state,
            auth_middleware,
        ))
        .with_state(notifications::NotificationsHandlerState {
            store: maintenance_store,
            lookahead: alerts::lookahead_window(alerts_config),
        });

    // CORS configuration
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let swagger_routes = SwaggerUi::new("/docs").url("/api-doc/openapi.json", ApiDoc::openapi());

    Router::new()
        // Swagger UI
        .merge(swagger_routes)
        // Health + metrics
        .route(
            "/health",
            get(health::health_check).with_state(health::HealthHandlerState { db }),
        )
        .route(
            "/metrics",
            get(prometheus_metrics).with_state(MetricsState {
                handle: prometheus_handle,
            }),
        )
        // Auth
        .nest("/api/v1/auth", auth_routes)
        .nest("/api/v1/auth", auth_protected_routes)
        // Equipment
        .nest("/api/v1/equipment", equipment_routes)
        // Maintenance
        .nest("/api/v1/maintenance", maintenance_routes)
        // Reports
        .nest("/api/v1/reports", reports_routes)
        // Notifications
        .nest("/api/v1/notifications", notifications_routes)
        // Middleware
        .layer(middleware::from_fn(http_metrics_middleware))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}
