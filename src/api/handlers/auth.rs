//! Authentication API handlers

use std::sync::Arc;

use axum::{extract::State, http::StatusCode, Extension, Json};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::api::dto::ApiResponse;
use crate::auth::middleware::AuthenticatedUser;
use crate::auth::service::{AuthError, AuthService};

/// Auth state for authentication handlers
#[derive(Clone)]
pub struct AuthHandlerState {
    pub auth: Arc<AuthService>,
}

/// Login request
#[derive(Debug, Deserialize, ToSchema)]
#[schema(example = json!({
    "username": "admin",
    "password": "admin"
}))]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

/// Successful login response
///
/// Carries the JWT for subsequent requests; send it in the
/// `Authorization: Bearer <token>` header.
#[derive(Debug, Serialize, ToSchema)]
pub struct LoginResponse {
    /// JWT access token
    pub token: String,
    /// Token type (always `Bearer`)
    pub token_type: String,
    /// Token lifetime in seconds
    pub expires_in: i64,
    /// The authenticated user
    pub user: UserInfo,
}

/// User information
#[derive(Debug, Serialize, ToSchema)]
pub struct UserInfo {
    /// Unique user identifier (UUID)
    pub id: String,
    pub username: String,
    /// Role: `admin` or `user`
    pub role: String,
    pub disabled: bool,
}

/// Authenticate with username and password
///
/// Returns a JWT on success. The very first `admin`/`admin` login creates
/// the default administrator account.
#[utoipa::path(
    post,
    path = "/api/v1/auth/login",
    tag = "Authentication",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Authenticated; returns a JWT", body = ApiResponse<LoginResponse>),
        (status = 401, description = "Unknown user or wrong password"),
        (status = 500, description = "Credential store unavailable")
    )
)]
pub async fn login(
    State(state): State<AuthHandlerState>,
    Json(request): Json<LoginRequest>,
) -> Result<Json<ApiResponse<LoginResponse>>, (StatusCode, Json<ApiResponse<LoginResponse>>)> {
    let result = state
        .auth
        .login(&request.username, &request.password)
        .await
        .map_err(|e| {
            let status = match e {
                AuthError::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
                _ => StatusCode::UNAUTHORIZED,
            };
            // NotFound and BadCredentials stay distinguishable here: the
            // login endpoint reports which one failed, matching the
            // behavior clients already depend on.
            let message = match e {
                AuthError::NotFound => "User not found".to_string(),
                AuthError::BadCredentials => "Incorrect password".to_string(),
                other => other.to_string(),
            };
            (status, Json(ApiResponse::error(message)))
        })?;

    let response = LoginResponse {
        token: result.token,
        token_type: result.token_type,
        expires_in: result.expires_in,
        user: UserInfo {
            id: result.user.id,
            username: result.user.username,
            role: result.user.role.as_str().to_string(),
            disabled: result.user.disabled,
        },
    };

    Ok(Json(ApiResponse::success(response)))
}

/// Current user information
///
/// Returns the account resolved from the bearer token.
#[utoipa::path(
    get,
    path = "/api/v1/auth/me",
    tag = "Authentication",
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "The current user", body = ApiResponse<UserInfo>),
        (status = 401, description = "Missing, invalid or expired token, or disabled account")
    )
)]
pub async fn get_current_user(
    Extension(user): Extension<AuthenticatedUser>,
) -> Json<ApiResponse<UserInfo>> {
    Json(ApiResponse::success(UserInfo {
        id: user.id,
        username: user.username,
        role: user.role.as_str().to_string(),
        disabled: user.disabled,
    }))
}
