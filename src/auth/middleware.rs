//! Authentication middleware for Axum
//!
//! Every protected route passes through [`auth_middleware`], which resolves
//! the bearer token to a live account and stores it in the request
//! extensions. All authentication failures collapse to one uniform 401 so
//! a caller cannot probe which stage rejected the request.

use std::sync::Arc;

use axum::{
    body::Body,
    extract::State,
    http::{header, Request, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

use super::service::{AuthError, AuthService};
use crate::domain::{User, UserRole};

/// Authentication state shared by the middleware and the auth handlers
#[derive(Clone)]
pub struct AuthState {
    pub auth: Arc<AuthService>,
}

/// The resolved account behind the current request
///
/// `disabled` is always false here (disabled accounts never make it past
/// identity resolution) but is carried so user-facing DTOs can echo the
/// stored flag.
#[derive(Clone, Debug)]
pub struct AuthenticatedUser {
    pub id: String,
    pub username: String,
    pub role: UserRole,
    pub disabled: bool,
}

impl AuthenticatedUser {
    pub fn is_admin(&self) -> bool {
        self.role == UserRole::Admin
    }
}

impl From<User> for AuthenticatedUser {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            username: user.username,
            role: user.role,
            disabled: user.disabled,
        }
    }
}

/// Extract token from Authorization header
fn extract_token(auth_header: &str) -> Option<&str> {
    auth_header.strip_prefix("Bearer ")
}

/// Bearer authentication middleware - requires a valid token for a live
/// account
pub async fn auth_middleware(
    State(state): State<AuthState>,
    mut request: Request<Body>,
    next: Next,
) -> Response {
    let token = request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .and_then(extract_token)
        .map(String::from);

    let Some(token) = token else {
        return unauthorized_response();
    };

    match state.auth.resolve_identity(&token).await {
        Ok(user) => {
            request.extensions_mut().insert(AuthenticatedUser::from(user));
            next.run(request).await
        }
        Err(AuthError::Store(e)) => {
            let body = Json(json!({
                "success": false,
                "error": format!("Internal server error: {e}")
            }));
            (StatusCode::INTERNAL_SERVER_ERROR, body).into_response()
        }
        // InvalidToken, AccountDisabled, NotFound, BadCredentials: one signal
        Err(_) => unauthorized_response(),
    }
}

fn unauthorized_response() -> Response {
    let body = Json(json!({
        "success": false,
        "error": "Invalid authentication credentials"
    }));
    (StatusCode::UNAUTHORIZED, body).into_response()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bearer_prefix_is_required() {
        assert_eq!(extract_token("Bearer abc.def.ghi"), Some("abc.def.ghi"));
        assert_eq!(extract_token("bearer abc"), None);
        assert_eq!(extract_token("Basic abc"), None);
        assert_eq!(extract_token(""), None);
    }
}
