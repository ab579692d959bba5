//! Admin JWT authentication middleware.
//!
//! Every admin route passes through [`require_admin`]: the Bearer token is
//! validated, then the caller's profile is loaded and the `is_admin` flag
//! checked on each request, so revoking the flag locks an account out
//! immediately even if its tokens are still valid.

use axum::{
    body::Body,
    extract::State,
    http::{Request, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use uuid::Uuid;

use persistence::entities::ProfileEntity;
use persistence::repositories::ProfileRepository;
use shared::jwt::account_id_from_claims;

use crate::app::AppState;

/// Authenticated administrator, stored in request extensions.
#[derive(Debug, Clone)]
pub struct AdminContext {
    pub account_id: Uuid,
}

/// Outcome of checking a loaded profile against the admin requirement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum AdminGate {
    Allowed,
    /// The account exists but is not an administrator.
    NotAdmin,
    /// The token subject has no profile row.
    UnknownAccount,
}

fn admin_gate(profile: Option<&ProfileEntity>) -> AdminGate {
    match profile {
        Some(profile) if profile.is_admin => AdminGate::Allowed,
        Some(_) => AdminGate::NotAdmin,
        None => AdminGate::UnknownAccount,
    }
}

/// Middleware that requires an access token belonging to an admin profile.
pub async fn require_admin(
    State(state): State<AppState>,
    mut req: Request<Body>,
    next: Next,
) -> Response {
    // Extract Bearer token from Authorization header
    let auth_header = req
        .headers()
        .get("Authorization")
        .and_then(|v| v.to_str().ok());

    let token = match auth_header {
        Some(header) if header.starts_with("Bearer ") => &header[7..],
        _ => {
            return unauthorized_response("Missing or invalid Authorization header");
        }
    };

    let claims = match state.jwt.validate_access_token(token) {
        Ok(claims) => claims,
        Err(e) => {
            tracing::debug!("JWT validation failed: {}", e);
            return unauthorized_response("Invalid or expired token");
        }
    };

    let account_id = match account_id_from_claims(&claims) {
        Ok(id) => id,
        Err(_) => return unauthorized_response("Invalid token subject"),
    };

    // The admin flag lives on the profile row and is re-read per request.
    let profile = match ProfileRepository::new(state.pool.clone())
        .find_profile(account_id)
        .await
    {
        Ok(profile) => profile,
        Err(e) => {
            tracing::error!("Failed to load profile for auth check: {}", e);
            return internal_error_response("Authentication service unavailable");
        }
    };

    match admin_gate(profile.as_ref()) {
        AdminGate::Allowed => {
            req.extensions_mut().insert(AdminContext { account_id });
            next.run(req).await
        }
        AdminGate::NotAdmin => forbidden_response("Administrator access required"),
        AdminGate::UnknownAccount => unauthorized_response("Unknown account"),
    }
}

fn unauthorized_response(message: &str) -> Response {
    (
        StatusCode::UNAUTHORIZED,
        Json(json!({
            "error": "unauthorized",
            "message": message
        })),
    )
        .into_response()
}

fn forbidden_response(message: &str) -> Response {
    (
        StatusCode::FORBIDDEN,
        Json(json!({
            "error": "forbidden",
            "message": message
        })),
    )
        .into_response()
}

fn internal_error_response(message: &str) -> Response {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(json!({
            "error": "internal_error",
            "message": message
        })),
    )
        .into_response()
}
