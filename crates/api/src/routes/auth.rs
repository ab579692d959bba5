//! Authentication handlers: login, token refresh, current identity.

use std::sync::Arc;

use axum::{extract::State, Extension, Json};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use persistence::repositories::ProfileRepository;
use shared::validation::validate_trimmed_not_empty;

use crate::app::AppState;
use crate::error::ApiError;
use crate::middleware::AdminContext;
use crate::services::auth::AuthService;

#[derive(Debug, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(email(message = "Invalid email format"))]
    pub email: String,

    #[validate(custom(function = "validate_trimmed_not_empty"))]
    pub password: String,
}

#[derive(Debug, Deserialize, Validate)]
pub struct RefreshRequest {
    #[validate(custom(function = "validate_trimmed_not_empty"))]
    pub refresh_token: String,
}

#[derive(Debug, Serialize)]
pub struct TokensResponse {
    pub access_token: String,
    pub refresh_token: String,
    pub token_type: String,
    pub expires_in: i64,
}

#[derive(Debug, Serialize)]
pub struct SessionResponse {
    pub account_id: Uuid,
    pub email: String,
    #[serde(flatten)]
    pub tokens: TokensResponse,
}

#[derive(Debug, Serialize)]
pub struct MeResponse {
    pub account_id: Uuid,
    pub email: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub is_admin: bool,
}

/// Authenticate with email and password.
///
/// POST /api/v1/auth/login
///
/// Returns a Bearer token pair on success. Unknown emails and wrong
/// passwords both come back as 401 with the same message.
pub async fn login(
    State(state): State<AppState>,
    Json(request): Json<LoginRequest>,
) -> Result<Json<SessionResponse>, ApiError> {
    request.validate()?;

    let service = AuthService::new(state.pool.clone(), Arc::clone(&state.jwt));
    let result = service.login(&request.email, &request.password).await?;

    tracing::info!(account_id = %result.account_id, "admin login");

    Ok(Json(session_response(result)))
}

/// Exchange a refresh token for a new token pair.
///
/// POST /api/v1/auth/refresh
pub async fn refresh(
    State(state): State<AppState>,
    Json(request): Json<RefreshRequest>,
) -> Result<Json<SessionResponse>, ApiError> {
    request.validate()?;

    let service = AuthService::new(state.pool.clone(), Arc::clone(&state.jwt));
    let result = service.refresh(&request.refresh_token).await?;

    Ok(Json(session_response(result)))
}

/// Return the authenticated admin's account and profile.
///
/// GET /api/v1/auth/me
pub async fn me(
    State(state): State<AppState>,
    Extension(context): Extension<AdminContext>,
) -> Result<Json<MeResponse>, ApiError> {
    let repository = ProfileRepository::new(state.pool.clone());

    let account = repository
        .find_account_by_id(context.account_id)
        .await?
        .ok_or_else(|| ApiError::Unauthorized("Unknown account".into()))?;
    let profile = repository
        .find_profile(context.account_id)
        .await?
        .ok_or_else(|| ApiError::Unauthorized("Unknown account".into()))?;

    Ok(Json(MeResponse {
        account_id: account.id,
        email: account.email,
        first_name: profile.first_name,
        last_name: profile.last_name,
        is_admin: profile.is_admin,
    }))
}

fn session_response(result: crate::services::auth::AuthResult) -> SessionResponse {
    SessionResponse {
        account_id: result.account_id,
        email: result.email,
        tokens: TokensResponse {
            access_token: result.access_token,
            refresh_token: result.refresh_token,
            token_type: "Bearer".to_string(),
            expires_in: result.access_token_expires_in,
        },
    }
}
