//! Admin dashboard handlers. All of these sit behind the admin gate.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use validator::Validate;

use domain::models::{CreateAdminRequest, EventSetting, Message, Rsvp, UpsertSettingRequest};
use persistence::repositories::{EventSettingRepository, MessageRepository, RsvpRepository};
use shared::validation::validate_setting_key;

use crate::app::AppState;
use crate::error::ApiError;
use crate::middleware::metrics::record_message_moderated;
use crate::services::provisioning::AdminProvisioner;

#[derive(Debug, Deserialize)]
pub struct SetApprovalRequest {
    pub approved: bool,
}

#[derive(Debug, Deserialize)]
pub struct SetConfirmationRequest {
    pub is_confirmed: bool,
}

/// List every message, pending and approved alike.
///
/// GET /api/v1/admin/messages
pub async fn list_messages(State(state): State<AppState>) -> Result<Json<Vec<Message>>, ApiError> {
    let messages = MessageRepository::new(state.pool.clone()).get_all().await?;

    Ok(Json(messages.into_iter().map(Into::into).collect()))
}

/// Approve or revoke a message.
///
/// PUT /api/v1/admin/messages/:id/approval
///
/// The wall reacts through the change feed; the handler only flips the
/// flag and reports the new row.
pub async fn set_message_approval(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(request): Json<SetApprovalRequest>,
) -> Result<Json<Message>, ApiError> {
    let updated = MessageRepository::new(state.pool.clone())
        .set_approval(id, request.approved)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("Message {} not found", id)))?;

    record_message_moderated(request.approved);
    tracing::info!(message_id = id, approved = request.approved, "message moderated");

    Ok(Json(updated.into()))
}

/// Delete a message permanently.
///
/// DELETE /api/v1/admin/messages/:id
pub async fn delete_message(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<StatusCode, ApiError> {
    let deleted = MessageRepository::new(state.pool.clone()).delete(id).await?;
    if !deleted {
        return Err(ApiError::NotFound(format!("Message {} not found", id)));
    }

    tracing::info!(message_id = id, "message deleted");

    Ok(StatusCode::NO_CONTENT)
}

/// List all RSVP submissions.
///
/// GET /api/v1/admin/rsvps
pub async fn list_rsvps(State(state): State<AppState>) -> Result<Json<Vec<Rsvp>>, ApiError> {
    let rsvps = RsvpRepository::new(state.pool.clone()).get_all().await?;

    Ok(Json(rsvps.into_iter().map(Into::into).collect()))
}

/// Mark an RSVP as confirmed (or undo it).
///
/// PUT /api/v1/admin/rsvps/:id/confirmation
pub async fn set_rsvp_confirmation(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(request): Json<SetConfirmationRequest>,
) -> Result<Json<Rsvp>, ApiError> {
    let updated = RsvpRepository::new(state.pool.clone())
        .set_confirmation(id, request.is_confirmed)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("RSVP {} not found", id)))?;

    Ok(Json(updated.into()))
}

/// Delete an RSVP.
///
/// DELETE /api/v1/admin/rsvps/:id
pub async fn delete_rsvp(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<StatusCode, ApiError> {
    let deleted = RsvpRepository::new(state.pool.clone()).delete(id).await?;
    if !deleted {
        return Err(ApiError::NotFound(format!("RSVP {} not found", id)));
    }

    Ok(StatusCode::NO_CONTENT)
}

/// Create or update an event setting by key.
///
/// PUT /api/v1/admin/settings/:key
pub async fn upsert_setting(
    State(state): State<AppState>,
    Path(key): Path<String>,
    Json(request): Json<UpsertSettingRequest>,
) -> Result<Json<EventSetting>, ApiError> {
    validate_setting_key(&key).map_err(|e| {
        ApiError::Validation(e.message.map(|m| m.to_string()).unwrap_or_else(|| {
            "Invalid setting key".to_string()
        }))
    })?;
    request.validate()?;

    let setting = EventSettingRepository::new(state.pool.clone())
        .upsert(&key, request.value.trim())
        .await?;

    tracing::info!(setting_key = %key, "event setting updated");

    Ok(Json(setting.into()))
}

/// Provision a new administrator account.
///
/// POST /api/v1/admin/accounts
pub async fn create_admin_account(
    State(state): State<AppState>,
    Json(request): Json<CreateAdminRequest>,
) -> Result<(StatusCode, Json<serde_json::Value>), ApiError> {
    request.validate()?;

    let provisioned = AdminProvisioner::new(state.pool.clone())
        .provision(&request)
        .await?;

    tracing::info!(account_id = %provisioned.account.id, "admin account provisioned");

    Ok((
        StatusCode::CREATED,
        Json(serde_json::json!({
            "account": provisioned.account,
            "profile": provisioned.profile,
        })),
    ))
}
