//! Public RSVP submission handler.

use axum::{extract::State, http::StatusCode, Json};
use validator::Validate;

use domain::models::{Rsvp, SubmitRsvpRequest};
use persistence::repositories::RsvpRepository;

use crate::app::AppState;
use crate::error::ApiError;
use crate::middleware::metrics::record_rsvp_submitted;

/// Submit an RSVP.
///
/// POST /api/v1/rsvps
///
/// Attendance and guest count are validated together: attending requires a
/// count of 1..=20, declining discards any count.
pub async fn submit_rsvp(
    State(state): State<AppState>,
    Json(request): Json<SubmitRsvpRequest>,
) -> Result<(StatusCode, Json<Rsvp>), ApiError> {
    request.validate()?;
    let new_rsvp = request.normalize();

    let created = RsvpRepository::new(state.pool.clone())
        .create(&new_rsvp)
        .await?;

    record_rsvp_submitted(created.will_attend);
    tracing::info!(
        rsvp_id = created.id,
        will_attend = created.will_attend,
        "RSVP submitted"
    );

    Ok((StatusCode::CREATED, Json(created.into())))
}
