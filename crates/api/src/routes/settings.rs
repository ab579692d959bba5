//! Public event settings handler.

use axum::{extract::State, Json};

use domain::models::EventSetting;
use persistence::repositories::EventSettingRepository;

use crate::app::AppState;
use crate::error::ApiError;

/// List all event settings (title, address, date, times).
///
/// GET /api/v1/settings
///
/// The landing page reads these to render the event card; the list is
/// public and ordered by key.
pub async fn get_settings(
    State(state): State<AppState>,
) -> Result<Json<Vec<EventSetting>>, ApiError> {
    let settings = EventSettingRepository::new(state.pool.clone())
        .get_all()
        .await?;

    Ok(Json(settings.into_iter().map(Into::into).collect()))
}
