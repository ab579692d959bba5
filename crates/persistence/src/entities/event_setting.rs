//! Event setting entity (database row mapping).

use chrono::{DateTime, Utc};
use domain::models::EventSetting;
use sqlx::FromRow;

/// Database row mapping for the event_settings table.
#[derive(Debug, Clone, FromRow)]
pub struct EventSettingEntity {
    pub id: i64,
    pub setting_key: String,
    pub setting_value: String,
    pub updated_at: DateTime<Utc>,
}

impl From<EventSettingEntity> for EventSetting {
    fn from(entity: EventSettingEntity) -> Self {
        EventSetting {
            id: entity.id,
            setting_key: entity.setting_key,
            setting_value: entity.setting_value,
            updated_at: entity.updated_at,
        }
    }
}
