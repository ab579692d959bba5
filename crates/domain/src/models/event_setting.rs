//! Event settings: mutable key/value metadata about the event itself
//! (title, address, date, start/end time).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

/// One event setting row. `setting_key` is unique; `updated_at` is
/// refreshed on every write.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventSetting {
    pub id: i64,
    pub setting_key: String,
    pub setting_value: String,
    pub updated_at: DateTime<Utc>,
}

/// Request body for upserting a setting value. The key travels in the path.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct UpsertSettingRequest {
    #[validate(length(max = 2000, message = "Setting value must be at most 2000 characters"))]
    pub value: String,
}
