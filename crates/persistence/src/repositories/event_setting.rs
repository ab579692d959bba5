//! Event setting repository for database operations.

use sqlx::PgPool;

use crate::entities::EventSettingEntity;
use crate::metrics::QueryTimer;

/// Repository for event-setting database operations.
#[derive(Clone)]
pub struct EventSettingRepository {
    pool: PgPool,
}

impl EventSettingRepository {
    /// Creates a new EventSettingRepository with the given connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Get all settings ordered by key.
    pub async fn get_all(&self) -> Result<Vec<EventSettingEntity>, sqlx::Error> {
        let timer = QueryTimer::new("get_all_settings");
        let result = sqlx::query_as::<_, EventSettingEntity>(
            r#"
            SELECT id, setting_key, setting_value, updated_at
            FROM event_settings
            ORDER BY setting_key
            "#,
        )
        .fetch_all(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Upsert a setting value by key, refreshing updated_at on conflict.
    pub async fn upsert(
        &self,
        key: &str,
        value: &str,
    ) -> Result<EventSettingEntity, sqlx::Error> {
        let timer = QueryTimer::new("upsert_setting");
        let result = sqlx::query_as::<_, EventSettingEntity>(
            r#"
            INSERT INTO event_settings (setting_key, setting_value)
            VALUES ($1, $2)
            ON CONFLICT (setting_key)
            DO UPDATE SET setting_value = $2, updated_at = NOW()
            RETURNING id, setting_key, setting_value, updated_at
            "#,
        )
        .bind(key)
        .bind(value)
        .fetch_one(&self.pool)
        .await;
        timer.record();
        result
    }
}
