//! PostgreSQL connection pool construction.

use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use std::time::Duration;

/// Pool sizing and timeout settings, resolved from application config.
#[derive(Debug, Clone)]
pub struct PoolSettings {
    pub url: String,
    pub max_connections: u32,
    pub min_connections: u32,
    pub connect_timeout_secs: u64,
    pub idle_timeout_secs: u64,
}

impl PoolSettings {
    fn options(&self) -> PgPoolOptions {
        PgPoolOptions::new()
            .max_connections(self.max_connections)
            .min_connections(self.min_connections)
            .acquire_timeout(Duration::from_secs(self.connect_timeout_secs))
            .idle_timeout(Duration::from_secs(self.idle_timeout_secs))
    }
}

/// Connects a pool, failing fast when the database is unreachable.
pub async fn create_pool(settings: &PoolSettings) -> Result<PgPool, sqlx::Error> {
    settings.options().connect(&settings.url).await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pool_options_carry_sizing() {
        let settings = PoolSettings {
            url: "postgres://localhost/shower".to_string(),
            max_connections: 8,
            min_connections: 2,
            connect_timeout_secs: 5,
            idle_timeout_secs: 300,
        };
        let options = settings.options();
        assert_eq!(options.get_max_connections(), 8);
        assert_eq!(options.get_min_connections(), 2);
    }
}
