//! Query timing and pool health metrics.

use std::time::{Duration, Instant};

use metrics::{gauge, histogram};
use sqlx::PgPool;

/// Records one query duration under the `database_query_duration_seconds`
/// histogram, labelled by query name.
pub fn record_query_duration(query_name: &str, duration_secs: f64) {
    histogram!(
        "database_query_duration_seconds",
        "query" => query_name.to_string()
    )
    .record(duration_secs);
}

fn record_pool_gauges(pool: &PgPool) {
    let size = pool.size() as usize;
    let idle = pool.num_idle();

    gauge!("database_connections_active").set(size.saturating_sub(idle) as f64);
    gauge!("database_connections_idle").set(idle as f64);
    gauge!("database_connections_total").set(size as f64);
}

/// Publishes pool connection gauges on a fixed interval.
///
/// Spawned once at startup; exits when the pool closes during shutdown.
pub async fn monitor_pool(pool: PgPool, interval: Duration) {
    let mut ticker = tokio::time::interval(interval);
    loop {
        ticker.tick().await;
        if pool.is_closed() {
            break;
        }
        record_pool_gauges(&pool);
    }
}

/// Times one repository query and reports it on drop via [`record`].
///
/// [`record`]: QueryTimer::record
pub struct QueryTimer {
    query_name: String,
    start: Instant,
}

impl QueryTimer {
    pub fn new(query_name: impl Into<String>) -> Self {
        Self {
            query_name: query_name.into(),
            start: Instant::now(),
        }
    }

    /// Records the elapsed duration under the timer's query name.
    pub fn record(self) {
        let duration = self.start.elapsed().as_secs_f64();
        record_query_duration(&self.query_name, duration);
    }
}
