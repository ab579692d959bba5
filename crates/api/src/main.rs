use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use tokio::sync::{broadcast, RwLock};
use tracing::info;

use domain::services::feed::MessageFeed;
use persistence::listener::MessageChangeListener;

use shower_api::services::feed_cache;
use shower_api::{app, config, middleware};

/// Capacity of the in-process message change bus. Subscribers that fall
/// further behind than this reseed from the database.
const CHANGE_BUS_CAPACITY: usize = 256;

/// How often connection pool gauges are refreshed.
const POOL_METRICS_INTERVAL: Duration = Duration::from_secs(15);

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    // Load configuration
    let config = config::Config::load()?;

    // Initialize logging
    middleware::logging::init_logging(&config.logging);

    info!("Starting shower site API v{}", env!("CARGO_PKG_VERSION"));

    // Install the Prometheus recorder before any requests are served
    middleware::init_metrics();

    // Create database pool
    let pool = persistence::db::create_pool(&config.database.pool_settings()).await?;

    // Run migrations
    info!("Running database migrations...");
    sqlx::migrate!("../persistence/src/migrations")
        .run(&pool)
        .await?;
    info!("Migrations completed");

    // Publish pool health gauges alongside the HTTP metrics
    tokio::spawn(persistence::metrics::monitor_pool(
        pool.clone(),
        POOL_METRICS_INTERVAL,
    ));

    // Realtime plumbing: trigger notifications flow onto the bus; the feed
    // cache task and SSE subscribers read from it.
    let (bus, _) = broadcast::channel(CHANGE_BUS_CAPACITY);
    let feed = Arc::new(RwLock::new(MessageFeed::new()));

    let listener = MessageChangeListener::new(pool.clone(), bus.clone());
    tokio::spawn(listener.run());
    tokio::spawn(feed_cache::run(
        pool.clone(),
        bus.subscribe(),
        feed.clone(),
    ));

    // Build application
    let app = app::create_app(config.clone(), pool, bus, feed)?;

    // Start server
    let addr = config.socket_addr();
    info!("Server listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
