use axum::{
    middleware,
    routing::{delete, get, post, put},
    Router,
};
use sqlx::PgPool;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{broadcast, RwLock};
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use domain::models::MessageEvent;
use domain::services::feed::MessageFeed;
use shared::jwt::{JwtError, JwtKeys};

use crate::config::Config;
use crate::middleware::{
    metrics_handler, metrics_middleware, rate_limit_middleware, require_admin,
    security_headers_middleware, trace_id, RateLimiterState,
};
use crate::routes::{admin, auth, health, messages, rsvps, settings};

#[derive(Clone)]
pub struct AppState {
    pub pool: PgPool,
    pub config: Arc<Config>,
    pub jwt: Arc<JwtKeys>,
    /// Fan-out of message table changes, fed by the database listener.
    pub bus: broadcast::Sender<MessageEvent>,
    /// Server-side reconciled view of the public wall.
    pub feed: Arc<RwLock<MessageFeed>>,
    pub rate_limiter: Option<Arc<RateLimiterState>>,
}

pub fn create_app(
    config: Config,
    pool: PgPool,
    bus: broadcast::Sender<MessageEvent>,
    feed: Arc<RwLock<MessageFeed>>,
) -> Result<Router, JwtError> {
    let config = Arc::new(config);

    let jwt = Arc::new(JwtKeys::from_rsa_pem(
        &config.jwt.private_key,
        &config.jwt.public_key,
        config.jwt.access_token_expiry_secs,
        config.jwt.refresh_token_expiry_secs,
        config.jwt.leeway_secs,
    )?);

    // Create rate limiter if rate limiting is enabled (rate_limit_per_minute > 0)
    let rate_limiter = if config.security.rate_limit_per_minute > 0 {
        Some(Arc::new(RateLimiterState::new(
            config.security.rate_limit_per_minute,
        )))
    } else {
        None
    };

    let state = AppState {
        pool,
        config: config.clone(),
        jwt,
        bus,
        feed,
        rate_limiter,
    };

    // Build CORS layer based on configuration
    let cors = if config.security.cors_origins.is_empty() {
        // Default: allow any origin (for development)
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any)
    } else {
        // Production: only allow specified origins
        use tower_http::cors::AllowOrigin;
        let origins: Vec<_> = config
            .security
            .cors_origins
            .iter()
            .filter_map(|o| o.parse().ok())
            .collect();
        CorsLayer::new()
            .allow_origin(AllowOrigin::list(origins))
            .allow_methods(Any)
            .allow_headers(Any)
    };

    let timeout = TimeoutLayer::new(Duration::from_secs(config.server.request_timeout_secs));

    // Anonymous write endpoints get per-client rate limiting.
    let submission_routes = Router::new()
        .route("/api/v1/messages", post(messages::submit_message))
        .route("/api/v1/rsvps", post(rsvps::submit_rsvp))
        .route("/api/v1/auth/login", post(auth::login))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            rate_limit_middleware,
        ))
        .route_layer(timeout.clone());

    // The SSE stream stays open indefinitely, so it skips the request timeout.
    let stream_routes = Router::new().route("/api/v1/messages/stream", get(messages::stream));

    // Public read endpoints (no authentication required)
    let public_routes = Router::new()
        .route("/api/v1/messages", get(messages::get_messages))
        .route("/api/v1/settings", get(settings::get_settings))
        .route("/api/v1/auth/refresh", post(auth::refresh))
        .route("/api/health", get(health::health_check))
        .route("/api/health/ready", get(health::ready))
        .route("/api/health/live", get(health::live))
        .route("/metrics", get(metrics_handler))
        .route_layer(timeout.clone());

    // Admin routes (require a valid access token for an is_admin profile)
    let admin_routes = Router::new()
        .route("/api/v1/auth/me", get(auth::me))
        .route("/api/v1/admin/messages", get(admin::list_messages))
        .route(
            "/api/v1/admin/messages/:id/approval",
            put(admin::set_message_approval),
        )
        .route("/api/v1/admin/messages/:id", delete(admin::delete_message))
        .route("/api/v1/admin/rsvps", get(admin::list_rsvps))
        .route(
            "/api/v1/admin/rsvps/:id/confirmation",
            put(admin::set_rsvp_confirmation),
        )
        .route("/api/v1/admin/rsvps/:id", delete(admin::delete_rsvp))
        .route("/api/v1/admin/settings/:key", put(admin::upsert_setting))
        .route("/api/v1/admin/accounts", post(admin::create_admin_account))
        .route_layer(middleware::from_fn_with_state(state.clone(), require_admin))
        .route_layer(timeout);

    // Merge all routes
    let router = Router::new()
        .merge(public_routes)
        .merge(stream_routes)
        .merge(submission_routes)
        .merge(admin_routes)
        // Global middleware (order matters: bottom layers run first)
        .layer(middleware::from_fn(security_headers_middleware))
        .layer(CompressionLayer::new())
        .layer(middleware::from_fn(metrics_middleware))
        .layer(TraceLayer::new_for_http())
        .layer(middleware::from_fn(trace_id))
        .layer(cors)
        .with_state(state);

    Ok(router)
}
