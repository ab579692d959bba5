//! Rate limiting middleware.
//!
//! The wall, RSVP and login endpoints accept anonymous traffic, so
//! limiting is keyed by client IP rather than by credential. Each client
//! gets its own token bucket; buckets idle past the eviction window are
//! dropped once the map grows past its high-water mark, so one IP per
//! request cannot grow the map without bound.

use axum::{
    body::Body,
    extract::{ConnectInfo, State},
    http::{header, Request, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use governor::{
    clock::DefaultClock,
    state::{InMemoryState, NotKeyed},
    Quota, RateLimiter as GovRateLimiter,
};
use serde_json::json;
use std::{
    collections::HashMap,
    net::SocketAddr,
    num::NonZeroU32,
    sync::{Arc, RwLock},
    time::{Duration, Instant},
};

use crate::app::AppState;

/// Type alias for the rate limiter used per client.
type ClientRateLimiter = GovRateLimiter<NotKeyed, InMemoryState, DefaultClock>;

/// Entry count above which idle clients get purged on insert.
const MAX_TRACKED_CLIENTS: usize = 10_000;

/// A client bucket untouched for this long is eligible for eviction.
const CLIENT_IDLE_EVICTION: Duration = Duration::from_secs(10 * 60);

struct ClientEntry {
    limiter: Arc<ClientRateLimiter>,
    last_seen: Instant,
}

/// Rate limiter state shared across all requests.
/// Uses a HashMap keyed by client IP with individual rate limiters.
pub struct RateLimiterState {
    limiters: RwLock<HashMap<String, ClientEntry>>,
    rate_limit_per_minute: u32,
    max_clients: usize,
    idle_eviction: Duration,
}

impl RateLimiterState {
    /// Create a new rate limiter state with the specified limit per minute.
    pub fn new(rate_limit_per_minute: u32) -> Self {
        Self::with_eviction(rate_limit_per_minute, MAX_TRACKED_CLIENTS, CLIENT_IDLE_EVICTION)
    }

    fn with_eviction(rate_limit_per_minute: u32, max_clients: usize, idle_eviction: Duration) -> Self {
        Self {
            limiters: RwLock::new(HashMap::new()),
            rate_limit_per_minute,
            max_clients,
            idle_eviction,
        }
    }

    /// Get or create a rate limiter for the given client key, refreshing
    /// its last-seen stamp.
    fn get_or_create_limiter(&self, client: &str) -> Arc<ClientRateLimiter> {
        let mut limiters = self.limiters.write().unwrap();
        if let Some(entry) = limiters.get_mut(client) {
            entry.last_seen = Instant::now();
            return entry.limiter.clone();
        }

        if limiters.len() >= self.max_clients {
            let idle_eviction = self.idle_eviction;
            limiters.retain(|_, entry| entry.last_seen.elapsed() < idle_eviction);
        }

        let quota = Quota::per_minute(
            NonZeroU32::new(self.rate_limit_per_minute).unwrap_or(NonZeroU32::new(60).unwrap()),
        );
        let limiter = Arc::new(GovRateLimiter::direct(quota));
        limiters.insert(
            client.to_string(),
            ClientEntry {
                limiter: limiter.clone(),
                last_seen: Instant::now(),
            },
        );
        limiter
    }

    /// Check if a request from the given client should be allowed.
    /// Returns Ok(()) if allowed, or Err with retry_after seconds if rate limited.
    pub fn check(&self, client: &str) -> Result<(), u64> {
        let limiter = self.get_or_create_limiter(client);

        match limiter.check() {
            Ok(_) => Ok(()),
            Err(not_until) => {
                let wait_time = not_until.wait_time_from(governor::clock::Clock::now(
                    &governor::clock::DefaultClock::default(),
                ));
                // Return retry after in seconds, minimum 1 second
                Err(wait_time.as_secs().max(1))
            }
        }
    }

    fn tracked_clients(&self) -> usize {
        self.limiters.read().unwrap().len()
    }
}

impl std::fmt::Debug for RateLimiterState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RateLimiterState")
            .field("rate_limit_per_minute", &self.rate_limit_per_minute)
            .field("active_limiters", &self.tracked_clients())
            .finish()
    }
}

/// Middleware that applies per-client rate limiting.
pub async fn rate_limit_middleware(
    State(state): State<AppState>,
    req: Request<Body>,
    next: Next,
) -> Response {
    if let Some(ref rate_limiter) = state.rate_limiter {
        let client = client_key(&req, state.config.security.behind_proxy);
        if let Err(retry_after) = rate_limiter.check(&client) {
            return rate_limited_response(state.config.security.rate_limit_per_minute, retry_after);
        }
    }

    next.run(req).await
}

/// Derives the limiter key for a request.
///
/// X-Forwarded-For is only consulted when the deployment declares a
/// trusted reverse proxy; a direct client can put anything in that header
/// and would otherwise get a fresh quota per request. Without a proxy the
/// peer address is the identity.
fn client_key(req: &Request<Body>, behind_proxy: bool) -> String {
    if behind_proxy {
        if let Some(forwarded) = req
            .headers()
            .get("x-forwarded-for")
            .and_then(|v| v.to_str().ok())
        {
            if let Some(first) = forwarded.split(',').next() {
                let first = first.trim();
                if !first.is_empty() {
                    return first.to_string();
                }
            }
        }
    }

    req.extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|info| info.0.ip().to_string())
        .unwrap_or_else(|| "unknown".to_string())
}

/// Create a rate limited response with proper headers and body.
fn rate_limited_response(limit: u32, retry_after: u64) -> Response {
    let body = json!({
        "error": "rate_limit_exceeded",
        "message": format!("Rate limit of {} requests/minute exceeded", limit),
        "retryAfter": retry_after
    });

    let mut response = (StatusCode::TOO_MANY_REQUESTS, Json(body)).into_response();

    response
        .headers_mut()
        .insert(header::RETRY_AFTER, retry_after.to_string().parse().unwrap());

    response
}
