//! Application services.

pub mod auth;
pub mod feed_cache;
pub mod provisioning;
