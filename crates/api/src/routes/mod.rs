//! HTTP route handlers.

pub mod admin;
pub mod auth;
pub mod health;
pub mod messages;
pub mod rsvps;
pub mod settings;
