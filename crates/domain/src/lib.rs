//! Domain layer for the shower site backend.
//!
//! This crate contains:
//! - Domain models (Message, Rsvp, EventSetting, Profile)
//! - The message feed reconciler
//! - Request validation types

pub mod models;
pub mod services;
