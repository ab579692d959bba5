//! Persistence layer for the shower site backend.
//!
//! This crate contains:
//! - Database connection management
//! - Entity definitions (database row mappings)
//! - Repository implementations
//! - The LISTEN/NOTIFY bridge feeding the realtime message bus

pub mod db;
pub mod entities;
pub mod listener;
pub mod metrics;
pub mod repositories;
