//! Shared utilities for the shower site backend.
//!
//! This crate provides common functionality used across the other crates:
//! - JWT token utilities for the admin session
//! - Password hashing with Argon2id
//! - Domain validation helpers

pub mod jwt;
pub mod password;
pub mod validation;
