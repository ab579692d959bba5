//! Domain services.

pub mod feed;
