//! Shared types for the Almara+ storefront
//!
//! Data models and payload DTOs shared between `almara-server` and API
//! consumers (the admin dashboard). DB row types derive `sqlx::FromRow`
//! behind the `db` feature so non-server consumers don't pull in sqlx.

pub mod models;
pub mod util;

// Re-exports
pub use serde::{Deserialize, Serialize};
