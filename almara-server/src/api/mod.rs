//! API route modules
//!
//! # Structure
//!
//! - [`health`] - health check
//! - [`auth`] - register / login / logout browser flows
//! - [`users`] - dashboard user API (paginated)
//! - [`products`] - storefront REST + dashboard product API
//! - [`categories`] - category CRUD
//! - [`colors`] - color CRUD
//! - [`sizes`] - size CRUD

pub mod auth;
pub mod categories;
pub mod colors;
pub mod health;
pub mod products;
pub mod sizes;
pub mod users;

// Re-export common types for handlers
pub use crate::utils::{AppError, AppResult};
