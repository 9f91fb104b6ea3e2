//! Data models
//!
//! Shared between almara-server and the admin dashboard (via API).
//! DB row types use `#[cfg_attr(feature = "db", derive(sqlx::FromRow))]`.
//! All IDs are `i64` (SQLite INTEGER PRIMARY KEY); timestamps are UTC
//! milliseconds.

pub mod cart;
pub mod category;
pub mod color;
pub mod product;
pub mod serde_helpers;
pub mod size;
pub mod user;

// Re-exports
pub use cart::*;
pub use category::*;
pub use color::*;
pub use product::*;
pub use size::*;
pub use user::*;
