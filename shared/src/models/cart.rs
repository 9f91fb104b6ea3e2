//! Cart Models
//!
//! The storefront cart is assembled client-side; these rows back it once a
//! visitor checks out or logs in.

use serde::{Deserialize, Serialize};

/// Cart status values accepted by the store.
pub const CART_STATUSES: &[&str] = &["active", "completed", "cancelled"];

/// Cart entity
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Cart {
    pub id: i64,
    /// Owning user; carts may exist before login.
    pub user_id: Option<i64>,
    /// "active", "completed" or "cancelled"
    pub status: String,
    pub created_at: i64,
    pub updated_at: i64,
}

/// Cart item entity
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct CartItem {
    pub id: i64,
    pub cart_id: i64,
    pub product_id: i64,
    pub created_at: i64,
    pub updated_at: i64,
}

/// Cart item joined with the product columns the storefront needs.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct CartItemWithProduct {
    pub id: i64,
    pub cart_id: i64,
    pub product_id: i64,
    pub sku: String,
    pub product_name: String,
    pub retail_price: f64,
}
