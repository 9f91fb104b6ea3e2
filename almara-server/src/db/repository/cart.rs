//! Cart Repository
//!
//! Backs the storefront cart once a visitor checks out or logs in. The
//! browsing cart itself lives client-side.

use shared::models::{CART_STATUSES, Cart, CartItem, CartItemWithProduct};
use shared::util::now_millis;
use sqlx::SqlitePool;

use super::{RepoError, RepoResult};

const COLUMNS: &str = "id, user_id, status, created_at, updated_at";

pub async fn find_by_id(pool: &SqlitePool, id: i64) -> RepoResult<Option<Cart>> {
    let cart = sqlx::query_as::<_, Cart>(&format!("SELECT {COLUMNS} FROM carts WHERE id = ?"))
        .bind(id)
        .fetch_optional(pool)
        .await?;
    Ok(cart)
}

/// Carts owned by a user, newest first.
pub async fn find_by_user(pool: &SqlitePool, user_id: i64) -> RepoResult<Vec<Cart>> {
    let carts = sqlx::query_as::<_, Cart>(&format!(
        "SELECT {COLUMNS} FROM carts WHERE user_id = ? ORDER BY created_at DESC"
    ))
    .bind(user_id)
    .fetch_all(pool)
    .await?;
    Ok(carts)
}

/// Open a new active cart, optionally tied to a user.
pub async fn create(pool: &SqlitePool, user_id: Option<i64>) -> RepoResult<Cart> {
    let now = now_millis();
    let id: i64 = sqlx::query_scalar(
        "INSERT INTO carts (user_id, status, created_at, updated_at) \
         VALUES (?, 'active', ?, ?) RETURNING id",
    )
    .bind(user_id)
    .bind(now)
    .bind(now)
    .fetch_one(pool)
    .await?;

    find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::Database("Failed to create cart".into()))
}

/// Move a cart to "active", "completed" or "cancelled".
pub async fn set_status(pool: &SqlitePool, id: i64, status: &str) -> RepoResult<Cart> {
    if !CART_STATUSES.contains(&status) {
        return Err(RepoError::Validation(format!(
            "Invalid cart status '{status}'"
        )));
    }
    let result = sqlx::query("UPDATE carts SET status = ?, updated_at = ? WHERE id = ?")
        .bind(status)
        .bind(now_millis())
        .bind(id)
        .execute(pool)
        .await?;
    if result.rows_affected() == 0 {
        return Err(RepoError::NotFound(format!("Cart {id} not found")));
    }
    find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::NotFound(format!("Cart {id} not found")))
}

pub async fn add_item(pool: &SqlitePool, cart_id: i64, product_id: i64) -> RepoResult<CartItem> {
    let now = now_millis();
    let id: i64 = sqlx::query_scalar(
        "INSERT INTO cart_items (cart_id, product_id, created_at, updated_at) \
         VALUES (?, ?, ?, ?) RETURNING id",
    )
    .bind(cart_id)
    .bind(product_id)
    .bind(now)
    .bind(now)
    .fetch_one(pool)
    .await?;

    let item = sqlx::query_as::<_, CartItem>(
        "SELECT id, cart_id, product_id, created_at, updated_at FROM cart_items WHERE id = ?",
    )
    .bind(id)
    .fetch_one(pool)
    .await?;
    Ok(item)
}

pub async fn remove_item(pool: &SqlitePool, item_id: i64) -> RepoResult<bool> {
    let result = sqlx::query("DELETE FROM cart_items WHERE id = ?")
        .bind(item_id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected() > 0)
}

/// Items of a cart joined with the product columns the storefront shows.
pub async fn items_with_products(
    pool: &SqlitePool,
    cart_id: i64,
) -> RepoResult<Vec<CartItemWithProduct>> {
    let items = sqlx::query_as::<_, CartItemWithProduct>(
        "SELECT ci.id, ci.cart_id, ci.product_id, p.sku, p.name AS product_name, \
         p.retail_price FROM cart_items ci \
         JOIN products p ON p.id = ci.product_id \
         WHERE ci.cart_id = ? ORDER BY ci.id",
    )
    .bind(cart_id)
    .fetch_all(pool)
    .await?;
    Ok(items)
}
