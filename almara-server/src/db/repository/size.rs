//! Size Repository

use shared::models::Size;
use sqlx::SqlitePool;

use super::{RepoError, RepoResult, is_unique_violation};

pub async fn find_all(pool: &SqlitePool) -> RepoResult<Vec<Size>> {
    let sizes = sqlx::query_as::<_, Size>("SELECT id, name FROM sizes ORDER BY name")
        .fetch_all(pool)
        .await?;
    Ok(sizes)
}

pub async fn find_by_id(pool: &SqlitePool, id: i64) -> RepoResult<Option<Size>> {
    let size = sqlx::query_as::<_, Size>("SELECT id, name FROM sizes WHERE id = ?")
        .bind(id)
        .fetch_optional(pool)
        .await?;
    Ok(size)
}

pub async fn find_by_name(pool: &SqlitePool, name: &str) -> RepoResult<Option<Size>> {
    let size = sqlx::query_as::<_, Size>("SELECT id, name FROM sizes WHERE name = ? LIMIT 1")
        .bind(name)
        .fetch_optional(pool)
        .await?;
    Ok(size)
}

/// Find a size by name, inserting it first if absent.
pub async fn find_or_create(pool: &SqlitePool, name: &str) -> RepoResult<Size> {
    sqlx::query("INSERT INTO sizes (name) VALUES (?) ON CONFLICT(name) DO NOTHING")
        .bind(name)
        .execute(pool)
        .await?;
    find_by_name(pool, name)
        .await?
        .ok_or_else(|| RepoError::Database(format!("Failed to create size '{name}'")))
}

pub async fn rename(pool: &SqlitePool, id: i64, name: &str) -> RepoResult<Size> {
    let result = sqlx::query("UPDATE sizes SET name = ? WHERE id = ?")
        .bind(name)
        .bind(id)
        .execute(pool)
        .await
        .map_err(|e| {
            if is_unique_violation(&e) {
                RepoError::Duplicate(format!("Size '{name}' already exists"))
            } else {
                e.into()
            }
        })?;
    if result.rows_affected() == 0 {
        return Err(RepoError::NotFound(format!("Size {id} not found")));
    }
    find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::NotFound(format!("Size {id} not found")))
}

/// Hard delete; link rows cascade.
pub async fn delete(pool: &SqlitePool, id: i64) -> RepoResult<bool> {
    let result = sqlx::query("DELETE FROM sizes WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected() > 0)
}
