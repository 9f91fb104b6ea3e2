//! Category Repository

use std::collections::HashMap;

use shared::models::Category;
use sqlx::SqlitePool;

use super::{RepoError, RepoResult, is_unique_violation};

pub async fn find_all(pool: &SqlitePool) -> RepoResult<Vec<Category>> {
    let categories =
        sqlx::query_as::<_, Category>("SELECT id, name FROM categories ORDER BY name")
            .fetch_all(pool)
            .await?;
    Ok(categories)
}

pub async fn find_by_id(pool: &SqlitePool, id: i64) -> RepoResult<Option<Category>> {
    let category = sqlx::query_as::<_, Category>("SELECT id, name FROM categories WHERE id = ?")
        .bind(id)
        .fetch_optional(pool)
        .await?;
    Ok(category)
}

pub async fn find_by_name(pool: &SqlitePool, name: &str) -> RepoResult<Option<Category>> {
    let category =
        sqlx::query_as::<_, Category>("SELECT id, name FROM categories WHERE name = ? LIMIT 1")
            .bind(name)
            .fetch_optional(pool)
            .await?;
    Ok(category)
}

/// Find a category by name, inserting it first if absent.
///
/// Never errors on a repeated name; the existing row is returned.
pub async fn find_or_create(pool: &SqlitePool, name: &str) -> RepoResult<Category> {
    sqlx::query("INSERT INTO categories (name) VALUES (?) ON CONFLICT(name) DO NOTHING")
        .bind(name)
        .execute(pool)
        .await?;
    find_by_name(pool, name)
        .await?
        .ok_or_else(|| RepoError::Database(format!("Failed to create category '{name}'")))
}

/// Batch lookup used when decorating product lists with category names.
pub async fn find_by_ids(pool: &SqlitePool, ids: &[i64]) -> RepoResult<HashMap<i64, Category>> {
    if ids.is_empty() {
        return Ok(HashMap::new());
    }
    let placeholders = vec!["?"; ids.len()].join(", ");
    let sql = format!("SELECT id, name FROM categories WHERE id IN ({placeholders})");
    let mut query = sqlx::query_as::<_, Category>(&sql);
    for id in ids {
        query = query.bind(id);
    }
    let categories = query.fetch_all(pool).await?;
    Ok(categories.into_iter().map(|c| (c.id, c)).collect())
}

pub async fn rename(pool: &SqlitePool, id: i64, name: &str) -> RepoResult<Category> {
    let result = sqlx::query("UPDATE categories SET name = ? WHERE id = ?")
        .bind(name)
        .bind(id)
        .execute(pool)
        .await
        .map_err(|e| {
            if is_unique_violation(&e) {
                RepoError::Duplicate(format!("Category '{name}' already exists"))
            } else {
                e.into()
            }
        })?;
    if result.rows_affected() == 0 {
        return Err(RepoError::NotFound(format!("Category {id} not found")));
    }
    find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::NotFound(format!("Category {id} not found")))
}

/// Hard delete. Products keep existing with their category reference nulled
/// by the store.
pub async fn delete(pool: &SqlitePool, id: i64) -> RepoResult<bool> {
    let result = sqlx::query("DELETE FROM categories WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected() > 0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::repository::test_pool;

    #[tokio::test]
    async fn find_or_create_is_idempotent() {
        let pool = test_pool().await;

        let first = find_or_create(&pool, "Remeras").await.unwrap();
        let second = find_or_create(&pool, "Remeras").await.unwrap();
        assert_eq!(first.id, second.id);

        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM categories")
            .fetch_one(&pool)
            .await
            .unwrap();
        assert_eq!(count, 1);
    }

    #[tokio::test]
    async fn rename_rejects_duplicates_and_missing_rows() {
        let pool = test_pool().await;

        let a = find_or_create(&pool, "Remeras").await.unwrap();
        find_or_create(&pool, "Vestidos").await.unwrap();

        let err = rename(&pool, a.id, "Vestidos").await.unwrap_err();
        assert!(matches!(err, RepoError::Duplicate(_)));

        let err = rename(&pool, 9999, "Camisas").await.unwrap_err();
        assert!(matches!(err, RepoError::NotFound(_)));
    }
}
