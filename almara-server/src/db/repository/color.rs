//! Color Repository

use shared::models::Color;
use sqlx::SqlitePool;

use super::{RepoError, RepoResult, is_unique_violation};

pub async fn find_all(pool: &SqlitePool) -> RepoResult<Vec<Color>> {
    let colors = sqlx::query_as::<_, Color>("SELECT id, name FROM colors ORDER BY name")
        .fetch_all(pool)
        .await?;
    Ok(colors)
}

pub async fn find_by_id(pool: &SqlitePool, id: i64) -> RepoResult<Option<Color>> {
    let color = sqlx::query_as::<_, Color>("SELECT id, name FROM colors WHERE id = ?")
        .bind(id)
        .fetch_optional(pool)
        .await?;
    Ok(color)
}

pub async fn find_by_name(pool: &SqlitePool, name: &str) -> RepoResult<Option<Color>> {
    let color = sqlx::query_as::<_, Color>("SELECT id, name FROM colors WHERE name = ? LIMIT 1")
        .bind(name)
        .fetch_optional(pool)
        .await?;
    Ok(color)
}

/// Find a color by name, inserting it first if absent.
pub async fn find_or_create(pool: &SqlitePool, name: &str) -> RepoResult<Color> {
    sqlx::query("INSERT INTO colors (name) VALUES (?) ON CONFLICT(name) DO NOTHING")
        .bind(name)
        .execute(pool)
        .await?;
    find_by_name(pool, name)
        .await?
        .ok_or_else(|| RepoError::Database(format!("Failed to create color '{name}'")))
}

pub async fn rename(pool: &SqlitePool, id: i64, name: &str) -> RepoResult<Color> {
    let result = sqlx::query("UPDATE colors SET name = ? WHERE id = ?")
        .bind(name)
        .bind(id)
        .execute(pool)
        .await
        .map_err(|e| {
            if is_unique_violation(&e) {
                RepoError::Duplicate(format!("Color '{name}' already exists"))
            } else {
                e.into()
            }
        })?;
    if result.rows_affected() == 0 {
        return Err(RepoError::NotFound(format!("Color {id} not found")));
    }
    find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::NotFound(format!("Color {id} not found")))
}

/// Hard delete; link rows cascade.
pub async fn delete(pool: &SqlitePool, id: i64) -> RepoResult<bool> {
    let result = sqlx::query("DELETE FROM colors WHERE id = ?")
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
    async fn find_or_create_never_duplicates_rows() {
        let pool = test_pool().await;

        let red = find_or_create(&pool, "Red").await.unwrap();
        find_or_create(&pool, "Blue").await.unwrap();
        let red_again = find_or_create(&pool, "Red").await.unwrap();
        assert_eq!(red.id, red_again.id);

        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM colors")
            .fetch_one(&pool)
            .await
            .unwrap();
        assert_eq!(count, 2);
    }
}
