//! User Repository

use shared::models::User;
use shared::util::now_millis;
use sqlx::SqlitePool;

use super::{RepoError, RepoResult, is_unique_violation};

const COLUMNS: &str =
    "id, name, email, whatsapp, avatar, password_hash, role, created_at, updated_at";

/// Fields needed to insert a user row. The email must already be lowercased
/// and the password hashed by the caller.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub name: String,
    pub email: String,
    pub whatsapp: String,
    pub avatar: Option<String>,
    pub password_hash: String,
    pub role: String,
}

pub async fn find_by_id(pool: &SqlitePool, id: i64) -> RepoResult<Option<User>> {
    let user = sqlx::query_as::<_, User>(&format!("SELECT {COLUMNS} FROM users WHERE id = ?"))
        .bind(id)
        .fetch_optional(pool)
        .await?;
    Ok(user)
}

/// Lookup by email. The column collates NOCASE, so any casing matches.
pub async fn find_by_email(pool: &SqlitePool, email: &str) -> RepoResult<Option<User>> {
    let user = sqlx::query_as::<_, User>(&format!(
        "SELECT {COLUMNS} FROM users WHERE email = ? LIMIT 1"
    ))
    .bind(email)
    .fetch_optional(pool)
    .await?;
    Ok(user)
}

/// Insert a user; a duplicate email (case-insensitive) is a [`RepoError::Duplicate`].
pub async fn create(pool: &SqlitePool, data: NewUser) -> RepoResult<User> {
    let now = now_millis();
    let id: i64 = sqlx::query_scalar(
        "INSERT INTO users (name, email, whatsapp, avatar, password_hash, role, created_at, updated_at) \
         VALUES (?, ?, ?, ?, ?, ?, ?, ?) RETURNING id",
    )
    .bind(&data.name)
    .bind(&data.email)
    .bind(&data.whatsapp)
    .bind(&data.avatar)
    .bind(&data.password_hash)
    .bind(&data.role)
    .bind(now)
    .bind(now)
    .fetch_one(pool)
    .await
    .map_err(|e| {
        if is_unique_violation(&e) {
            RepoError::Duplicate(format!("A user with email '{}' already exists", data.email))
        } else {
            e.into()
        }
    })?;

    find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::Database("Failed to create user".into()))
}

/// One page of users ordered by id.
pub async fn find_page(pool: &SqlitePool, limit: i64, offset: i64) -> RepoResult<Vec<User>> {
    let users = sqlx::query_as::<_, User>(&format!(
        "SELECT {COLUMNS} FROM users ORDER BY id LIMIT ? OFFSET ?"
    ))
    .bind(limit)
    .bind(offset)
    .fetch_all(pool)
    .await?;
    Ok(users)
}

pub async fn count_all(pool: &SqlitePool) -> RepoResult<i64> {
    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users")
        .fetch_one(pool)
        .await?;
    Ok(count)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::repository::test_pool;

    fn new_user(email: &str) -> NewUser {
        NewUser {
            name: "Ana García".into(),
            email: email.to_lowercase(),
            whatsapp: String::new(),
            avatar: None,
            password_hash: "$argon2id$v=19$m=19456,t=2,p=1$c2FsdA$hash".into(),
            role: "user".into(),
        }
    }

    #[tokio::test]
    async fn duplicate_email_is_rejected_case_insensitively() {
        let pool = test_pool().await;

        create(&pool, new_user("A@b.com")).await.unwrap();
        let err = create(&pool, new_user("a@B.com")).await.unwrap_err();
        assert!(matches!(err, RepoError::Duplicate(_)));

        let count = count_all(&pool).await.unwrap();
        assert_eq!(count, 1);
    }

    #[tokio::test]
    async fn find_by_email_matches_any_casing() {
        let pool = test_pool().await;
        create(&pool, new_user("ana@example.com")).await.unwrap();

        let found = find_by_email(&pool, "ANA@EXAMPLE.COM").await.unwrap();
        assert!(found.is_some());
    }

    #[tokio::test]
    async fn pages_are_windows_over_id_order() {
        let pool = test_pool().await;
        for i in 0..13 {
            create(&pool, new_user(&format!("user{i}@example.com")))
                .await
                .unwrap();
        }

        let first = find_page(&pool, 10, 0).await.unwrap();
        assert_eq!(first.len(), 10);
        let second = find_page(&pool, 10, 10).await.unwrap();
        assert_eq!(second.len(), 3);
        assert!(first.last().unwrap().id < second.first().unwrap().id);

        // past the end: empty window, not an error
        let third = find_page(&pool, 10, 20).await.unwrap();
        assert!(third.is_empty());
    }
}
