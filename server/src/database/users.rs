// Copyright (c) 2025 sbksba
//
// This software is licensed under the terms of the MIT License.
// See the LICENSE file in the project root for the full license text.
use anyhow::{Context, Result};
use chrono::Utc;
use sqlx::SqlitePool;
use tasktrack_common::{User, UserWithPassword};
use tracing::debug;
use uuid::Uuid;

/// Inserts a new account. The e-mail uniqueness constraint makes a duplicate
/// insert fail with a unique violation, which the handler maps to a conflict.
pub async fn create_user_in_db(
    pool: &SqlitePool,
    email: &str,
    password_hash: &str,
) -> Result<User> {
    let id = Uuid::new_v4().to_string();
    let now = Utc::now();

    debug!("Insert values: id={}, email={}", id, email);

    sqlx::query(
        "INSERT INTO users (id, email, password, created_at, updated_at) VALUES (?, ?, ?, ?, ?)",
    )
    .bind(&id)
    .bind(email)
    .bind(password_hash)
    .bind(now)
    .bind(now)
    .execute(pool)
    .await
    .context("Failed to insert user into DB")?;

    Ok(User {
        id,
        email: email.to_string(),
        created_at: now,
        updated_at: now,
    })
}

/// Looks an account up by e-mail, hash included, for credential checks.
pub async fn find_user_by_email(
    pool: &SqlitePool,
    email: &str,
) -> Result<Option<UserWithPassword>> {
    let user = sqlx::query_as::<_, UserWithPassword>("SELECT * FROM users WHERE email = ?")
        .bind(email)
        .fetch_optional(pool)
        .await
        .context("Failed to look up user by e-mail")?;

    Ok(user)
}

pub async fn find_user_by_id(pool: &SqlitePool, user_id: &str) -> Result<Option<User>> {
    let user = sqlx::query_as::<_, User>(
        "SELECT id, email, created_at, updated_at FROM users WHERE id = ?",
    )
    .bind(user_id)
    .fetch_optional(pool)
    .await
    .context("Failed to look up user by id")?;

    Ok(user)
}

/// Applies e-mail and/or password-hash edits to an account and returns the
/// fresh record. Returns `None` when the account does not exist.
pub async fn update_user_in_db(
    pool: &SqlitePool,
    user_id: &str,
    email: Option<&str>,
    password_hash: Option<&str>,
) -> Result<Option<User>> {
    let Some(current) =
        sqlx::query_as::<_, UserWithPassword>("SELECT * FROM users WHERE id = ?")
            .bind(user_id)
            .fetch_optional(pool)
            .await
            .context("Failed to load user for update")?
    else {
        return Ok(None);
    };

    let email = email.unwrap_or(&current.email);
    let password = password_hash.unwrap_or(&current.password);

    sqlx::query("UPDATE users SET email = ?, password = ?, updated_at = ? WHERE id = ?")
        .bind(email)
        .bind(password)
        .bind(Utc::now())
        .bind(user_id)
        .execute(pool)
        .await
        .context("Failed to update user in DB")?;

    find_user_by_id(pool, user_id).await
}

/// Deletes an account. Owned tasks and categories go with it through the
/// ON DELETE CASCADE rules on their foreign keys.
pub async fn delete_user_in_db(pool: &SqlitePool, user_id: &str) -> Result<bool> {
    let result = sqlx::query("DELETE FROM users WHERE id = ?")
        .bind(user_id)
        .execute(pool)
        .await
        .context("Failed to delete user from DB")?;

    Ok(result.rows_affected() > 0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::test_support::setup_test_db;

    #[tokio::test]
    async fn test_create_and_find_user() {
        let pool = setup_test_db().await;

        let created = create_user_in_db(&pool, "alice@example.com", "hash-a")
            .await
            .unwrap();
        assert_eq!(created.email, "alice@example.com");

        let by_email = find_user_by_email(&pool, "alice@example.com")
            .await
            .unwrap()
            .expect("user should exist");
        assert_eq!(by_email.id, created.id);
        assert_eq!(by_email.password, "hash-a");

        let by_id = find_user_by_id(&pool, &created.id)
            .await
            .unwrap()
            .expect("user should exist");
        assert_eq!(by_id.email, "alice@example.com");
    }

    #[tokio::test]
    async fn test_duplicate_email_is_rejected() {
        let pool = setup_test_db().await;

        create_user_in_db(&pool, "bob@example.com", "hash-1")
            .await
            .unwrap();
        let err = create_user_in_db(&pool, "bob@example.com", "hash-2")
            .await
            .unwrap_err();

        assert!(crate::error::is_unique_violation(&err));
    }

    #[tokio::test]
    async fn test_update_user_email_and_password() {
        let pool = setup_test_db().await;
        let user = create_user_in_db(&pool, "carol@example.com", "old-hash")
            .await
            .unwrap();

        let updated = update_user_in_db(&pool, &user.id, Some("carol@new.example.com"), None)
            .await
            .unwrap()
            .expect("user should exist");
        assert_eq!(updated.email, "carol@new.example.com");

        // The untouched password hash survives an e-mail-only edit.
        let record = find_user_by_email(&pool, "carol@new.example.com")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(record.password, "old-hash");

        update_user_in_db(&pool, &user.id, None, Some("new-hash"))
            .await
            .unwrap()
            .expect("user should exist");
        let record = find_user_by_email(&pool, "carol@new.example.com")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(record.password, "new-hash");
    }

    #[tokio::test]
    async fn test_update_missing_user_returns_none() {
        let pool = setup_test_db().await;

        let result = update_user_in_db(&pool, "no-such-id", Some("x@example.com"), None)
            .await
            .unwrap();
        assert!(result.is_none());
    }

    #[tokio::test]
    async fn test_delete_user() {
        let pool = setup_test_db().await;
        let user = create_user_in_db(&pool, "dave@example.com", "hash")
            .await
            .unwrap();

        assert!(delete_user_in_db(&pool, &user.id).await.unwrap());
        assert!(find_user_by_id(&pool, &user.id).await.unwrap().is_none());

        // Deleting twice reports that nothing was removed.
        assert!(!delete_user_in_db(&pool, &user.id).await.unwrap());
    }
}
