// Copyright (c) 2025 sbksba
//
// This software is licensed under the terms of the MIT License.
// See the LICENSE file in the project root for the full license text.
use anyhow::{Context, Result};
use chrono::Utc;
use sqlx::SqlitePool;
use tasktrack_common::{Category, CreateCategoryPayload, UpdateCategoryPayload};
use tracing::debug;
use uuid::Uuid;

/// Retrieves every category owned by `owner_id`, oldest first.
pub async fn get_categories_from_db(pool: &SqlitePool, owner_id: &str) -> Result<Vec<Category>> {
    let categories = sqlx::query_as::<_, Category>(
        "SELECT * FROM categories WHERE user_id = ? ORDER BY created_at ASC",
    )
    .bind(owner_id)
    .fetch_all(pool)
    .await
    .context("Failed to retrieve categories from DB")?;

    Ok(categories)
}

/// Looks a category up by `(id, owner)`. A category belonging to another user
/// is reported as absent.
pub async fn find_category_from_db(
    pool: &SqlitePool,
    category_id: &str,
    owner_id: &str,
) -> Result<Option<Category>> {
    let category =
        sqlx::query_as::<_, Category>("SELECT * FROM categories WHERE id = ? AND user_id = ?")
            .bind(category_id)
            .bind(owner_id)
            .fetch_optional(pool)
            .await
            .context("Failed to look up category")?;

    Ok(category)
}

/// Looks a category up by name within one user's namespace. Used for the
/// friendly duplicate-name check before inserts and renames.
pub async fn find_category_by_name(
    pool: &SqlitePool,
    owner_id: &str,
    name: &str,
) -> Result<Option<Category>> {
    let category =
        sqlx::query_as::<_, Category>("SELECT * FROM categories WHERE user_id = ? AND name = ?")
            .bind(owner_id)
            .bind(name)
            .fetch_optional(pool)
            .await
            .context("Failed to look up category by name")?;

    Ok(category)
}

/// Inserts a new category owned by `owner_id`. A concurrent insert with the
/// same name loses to the UNIQUE (user_id, name) constraint; callers inspect
/// the error for a unique violation to report a conflict.
pub async fn create_category_in_db(
    pool: &SqlitePool,
    payload: CreateCategoryPayload,
    owner_id: &str,
) -> Result<Category> {
    let id = Uuid::new_v4().to_string();
    let created_at = Utc::now();

    debug!(
        "Insert values: id={}, name={}, user_id={}",
        id, payload.name, owner_id
    );

    sqlx::query(
        "INSERT INTO categories (id, name, description, color, user_id, created_at) VALUES (?, ?, ?, ?, ?, ?)",
    )
    .bind(&id)
    .bind(&payload.name)
    .bind(&payload.description)
    .bind(&payload.color)
    .bind(owner_id)
    .bind(created_at)
    .execute(pool)
    .await
    .context("Failed to insert category into DB")?;

    Ok(Category {
        id,
        name: payload.name,
        description: payload.description,
        color: payload.color,
        user_id: owner_id.to_string(),
        created_at,
    })
}

/// Applies the non-null fields of `patch` to a category and returns the fresh
/// record, or `None` when `(id, owner)` does not match anything.
pub async fn update_category_in_db(
    pool: &SqlitePool,
    category_id: &str,
    owner_id: &str,
    patch: UpdateCategoryPayload,
) -> Result<Option<Category>> {
    let Some(category) = find_category_from_db(pool, category_id, owner_id).await? else {
        return Ok(None);
    };

    // A null field in the patch means "keep the stored value".
    let name = patch.name.unwrap_or(category.name);
    let description = patch.description.or(category.description);
    let color = patch.color.or(category.color);

    sqlx::query("UPDATE categories SET name = ?, description = ?, color = ? WHERE id = ? AND user_id = ?")
        .bind(&name)
        .bind(&description)
        .bind(&color)
        .bind(category_id)
        .bind(owner_id)
        .execute(pool)
        .await
        .context("Failed to update category in DB")?;

    find_category_from_db(pool, category_id, owner_id).await
}

/// Deletes a category after the ownership check. Tasks referencing it get
/// their `category_id` nulled by the ON DELETE SET NULL rule, not by
/// application code.
pub async fn delete_category_in_db(
    pool: &SqlitePool,
    category_id: &str,
    owner_id: &str,
) -> Result<bool> {
    let result = sqlx::query("DELETE FROM categories WHERE id = ? AND user_id = ?")
        .bind(category_id)
        .bind(owner_id)
        .execute(pool)
        .await
        .context("Failed to delete category from DB")?;

    Ok(result.rows_affected() > 0)
}
