// Copyright (c) 2025 sbksba
//
// This software is licensed under the terms of the MIT License.
// See the LICENSE file in the project root for the full license text.
use anyhow::{Context, Result};
use chrono::Utc;
use sqlx::SqlitePool;
use tasktrack_common::{CreateTaskPayload, Task, UpdateTaskPayload};
use tracing::debug;
use uuid::Uuid;

/// Inserts a new task owned by `owner_id`.
///
/// Completion and archival default to false unless the payload overrides them
/// at creation. No completion timestamp is stamped here even for a task
/// created already completed; only the completion transition does that.
pub async fn create_task_in_db(
    pool: &SqlitePool,
    payload: CreateTaskPayload,
    owner_id: &str,
) -> Result<Task> {
    let id = Uuid::new_v4().to_string();
    let now = Utc::now();
    let is_completed = payload.is_completed.unwrap_or(false);
    let is_archived = payload.is_archived.unwrap_or(false);

    debug!(
        "Insert values: id={}, title={}, user_id={}, category_id={:?}",
        id, payload.title, owner_id, payload.category_id
    );

    sqlx::query(
        "INSERT INTO tasks (id, title, description, is_completed, is_archived, planned_date, completion_date, user_id, category_id, created_at, updated_at) \
         VALUES (?, ?, ?, ?, ?, ?, NULL, ?, ?, ?, ?)",
    )
    .bind(&id)
    .bind(&payload.title)
    .bind(&payload.description)
    .bind(is_completed)
    .bind(is_archived)
    .bind(payload.planned_date)
    .bind(owner_id)
    .bind(&payload.category_id)
    .bind(now)
    .bind(now)
    .execute(pool)
    .await
    .context("Failed to insert task into DB")?;

    Ok(Task {
        id,
        title: payload.title,
        description: payload.description,
        is_completed,
        is_archived,
        planned_date: payload.planned_date,
        completion_date: None,
        user_id: owner_id.to_string(),
        category_id: payload.category_id,
        created_at: now,
        updated_at: now,
    })
}

/// Retrieves tasks owned by `owner_id`, newest first. Archived tasks are
/// hidden unless `include_archived` is set.
pub async fn get_tasks_from_db(
    pool: &SqlitePool,
    owner_id: &str,
    include_archived: bool,
) -> Result<Vec<Task>> {
    let query = if include_archived {
        "SELECT * FROM tasks WHERE user_id = ? ORDER BY created_at DESC"
    } else {
        "SELECT * FROM tasks WHERE user_id = ? AND is_archived = 0 ORDER BY created_at DESC"
    };

    let tasks = sqlx::query_as::<_, Task>(query)
        .bind(owner_id)
        .fetch_all(pool)
        .await
        .context("Failed to retrieve tasks from DB")?;

    Ok(tasks)
}

/// Retrieves archived tasks owned by `owner_id`, most recently completed
/// first.
pub async fn get_archived_tasks_from_db(pool: &SqlitePool, owner_id: &str) -> Result<Vec<Task>> {
    let tasks = sqlx::query_as::<_, Task>(
        "SELECT * FROM tasks WHERE user_id = ? AND is_archived = 1 ORDER BY completion_date DESC",
    )
    .bind(owner_id)
    .fetch_all(pool)
    .await
    .context("Failed to retrieve archived tasks from DB")?;

    Ok(tasks)
}

/// Looks a task up by `(id, owner)`. A task belonging to another user is
/// reported as absent, never as forbidden.
pub async fn find_task_from_db(
    pool: &SqlitePool,
    task_id: &str,
    owner_id: &str,
) -> Result<Option<Task>> {
    let task = sqlx::query_as::<_, Task>("SELECT * FROM tasks WHERE id = ? AND user_id = ?")
        .bind(task_id)
        .bind(owner_id)
        .fetch_optional(pool)
        .await
        .context("Failed to look up task")?;

    Ok(task)
}

/// Applies a patch to a task, enforcing the completion transition rules:
///
/// - `isCompleted` false -> true stamps `completion_date` with the current
///   instant and forces `is_archived` on, whatever else the patch says.
/// - an explicit `isCompleted: false` clears `completion_date` and forces
///   `is_archived` off.
/// - remaining fields apply verbatim when present; null means "no change".
///
/// Persists, then re-reads and returns the full record. `None` when
/// `(id, owner)` matches nothing.
pub async fn update_task_in_db(
    pool: &SqlitePool,
    task_id: &str,
    owner_id: &str,
    patch: UpdateTaskPayload,
) -> Result<Option<Task>> {
    let Some(task) = find_task_from_db(pool, task_id, owner_id).await? else {
        return Ok(None);
    };

    let mut is_completed = task.is_completed;
    let mut is_archived = task.is_archived;
    let mut completion_date = task.completion_date;

    match patch.is_completed {
        // Completion implies archival.
        Some(true) if !task.is_completed => {
            is_completed = true;
            completion_date = Some(Utc::now());
            is_archived = true;
        }
        // Already completed; nothing to stamp.
        Some(true) => {}
        // Un-completing implies un-archival.
        Some(false) => {
            is_completed = false;
            completion_date = None;
            is_archived = false;
        }
        None => {}
    }

    let title = patch.title.unwrap_or(task.title);
    let description = patch.description.or(task.description);
    let planned_date = patch.planned_date.or(task.planned_date);
    let category_id = patch.category_id.or(task.category_id);

    sqlx::query(
        "UPDATE tasks SET title = ?, description = ?, is_completed = ?, is_archived = ?, planned_date = ?, completion_date = ?, category_id = ?, updated_at = ? \
         WHERE id = ? AND user_id = ?",
    )
    .bind(&title)
    .bind(&description)
    .bind(is_completed)
    .bind(is_archived)
    .bind(planned_date)
    .bind(completion_date)
    .bind(&category_id)
    .bind(Utc::now())
    .bind(task_id)
    .bind(owner_id)
    .execute(pool)
    .await
    .context("Failed to update task in DB")?;

    find_task_from_db(pool, task_id, owner_id).await
}

/// Marks a task archived. Completion state and completion timestamp are left
/// untouched, and archiving an already-archived task is a no-op.
pub async fn archive_task_in_db(
    pool: &SqlitePool,
    task_id: &str,
    owner_id: &str,
) -> Result<Option<Task>> {
    if find_task_from_db(pool, task_id, owner_id).await?.is_none() {
        return Ok(None);
    }

    sqlx::query("UPDATE tasks SET is_archived = 1, updated_at = ? WHERE id = ? AND user_id = ?")
        .bind(Utc::now())
        .bind(task_id)
        .bind(owner_id)
        .execute(pool)
        .await
        .context("Failed to archive task in DB")?;

    find_task_from_db(pool, task_id, owner_id).await
}

/// Restores a task to the active, incomplete state: clears the archived flag
/// AND the completed flag. The completion timestamp is deliberately kept.
pub async fn unarchive_task_in_db(
    pool: &SqlitePool,
    task_id: &str,
    owner_id: &str,
) -> Result<Option<Task>> {
    if find_task_from_db(pool, task_id, owner_id).await?.is_none() {
        return Ok(None);
    }

    sqlx::query(
        "UPDATE tasks SET is_archived = 0, is_completed = 0, updated_at = ? WHERE id = ? AND user_id = ?",
    )
    .bind(Utc::now())
    .bind(task_id)
    .bind(owner_id)
    .execute(pool)
    .await
    .context("Failed to unarchive task in DB")?;

    find_task_from_db(pool, task_id, owner_id).await
}

/// Deletes a task after the ownership check.
/// Returns true if a task was removed, false if `(id, owner)` matched nothing.
pub async fn delete_task_in_db(pool: &SqlitePool, task_id: &str, owner_id: &str) -> Result<bool> {
    debug!("Attempting to delete task with ID: {}", task_id);

    let result = sqlx::query("DELETE FROM tasks WHERE id = ? AND user_id = ?")
        .bind(task_id)
        .bind(owner_id)
        .execute(pool)
        .await
        .context("Failed to delete task from DB")?;

    Ok(result.rows_affected() > 0)
}
