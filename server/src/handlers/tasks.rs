// Copyright (c) 2025 sbksba
//
// This software is licensed under the terms of the MIT License.
// See the LICENSE file in the project root for the full license text.
use crate::auth::Claims;
use crate::database;
use crate::error::AppError;
use crate::metrics;
use crate::AppState;

use axum::{
    extract::{Json, Path, Query, State},
    http::StatusCode,
};
use serde::Deserialize;
use tasktrack_common::{CreateTaskPayload, Task, TaskMetrics, UpdateTaskPayload};
use tracing::{debug, error, info};

#[derive(Deserialize, Debug, Default)]
pub struct ListTasksQuery {
    /// When true, archived tasks are included alongside active ones.
    pub archived: Option<bool>,
}

/// A category reference in a payload must resolve within the caller's own
/// namespace; someone else's category id behaves like a missing one.
async fn ensure_category_owned(
    state: &AppState,
    owner_id: &str,
    category_id: &str,
) -> Result<(), AppError> {
    if database::categories::find_category_from_db(&state.pool, category_id, owner_id)
        .await?
        .is_none()
    {
        return Err(AppError::not_found("Category not found."));
    }
    Ok(())
}

/// Handler for creating a new task.
pub async fn create_task(
    State(state): State<AppState>,
    claims: Claims,
    Json(payload): Json<CreateTaskPayload>,
) -> Result<(StatusCode, Json<Task>), AppError> {
    debug!("Received request to create task: {}", payload.title);

    if payload.title.trim().is_empty() {
        error!("Validation failed: task title is empty.");
        return Err(AppError::bad_request("Task title cannot be empty."));
    }

    if let Some(category_id) = &payload.category_id {
        ensure_category_owned(&state, &claims.sub, category_id).await?;
    }

    let new_task = database::tasks::create_task_in_db(&state.pool, payload, &claims.sub).await?;

    info!("Task created successfully with ID: {}", new_task.id);

    Ok((StatusCode::CREATED, Json(new_task)))
}

/// Handler for listing the caller's tasks. Archived tasks stay hidden unless
/// the `archived=true` query parameter is present.
pub async fn list_tasks(
    State(state): State<AppState>,
    claims: Claims,
    Query(query): Query<ListTasksQuery>,
) -> Result<Json<Vec<Task>>, AppError> {
    let include_archived = query.archived.unwrap_or(false);
    let tasks =
        database::tasks::get_tasks_from_db(&state.pool, &claims.sub, include_archived).await?;

    info!("Successfully retrieved {} tasks.", tasks.len());

    Ok(Json(tasks))
}

/// Handler for listing the caller's archived tasks.
pub async fn list_archived_tasks(
    State(state): State<AppState>,
    claims: Claims,
) -> Result<Json<Vec<Task>>, AppError> {
    let tasks = database::tasks::get_archived_tasks_from_db(&state.pool, &claims.sub).await?;

    info!("Successfully retrieved {} archived tasks.", tasks.len());

    Ok(Json(tasks))
}

/// Handler for the productivity metrics endpoint. The computation runs over
/// the caller's non-archived tasks, the same set `list_tasks` returns by
/// default.
pub async fn task_metrics(
    State(state): State<AppState>,
    claims: Claims,
) -> Result<Json<TaskMetrics>, AppError> {
    let tasks = database::tasks::get_tasks_from_db(&state.pool, &claims.sub, false).await?;

    Ok(Json(metrics::compute_task_metrics(&tasks)))
}

/// Handler for fetching a single task by ID.
pub async fn get_task(
    State(state): State<AppState>,
    claims: Claims,
    Path(task_id): Path<String>,
) -> Result<Json<Task>, AppError> {
    let task = database::tasks::find_task_from_db(&state.pool, &task_id, &claims.sub)
        .await?
        .ok_or_else(|| AppError::not_found("Task not found."))?;

    Ok(Json(task))
}

/// Handler for patching a task. Completion transitions are enforced by the
/// database layer; this handler only validates the payload shape.
pub async fn update_task(
    State(state): State<AppState>,
    claims: Claims,
    Path(task_id): Path<String>,
    Json(payload): Json<UpdateTaskPayload>,
) -> Result<Json<Task>, AppError> {
    if let Some(title) = &payload.title {
        if title.trim().is_empty() {
            error!("Validation failed: task title is empty.");
            return Err(AppError::bad_request("Task title cannot be empty."));
        }
    }

    if let Some(category_id) = &payload.category_id {
        ensure_category_owned(&state, &claims.sub, category_id).await?;
    }

    let task = database::tasks::update_task_in_db(&state.pool, &task_id, &claims.sub, payload)
        .await?
        .ok_or_else(|| AppError::not_found("Task not found."))?;

    info!("Task {} updated.", task.id);

    Ok(Json(task))
}

/// Handler for archiving a task.
pub async fn archive_task(
    State(state): State<AppState>,
    claims: Claims,
    Path(task_id): Path<String>,
) -> Result<Json<Task>, AppError> {
    let task = database::tasks::archive_task_in_db(&state.pool, &task_id, &claims.sub)
        .await?
        .ok_or_else(|| AppError::not_found("Task not found."))?;

    info!("Task {} archived.", task.id);

    Ok(Json(task))
}

/// Handler for restoring an archived task to the active, incomplete state.
pub async fn unarchive_task(
    State(state): State<AppState>,
    claims: Claims,
    Path(task_id): Path<String>,
) -> Result<Json<Task>, AppError> {
    let task = database::tasks::unarchive_task_in_db(&state.pool, &task_id, &claims.sub)
        .await?
        .ok_or_else(|| AppError::not_found("Task not found."))?;

    info!("Task {} unarchived.", task.id);

    Ok(Json(task))
}

/// Handler for deleting a task by ID.
pub async fn delete_task(
    State(state): State<AppState>,
    claims: Claims,
    Path(task_id): Path<String>,
) -> Result<StatusCode, AppError> {
    debug!("Attempting to delete task with ID: {}", task_id);

    let deleted = database::tasks::delete_task_in_db(&state.pool, &task_id, &claims.sub).await?;

    if deleted {
        info!("Task with ID {} deleted successfully.", task_id);
        Ok(StatusCode::NO_CONTENT)
    } else {
        error!("Task with ID {} not found for deletion.", task_id);
        Err(AppError::not_found("Task not found."))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::test_support::{insert_test_user, setup_test_db};

    async fn test_state() -> AppState {
        AppState {
            pool: setup_test_db().await,
            jwt_secret: "test-secret".to_string(),
        }
    }

    fn claims_for(user_id: &str) -> Claims {
        Claims {
            sub: user_id.to_string(),
            email: "owner@example.com".to_string(),
            exp: 0,
            iat: 0,
        }
    }

    #[tokio::test]
    async fn test_create_task_validation_empty_title() {
        let state = test_state().await;
        let owner = insert_test_user(&state.pool, "owner@example.com").await;

        let payload = CreateTaskPayload {
            title: "   ".to_string(),
            description: None,
            is_completed: None,
            is_archived: None,
            planned_date: None,
            category_id: None,
        };

        let result = create_task(State(state), claims_for(&owner), Json(payload)).await;

        assert!(result.is_err());
        let err = result.err().unwrap();
        assert_eq!(err.code, StatusCode::BAD_REQUEST);
        assert_eq!(err.message, "Task title cannot be empty.");
    }

    #[tokio::test]
    async fn test_create_task_with_foreign_category_is_not_found() {
        let state = test_state().await;
        let owner = insert_test_user(&state.pool, "owner@example.com").await;
        let stranger = insert_test_user(&state.pool, "stranger@example.com").await;

        let category = crate::database::categories::create_category_in_db(
            &state.pool,
            tasktrack_common::CreateCategoryPayload {
                name: "Theirs".to_string(),
                description: None,
                color: None,
            },
            &stranger,
        )
        .await
        .unwrap();

        let payload = CreateTaskPayload {
            title: "Sneaky".to_string(),
            description: None,
            is_completed: None,
            is_archived: None,
            planned_date: None,
            category_id: Some(category.id),
        };

        let result = create_task(State(state), claims_for(&owner), Json(payload)).await;

        assert!(result.is_err());
        assert_eq!(result.err().unwrap().code, StatusCode::NOT_FOUND);
    }
}
