// Copyright (c) 2025 sbksba
//
// This software is licensed under the terms of the MIT License.
// See the LICENSE file in the project root for the full license text.
use crate::auth::Claims;
use crate::database;
use crate::error::{is_unique_violation, AppError};
use crate::AppState;

use axum::{
    extract::{Json, Path, State},
    http::StatusCode,
};
use tasktrack_common::{Category, CreateCategoryPayload, UpdateCategoryPayload};
use tracing::{error, info};

const MAX_NAME_LEN: usize = 50;
const MAX_DESCRIPTION_LEN: usize = 200;

fn validate_name(name: &str) -> Result<(), AppError> {
    if name.trim().is_empty() {
        error!("Validation failed: category name is empty.");
        return Err(AppError::bad_request("Category name cannot be empty."));
    }
    if name.chars().count() > MAX_NAME_LEN {
        return Err(AppError::bad_request(
            "Category name cannot exceed 50 characters.",
        ));
    }
    Ok(())
}

fn validate_description(description: &str) -> Result<(), AppError> {
    if description.chars().count() > MAX_DESCRIPTION_LEN {
        return Err(AppError::bad_request(
            "Category description cannot exceed 200 characters.",
        ));
    }
    Ok(())
}

/// Handler for creating a new category. The duplicate-name pre-check gives a
/// clean conflict message; the UNIQUE constraint catches the raced case.
pub async fn create_category(
    State(state): State<AppState>,
    claims: Claims,
    Json(payload): Json<CreateCategoryPayload>,
) -> Result<(StatusCode, Json<Category>), AppError> {
    validate_name(&payload.name)?;
    if let Some(description) = &payload.description {
        validate_description(description)?;
    }

    if database::categories::find_category_by_name(&state.pool, &claims.sub, &payload.name)
        .await?
        .is_some()
    {
        return Err(AppError::conflict(
            "A category with this name already exists.",
        ));
    }

    let category =
        match database::categories::create_category_in_db(&state.pool, payload, &claims.sub).await
        {
            Ok(category) => category,
            Err(err) if is_unique_violation(&err) => {
                return Err(AppError::conflict(
                    "A category with this name already exists.",
                ));
            }
            Err(err) => return Err(err.into()),
        };

    info!("Category created successfully with ID: {}", category.id);

    Ok((StatusCode::CREATED, Json(category)))
}

/// Handler for listing the caller's categories.
pub async fn list_categories(
    State(state): State<AppState>,
    claims: Claims,
) -> Result<Json<Vec<Category>>, AppError> {
    let categories = database::categories::get_categories_from_db(&state.pool, &claims.sub).await?;

    info!("Successfully retrieved {} categories.", categories.len());

    Ok(Json(categories))
}

/// Handler for fetching a single category by ID.
pub async fn get_category(
    State(state): State<AppState>,
    claims: Claims,
    Path(category_id): Path<String>,
) -> Result<Json<Category>, AppError> {
    let category = database::categories::find_category_from_db(&state.pool, &category_id, &claims.sub)
        .await?
        .ok_or_else(|| AppError::not_found("Category not found."))?;

    Ok(Json(category))
}

/// Handler for patching a category. Renaming onto another category of the
/// same owner is a conflict; keeping the current name is fine.
pub async fn update_category(
    State(state): State<AppState>,
    claims: Claims,
    Path(category_id): Path<String>,
    Json(payload): Json<UpdateCategoryPayload>,
) -> Result<Json<Category>, AppError> {
    if let Some(name) = &payload.name {
        validate_name(name)?;
    }
    if let Some(description) = &payload.description {
        validate_description(description)?;
    }

    let current = database::categories::find_category_from_db(&state.pool, &category_id, &claims.sub)
        .await?
        .ok_or_else(|| AppError::not_found("Category not found."))?;

    if let Some(name) = &payload.name {
        if name != &current.name
            && database::categories::find_category_by_name(&state.pool, &claims.sub, name)
                .await?
                .is_some()
        {
            return Err(AppError::conflict(
                "A category with this name already exists.",
            ));
        }
    }

    let category = match database::categories::update_category_in_db(
        &state.pool,
        &category_id,
        &claims.sub,
        payload,
    )
    .await
    {
        Ok(Some(category)) => category,
        Ok(None) => return Err(AppError::not_found("Category not found.")),
        Err(err) if is_unique_violation(&err) => {
            return Err(AppError::conflict(
                "A category with this name already exists.",
            ));
        }
        Err(err) => return Err(err.into()),
    };

    info!("Category {} updated.", category.id);

    Ok(Json(category))
}

/// Handler for deleting a category by ID. Tasks that referenced it keep
/// living with a null category.
pub async fn delete_category(
    State(state): State<AppState>,
    claims: Claims,
    Path(category_id): Path<String>,
) -> Result<StatusCode, AppError> {
    let deleted =
        database::categories::delete_category_in_db(&state.pool, &category_id, &claims.sub).await?;

    if deleted {
        info!("Category with ID {} deleted successfully.", category_id);
        Ok(StatusCode::NO_CONTENT)
    } else {
        error!("Category with ID {} not found for deletion.", category_id);
        Err(AppError::not_found("Category not found."))
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
    async fn test_create_category_rejects_long_name() {
        let state = test_state().await;
        let owner = insert_test_user(&state.pool, "owner@example.com").await;

        let payload = CreateCategoryPayload {
            name: "x".repeat(51),
            description: None,
            color: None,
        };

        let result = create_category(State(state), claims_for(&owner), Json(payload)).await;

        assert!(result.is_err());
        assert_eq!(result.err().unwrap().code, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_rename_to_own_name_is_not_a_conflict() {
        let state = test_state().await;
        let owner = insert_test_user(&state.pool, "owner@example.com").await;

        let category = database::categories::create_category_in_db(
            &state.pool,
            CreateCategoryPayload {
                name: "Work".to_string(),
                description: None,
                color: None,
            },
            &owner,
        )
        .await
        .unwrap();

        let patch = UpdateCategoryPayload {
            name: Some("Work".to_string()),
            description: Some("Same name, new description".to_string()),
            color: None,
        };

        let result = update_category(
            State(state),
            claims_for(&owner),
            Path(category.id),
            Json(patch),
        )
        .await;

        assert!(result.is_ok());
    }
}
