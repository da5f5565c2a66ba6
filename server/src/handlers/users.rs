// Copyright (c) 2025 sbksba
//
// This software is licensed under the terms of the MIT License.
// See the LICENSE file in the project root for the full license text.
use crate::auth::{self, Claims};
use crate::database;
use crate::error::{is_unique_violation, AppError};
use crate::AppState;

use axum::{
    extract::{Json, State},
    http::StatusCode,
};
use tasktrack_common::{UpdateUserPayload, User};
use tracing::info;

use super::auth::{validate_email, validate_password};

/// Handler for reading the authenticated account.
pub async fn get_me(
    State(state): State<AppState>,
    claims: Claims,
) -> Result<Json<User>, AppError> {
    let user = database::users::find_user_by_id(&state.pool, &claims.sub)
        .await?
        .ok_or_else(|| AppError::not_found("User not found."))?;

    Ok(Json(user))
}

/// Handler for editing the authenticated account. Only the e-mail and the
/// password can change; a new password is re-hashed before storage.
pub async fn update_me(
    State(state): State<AppState>,
    claims: Claims,
    Json(payload): Json<UpdateUserPayload>,
) -> Result<Json<User>, AppError> {
    if let Some(email) = &payload.email {
        validate_email(email)?;

        if email != &claims.email {
            if let Some(existing) = database::users::find_user_by_email(&state.pool, email).await? {
                if existing.id != claims.sub {
                    return Err(AppError::conflict("This e-mail is already registered."));
                }
            }
        }
    }

    let password_hash = match &payload.password {
        Some(password) => {
            validate_password(password)?;
            Some(auth::hash_password(password)?)
        }
        None => None,
    };

    let user = match database::users::update_user_in_db(
        &state.pool,
        &claims.sub,
        payload.email.as_deref(),
        password_hash.as_deref(),
    )
    .await
    {
        Ok(Some(user)) => user,
        Ok(None) => return Err(AppError::not_found("User not found.")),
        Err(err) if is_unique_violation(&err) => {
            return Err(AppError::conflict("This e-mail is already registered."));
        }
        Err(err) => return Err(err.into()),
    };

    info!("User {} updated their account.", user.id);

    Ok(Json(user))
}

/// Handler for deleting the authenticated account. Owned tasks and categories
/// are removed by the cascade rules in the schema.
pub async fn delete_me(
    State(state): State<AppState>,
    claims: Claims,
) -> Result<StatusCode, AppError> {
    let deleted = database::users::delete_user_in_db(&state.pool, &claims.sub).await?;

    if deleted {
        info!("User {} deleted their account.", claims.sub);
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::not_found("User not found."))
    }
}
