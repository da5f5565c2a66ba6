// Copyright (c) 2025 sbksba
//
// This software is licensed under the terms of the MIT License.
// See the LICENSE file in the project root for the full license text.
use crate::auth;
use crate::database;
use crate::error::{is_unique_violation, AppError};
use crate::AppState;

use axum::{
    extract::{Json, State},
    http::StatusCode,
};
use tasktrack_common::{AuthResponse, AuthUser, LoginPayload, RegisterPayload, User};
use tracing::{info, warn};

/// Minimal shape check; real mailbox validation is the mail server's problem.
pub(crate) fn validate_email(email: &str) -> Result<(), AppError> {
    let looks_like_address = email.contains('@') && !email.starts_with('@') && !email.ends_with('@');
    if email.is_empty() || !looks_like_address {
        return Err(AppError::bad_request("A valid e-mail address is required."));
    }
    Ok(())
}

pub(crate) fn validate_password(password: &str) -> Result<(), AppError> {
    if password.len() < 6 {
        return Err(AppError::bad_request(
            "Password must be at least 6 characters long.",
        ));
    }
    Ok(())
}

/// Handler for registering a new account. Issues a token right away so the
/// client lands in a logged-in session.
pub async fn register(
    State(state): State<AppState>,
    Json(payload): Json<RegisterPayload>,
) -> Result<(StatusCode, Json<AuthResponse>), AppError> {
    validate_email(&payload.email)?;
    validate_password(&payload.password)?;

    // Friendly pre-check; the UNIQUE constraint below is the authoritative
    // guard against a concurrent registration with the same address.
    if database::users::find_user_by_email(&state.pool, &payload.email)
        .await?
        .is_some()
    {
        return Err(AppError::conflict("This e-mail is already registered."));
    }

    let password_hash = auth::hash_password(&payload.password)?;

    let user: User =
        match database::users::create_user_in_db(&state.pool, &payload.email, &password_hash).await
        {
            Ok(user) => user,
            Err(err) if is_unique_violation(&err) => {
                return Err(AppError::conflict("This e-mail is already registered."));
            }
            Err(err) => return Err(err.into()),
        };

    let access_token = auth::create_token(&user.id, &user.email, &state.jwt_secret)?;

    info!("User registered successfully with ID: {}", user.id);

    Ok((
        StatusCode::CREATED,
        Json(AuthResponse {
            access_token,
            user: AuthUser {
                id: user.id,
                email: user.email,
            },
        }),
    ))
}

/// Handler for logging in. Unknown address and wrong password produce the
/// same answer so the endpoint does not reveal which e-mails exist.
pub async fn login(
    State(state): State<AppState>,
    Json(payload): Json<LoginPayload>,
) -> Result<Json<AuthResponse>, AppError> {
    let record = database::users::find_user_by_email(&state.pool, &payload.email).await?;

    let Some(record) = record else {
        warn!("Login failed: unknown e-mail.");
        return Err(AppError::unauthorized("Invalid credentials."));
    };

    if !auth::verify_password(&payload.password, &record.password) {
        warn!("Login failed: wrong password for user {}", record.id);
        return Err(AppError::unauthorized("Invalid credentials."));
    }

    let access_token = auth::create_token(&record.id, &record.email, &state.jwt_secret)?;

    info!("User {} logged in.", record.id);

    Ok(Json(AuthResponse {
        access_token,
        user: AuthUser {
            id: record.id,
            email: record.email,
        },
    }))
}
