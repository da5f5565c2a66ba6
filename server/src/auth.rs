// Copyright (c) 2025 sbksba
//
// This software is licensed under the terms of the MIT License.
// See the LICENSE file in the project root for the full license text.
use crate::error::AppError;
use crate::AppState;

use axum::{
    extract::{FromRequestParts, Request, State},
    http::{header::AUTHORIZATION, request::Parts, StatusCode},
    middleware::Next,
    response::Response,
};
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use tracing::warn;

/// Lifetime of an issued token: 24 hours.
pub const TOKEN_TTL_SECS: i64 = 60 * 60 * 24;

/// Claims carried by a bearer token.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct Claims {
    /// Subject: the user id that scopes every subsequent operation.
    pub sub: String,
    pub email: String,
    /// Expiration timestamp (seconds since epoch).
    pub exp: i64,
    /// Issued-at timestamp.
    pub iat: i64,
}

/// Signs a token identifying `user_id` for the standard lifetime.
pub fn create_token(user_id: &str, email: &str, secret: &str) -> Result<String, AppError> {
    create_token_with_ttl(user_id, email, secret, TOKEN_TTL_SECS)
}

fn create_token_with_ttl(
    user_id: &str,
    email: &str,
    secret: &str,
    ttl_secs: i64,
) -> Result<String, AppError> {
    let now = Utc::now();
    let claims = Claims {
        sub: user_id.to_string(),
        email: email.to_string(),
        exp: (now + Duration::seconds(ttl_secs)).timestamp(),
        iat: now.timestamp(),
    };

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .map_err(|e| {
        tracing::error!("Failed to sign token: {:?}", e);
        AppError::new(StatusCode::INTERNAL_SERVER_ERROR, "An internal error occurred.")
    })
}

/// Validates a token signature and expiry, returning the decoded claims.
pub fn validate_token(token: &str, secret: &str) -> Result<Claims, AppError> {
    let mut validation = Validation::default();
    validation.leeway = 0; // No clock skew tolerance

    decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &validation,
    )
    .map(|data| data.claims)
    .map_err(|e| match e.kind() {
        jsonwebtoken::errors::ErrorKind::ExpiredSignature => {
            AppError::unauthorized("Token expired.")
        }
        _ => AppError::unauthorized("Invalid token."),
    })
}

/// Hashes a password with Argon2id and a fresh random salt.
pub fn hash_password(password: &str) -> Result<String, AppError> {
    use argon2::password_hash::SaltString;
    use argon2::{Argon2, PasswordHasher};
    use rand::rngs::OsRng;

    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|h| h.to_string())
        .map_err(|e| {
            tracing::error!("Password hashing failed: {:?}", e);
            AppError::new(StatusCode::INTERNAL_SERVER_ERROR, "An internal error occurred.")
        })
}

/// Verifies a password against a stored hash. Any parse or verification
/// failure counts as a mismatch.
pub fn verify_password(password: &str, hash: &str) -> bool {
    use argon2::password_hash::PasswordHash;
    use argon2::{Argon2, PasswordVerifier};

    PasswordHash::new(hash)
        .ok()
        .map(|parsed| {
            Argon2::default()
                .verify_password(password.as_bytes(), &parsed)
                .is_ok()
        })
        .unwrap_or(false)
}

/// Middleware guarding every task, category and user route. Rejects with 401
/// before any handler runs when the bearer credential is missing or invalid;
/// otherwise stores the decoded claims in the request extensions.
pub async fn auth_middleware(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let auth_header = request
        .headers()
        .get(AUTHORIZATION)
        .and_then(|h| h.to_str().ok());

    let token = match auth_header {
        Some(header) if header.starts_with("Bearer ") => &header[7..],
        Some(_) => {
            warn!("Rejected request with a malformed Authorization header.");
            return Err(AppError::unauthorized("Invalid Authorization header."));
        }
        None => {
            return Err(AppError::unauthorized("Authorization header required."));
        }
    };

    let claims = validate_token(token, &state.jwt_secret)?;
    request.extensions_mut().insert(claims);

    Ok(next.run(request).await)
}

/// Lets handlers take `claims: Claims` as an argument after `auth_middleware`
/// has run.
impl<S> FromRequestParts<S> for Claims
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<Claims>()
            .cloned()
            .ok_or_else(|| AppError::unauthorized("Not authenticated."))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &str = "unit-test-secret";

    #[test]
    fn test_password_hash_and_verify() {
        let hash = hash_password("correct horse battery staple").unwrap();

        assert_ne!(hash, "correct horse battery staple");
        assert!(verify_password("correct horse battery staple", &hash));
        assert!(!verify_password("wrong password", &hash));
    }

    #[test]
    fn test_verify_against_garbage_hash() {
        assert!(!verify_password("anything", "not-a-phc-string"));
    }

    #[test]
    fn test_token_round_trip() {
        let token = create_token("user-1", "user@example.com", SECRET).unwrap();
        let claims = validate_token(&token, SECRET).unwrap();

        assert_eq!(claims.sub, "user-1");
        assert_eq!(claims.email, "user@example.com");
        assert!(claims.exp > claims.iat);
    }

    #[test]
    fn test_token_rejected_with_wrong_secret() {
        let token = create_token("user-1", "user@example.com", SECRET).unwrap();

        let err = validate_token(&token, "another-secret").unwrap_err();
        assert_eq!(err.code, StatusCode::UNAUTHORIZED);
    }

    #[test]
    fn test_expired_token_rejected() {
        let token = create_token_with_ttl("user-1", "user@example.com", SECRET, -60).unwrap();

        let err = validate_token(&token, SECRET).unwrap_err();
        assert_eq!(err.code, StatusCode::UNAUTHORIZED);
        assert_eq!(err.message, "Token expired.");
    }

    #[test]
    fn test_garbage_token_rejected() {
        let err = validate_token("definitely.not.a-token", SECRET).unwrap_err();
        assert_eq!(err.code, StatusCode::UNAUTHORIZED);
    }
}
