// Copyright (c) 2025 sbksba
//
// This software is licensed under the terms of the MIT License.
// See the LICENSE file in the project root for the full license text.
pub mod auth;
pub mod database;
pub mod error;
pub mod handlers;
pub mod metrics;
pub mod routes;

use sqlx::SqlitePool;

/// Shared application state injected into every handler.
#[derive(Clone)]
pub struct AppState {
    pub pool: SqlitePool,
    /// Secret used to sign and verify bearer tokens.
    pub jwt_secret: String,
}
