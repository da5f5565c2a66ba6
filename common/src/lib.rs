// Copyright (c) 2025 sbksba
//
// This software is licensed under the terms of the MIT License.
// See the LICENSE file in the project root for the full license text.
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Represents a task within the system.
///
/// Database columns are snake_case; the JSON representation consumed by the
/// client is camelCase, hence the `rename_all` attribute.
#[derive(Serialize, Deserialize, Debug, Clone, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: String,

    pub title: String,

    pub description: Option<String>,

    pub is_completed: bool,

    pub is_archived: bool,

    // We use NaiveDate because the planned date is a calendar day,
    // without a timezone.
    pub planned_date: Option<NaiveDate>,

    /// Set by the server when the task transitions to completed,
    /// cleared when it transitions back.
    pub completion_date: Option<DateTime<Utc>>,

    /// Owner of the task. Never changes after creation.
    pub user_id: String,

    /// Optional reference to a category owned by the same user.
    pub category_id: Option<String>,

    pub created_at: DateTime<Utc>,

    pub updated_at: DateTime<Utc>,
}

/// A user-owned grouping of tasks.
#[derive(Serialize, Deserialize, Debug, Clone, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    pub id: String,

    /// Unique per owning user.
    pub name: String,

    pub description: Option<String>,

    /// Optional display hint for the client (e.g. "#3B82F6").
    pub color: Option<String>,

    pub user_id: String,

    pub created_at: DateTime<Utc>,
}

/// Public view of an account, safe to return to callers.
#[derive(Serialize, Deserialize, Debug, Clone, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: String,

    pub email: String,

    pub created_at: DateTime<Utc>,

    pub updated_at: DateTime<Utc>,
}

/// Internal account row including the password hash. Used by the server for
/// credential checks and never serialized into a response.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct UserWithPassword {
    pub id: String,
    pub email: String,
    pub password: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<UserWithPassword> for User {
    /// Strips the password hash so it cannot leak into an API response.
    fn from(record: UserWithPassword) -> Self {
        User {
            id: record.id,
            email: record.email,
            created_at: record.created_at,
            updated_at: record.updated_at,
        }
    }
}

/// Structure used to receive task creation data from the API.
/// It's a good practice to separate database models (`Task`)
/// from API models (`CreateTaskPayload`), as they may have different fields.
#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct CreateTaskPayload {
    pub title: String,
    pub description: Option<String>,
    /// Defaults to false when omitted.
    pub is_completed: Option<bool>,
    /// Defaults to false when omitted.
    pub is_archived: Option<bool>,
    pub planned_date: Option<NaiveDate>,
    pub category_id: Option<String>,
}

/// Partial update for a task. A missing or `null` field means "leave the
/// stored value alone"; there is no way to clear a field through this payload.
#[derive(Deserialize, Debug, Default)]
#[serde(rename_all = "camelCase")]
pub struct UpdateTaskPayload {
    pub title: Option<String>,
    pub description: Option<String>,
    pub is_completed: Option<bool>,
    pub planned_date: Option<NaiveDate>,
    pub category_id: Option<String>,
}

#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct CreateCategoryPayload {
    pub name: String,
    pub description: Option<String>,
    pub color: Option<String>,
}

/// Partial update for a category; same "null means no change" convention as
/// task updates.
#[derive(Deserialize, Debug, Default)]
#[serde(rename_all = "camelCase")]
pub struct UpdateCategoryPayload {
    pub name: Option<String>,
    pub description: Option<String>,
    pub color: Option<String>,
}

#[derive(Deserialize, Debug)]
pub struct RegisterPayload {
    pub email: String,
    pub password: String,
}

#[derive(Deserialize, Debug)]
pub struct LoginPayload {
    pub email: String,
    pub password: String,
}

/// Partial update for the authenticated account.
#[derive(Deserialize, Debug)]
pub struct UpdateUserPayload {
    pub email: Option<String>,
    pub password: Option<String>,
}

/// Identity subset echoed back alongside a fresh token.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct AuthUser {
    pub id: String,
    pub email: String,
}

/// Response to a successful registration or login.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct AuthResponse {
    pub access_token: String,
    pub user: AuthUser,
}

/// Productivity metrics computed over a user's active (non-archived) tasks.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TaskMetrics {
    pub total_tasks: usize,
    pub completed_tasks: usize,
    pub pending_tasks: usize,
    /// Percentage, rounded to two decimals. 0 when there are no tasks.
    pub completion_rate: f64,
    /// Completed tasks whose completion day did not exceed their planned date,
    /// among tasks that have a planned date at all.
    pub completed_on_time: usize,
    /// Percentage, rounded to two decimals. 0 when no task has a planned date.
    pub on_time_rate: f64,
}
