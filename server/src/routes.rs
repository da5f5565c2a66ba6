// Copyright (c) 2025 sbksba
//
// This software is licensed under the terms of the MIT License.
// See the LICENSE file in the project root for the full license text.
use crate::auth;
use crate::handlers;
use crate::AppState;

use axum::{
    middleware,
    routing::{get, patch, post},
    Router,
};

/// Creates and configures the application router.
///
/// Registration and login are public; every other route sits behind the
/// bearer-token middleware and never reaches a handler without a verified
/// identity.
pub fn create_router(state: AppState) -> Router {
    let public_routes = Router::new()
        .route("/auth/register", post(handlers::auth::register))
        .route("/auth/login", post(handlers::auth::login));

    let protected_routes = Router::new()
        .route(
            "/tasks",
            get(handlers::tasks::list_tasks).post(handlers::tasks::create_task),
        )
        .route("/tasks/archived", get(handlers::tasks::list_archived_tasks))
        .route("/tasks/metrics", get(handlers::tasks::task_metrics))
        .route(
            "/tasks/{id}",
            get(handlers::tasks::get_task)
                .patch(handlers::tasks::update_task)
                .delete(handlers::tasks::delete_task),
        )
        .route("/tasks/{id}/archive", patch(handlers::tasks::archive_task))
        .route(
            "/tasks/{id}/unarchive",
            patch(handlers::tasks::unarchive_task),
        )
        .route(
            "/categories",
            get(handlers::categories::list_categories).post(handlers::categories::create_category),
        )
        .route(
            "/categories/{id}",
            get(handlers::categories::get_category)
                .patch(handlers::categories::update_category)
                .delete(handlers::categories::delete_category),
        )
        .route(
            "/users/me",
            get(handlers::users::get_me)
                .patch(handlers::users::update_me)
                .delete(handlers::users::delete_me),
        )
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            auth::auth_middleware,
        ));

    public_routes.merge(protected_routes).with_state(state)
}
