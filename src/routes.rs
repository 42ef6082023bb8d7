//! Router assembly.
//!
//! Public routes (register, login, health) are reachable without
//! credentials; everything operating on user-owned resources sits behind the
//! auth middleware as a route layer, so no protected handler ever runs for
//! an unverified request.

use crate::auth::{api as auth_api, auth_middleware, AuthState};
use crate::middleware::request_logging;
use crate::todos::{api as todos_api, TodoState};
use axum::{
    middleware,
    response::Json,
    routing::{get, post},
    Router,
};
use serde::Serialize;
use tower_http::cors::CorsLayer;

/// Create the API router.
pub fn create_router(auth_state: AuthState, todo_state: TodoState) -> Router {
    let auth_routes = Router::new()
        .route("/api/auth/register", post(auth_api::register))
        .route("/api/auth/login", post(auth_api::login))
        .with_state(auth_state.clone());

    let protected_routes = Router::new()
        .route("/api/auth/me", get(auth_api::current_user))
        .route(
            "/api/todos",
            get(todos_api::list_todos).post(todos_api::create_todo),
        )
        .route(
            "/api/todos/:id",
            get(todos_api::get_todo)
                .put(todos_api::update_todo)
                .delete(todos_api::delete_todo),
        )
        .route_layer(middleware::from_fn_with_state(auth_state, auth_middleware))
        .with_state(todo_state);

    let public_routes = Router::new().route("/health", get(health_check));

    Router::new()
        .merge(public_routes)
        .merge(protected_routes)
        .merge(auth_routes)
        .layer(middleware::from_fn(request_logging))
        .layer(CorsLayer::permissive())
}

/// Health check endpoint
async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

#[derive(Serialize)]
struct HealthResponse {
    status: String,
    version: String,
}
