//! Todo API Endpoints
//! Mission: CRUD handlers that trust only the gate-resolved identity

use crate::auth::models::AuthenticatedUser;
use crate::errors::ApiError;
use crate::todos::{
    models::{CreateTodoRequest, TodoResponse, TodosResponse, UpdateTodoRequest},
    store::TodoStore,
};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    Extension, Json,
};
use std::sync::Arc;
use uuid::Uuid;

/// Shared todo state
#[derive(Clone)]
pub struct TodoState {
    pub todo_store: Arc<TodoStore>,
}

impl TodoState {
    pub fn new(todo_store: Arc<TodoStore>) -> Self {
        Self { todo_store }
    }
}

/// Create todo - POST /api/todos
pub async fn create_todo(
    State(state): State<TodoState>,
    Extension(user): Extension<AuthenticatedUser>,
    Json(payload): Json<CreateTodoRequest>,
) -> Result<(StatusCode, Json<TodoResponse>), ApiError> {
    if payload.title.trim().is_empty() {
        return Err(ApiError::Validation("Title is required".to_string()));
    }

    let todo = state.todo_store.create(
        &user.id,
        payload.title.trim(),
        payload.description.as_deref(),
    )?;

    Ok((
        StatusCode::CREATED,
        Json(TodoResponse {
            success: true,
            data: todo,
        }),
    ))
}

/// List todos - GET /api/todos
pub async fn list_todos(
    State(state): State<TodoState>,
    Extension(user): Extension<AuthenticatedUser>,
) -> Result<Json<TodosResponse>, ApiError> {
    let todos = state.todo_store.list(&user.id)?;

    Ok(Json(TodosResponse {
        success: true,
        data: todos,
    }))
}

/// Get todo - GET /api/todos/:id
pub async fn get_todo(
    State(state): State<TodoState>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(id): Path<String>,
) -> Result<Json<TodoResponse>, ApiError> {
    let id = parse_todo_id(&id)?;
    let todo = state.todo_store.get(&id, &user.id)?;

    Ok(Json(TodoResponse {
        success: true,
        data: todo,
    }))
}

/// Update todo - PUT /api/todos/:id
pub async fn update_todo(
    State(state): State<TodoState>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(id): Path<String>,
    Json(payload): Json<UpdateTodoRequest>,
) -> Result<Json<TodoResponse>, ApiError> {
    if payload.title.trim().is_empty() {
        return Err(ApiError::Validation("Title is required".to_string()));
    }

    let id = parse_todo_id(&id)?;
    let todo = state.todo_store.update(
        &id,
        &user.id,
        payload.title.trim(),
        payload.description.as_deref(),
        payload.completed,
    )?;

    Ok(Json(TodoResponse {
        success: true,
        data: todo,
    }))
}

/// Delete todo - DELETE /api/todos/:id
pub async fn delete_todo(
    State(state): State<TodoState>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    let id = parse_todo_id(&id)?;
    state.todo_store.delete(&id, &user.id)?;

    Ok(StatusCode::NO_CONTENT)
}

fn parse_todo_id(id: &str) -> Result<Uuid, ApiError> {
    Uuid::parse_str(id).map_err(|_| ApiError::Validation("Invalid todo id".to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_todo_id() {
        let id = Uuid::new_v4();
        assert_eq!(parse_todo_id(&id.to_string()).unwrap(), id);

        let err = parse_todo_id("not-a-uuid").unwrap_err();
        assert!(matches!(err, ApiError::Validation(_)));
    }
}
