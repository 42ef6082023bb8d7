//! Todo Models

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A todo item owned by a single user.
#[derive(Debug, Clone, Serialize)]
pub struct Todo {
    pub id: Uuid,
    pub user_id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub completed: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Create request body
#[derive(Debug, Deserialize)]
pub struct CreateTodoRequest {
    pub title: String,
    pub description: Option<String>,
}

/// Update request body (full replacement)
#[derive(Debug, Deserialize)]
pub struct UpdateTodoRequest {
    pub title: String,
    pub description: Option<String>,
    pub completed: bool,
}

/// Response carrying a single todo
#[derive(Debug, Serialize)]
pub struct TodoResponse {
    pub success: bool,
    pub data: Todo,
}

/// Response carrying the caller's todo list
#[derive(Debug, Serialize)]
pub struct TodosResponse {
    pub success: bool,
    pub data: Vec<Todo>,
}
