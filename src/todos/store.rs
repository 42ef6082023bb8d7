//! Todo Storage
//! Mission: SQLite-backed todo persistence scoped by owner

use crate::errors::ApiError;
use crate::todos::models::Todo;
use anyhow::Result;
use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, Row};
use uuid::Uuid;

const TODO_NOT_FOUND: &str = "Todo not found";

/// Todo storage with SQLite backend.
///
/// Every query filters by `(id, user_id)`, so a todo owned by another user
/// is indistinguishable from one that does not exist.
pub struct TodoStore {
    db_path: String,
}

impl TodoStore {
    /// Create a new todo store and initialize the schema.
    pub fn new(db_path: &str) -> Result<Self> {
        let store = Self {
            db_path: db_path.to_string(),
        };
        store.init_db()?;
        Ok(store)
    }

    fn init_db(&self) -> Result<()> {
        let conn = Connection::open(&self.db_path)?;

        conn.execute(
            "CREATE TABLE IF NOT EXISTS todos (
                id TEXT PRIMARY KEY,
                user_id TEXT NOT NULL,
                title TEXT NOT NULL,
                description TEXT,
                completed INTEGER NOT NULL DEFAULT 0,
                created_at TEXT NOT NULL,
                updated_at TEXT NOT NULL,
                FOREIGN KEY (user_id) REFERENCES users(id)
            )",
            [],
        )?;

        conn.execute(
            "CREATE INDEX IF NOT EXISTS idx_todos_user ON todos(user_id, created_at DESC)",
            [],
        )?;

        Ok(())
    }

    fn connect(&self) -> Result<Connection, ApiError> {
        Connection::open(&self.db_path).map_err(Into::into)
    }

    /// Create a todo for a user.
    pub fn create(
        &self,
        user_id: &Uuid,
        title: &str,
        description: Option<&str>,
    ) -> Result<Todo, ApiError> {
        let now = Utc::now();
        let todo = Todo {
            id: Uuid::new_v4(),
            user_id: *user_id,
            title: title.to_string(),
            description: description.map(str::to_string),
            completed: false,
            created_at: now,
            updated_at: now,
        };

        let conn = self.connect()?;
        conn.execute(
            "INSERT INTO todos (id, user_id, title, description, completed, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            params![
                todo.id.to_string(),
                todo.user_id.to_string(),
                todo.title,
                todo.description,
                todo.completed,
                todo.created_at.to_rfc3339(),
                todo.updated_at.to_rfc3339(),
            ],
        )?;

        Ok(todo)
    }

    /// List a user's todos, newest first.
    pub fn list(&self, user_id: &Uuid) -> Result<Vec<Todo>, ApiError> {
        let conn = self.connect()?;

        let mut stmt = conn.prepare(
            "SELECT id, user_id, title, description, completed, created_at, updated_at
             FROM todos WHERE user_id = ?1 ORDER BY created_at DESC",
        )?;

        let todos = stmt
            .query_map(params![user_id.to_string()], row_to_todo)?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(todos)
    }

    /// Fetch one of a user's todos by id.
    pub fn get(&self, id: &Uuid, user_id: &Uuid) -> Result<Todo, ApiError> {
        let conn = self.connect()?;

        let mut stmt = conn.prepare(
            "SELECT id, user_id, title, description, completed, created_at, updated_at
             FROM todos WHERE id = ?1 AND user_id = ?2",
        )?;

        match stmt.query_row(params![id.to_string(), user_id.to_string()], row_to_todo) {
            Ok(todo) => Ok(todo),
            Err(rusqlite::Error::QueryReturnedNoRows) => {
                Err(ApiError::NotFound(TODO_NOT_FOUND.to_string()))
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Replace a todo's mutable fields.
    pub fn update(
        &self,
        id: &Uuid,
        user_id: &Uuid,
        title: &str,
        description: Option<&str>,
        completed: bool,
    ) -> Result<Todo, ApiError> {
        let conn = self.connect()?;

        let updated = conn.execute(
            "UPDATE todos SET title = ?1, description = ?2, completed = ?3, updated_at = ?4
             WHERE id = ?5 AND user_id = ?6",
            params![
                title,
                description,
                completed,
                Utc::now().to_rfc3339(),
                id.to_string(),
                user_id.to_string(),
            ],
        )?;

        if updated == 0 {
            return Err(ApiError::NotFound(TODO_NOT_FOUND.to_string()));
        }

        self.get(id, user_id)
    }

    /// Delete one of a user's todos.
    pub fn delete(&self, id: &Uuid, user_id: &Uuid) -> Result<(), ApiError> {
        let conn = self.connect()?;

        let deleted = conn.execute(
            "DELETE FROM todos WHERE id = ?1 AND user_id = ?2",
            params![id.to_string(), user_id.to_string()],
        )?;

        if deleted == 0 {
            return Err(ApiError::NotFound(TODO_NOT_FOUND.to_string()));
        }

        Ok(())
    }
}

fn row_to_todo(row: &Row) -> rusqlite::Result<Todo> {
    Ok(Todo {
        id: parse_uuid(0, row.get(0)?)?,
        user_id: parse_uuid(1, row.get(1)?)?,
        title: row.get(2)?,
        description: row.get(3)?,
        completed: row.get(4)?,
        created_at: parse_timestamp(5, row.get(5)?)?,
        updated_at: parse_timestamp(6, row.get(6)?)?,
    })
}

fn parse_uuid(idx: usize, value: String) -> rusqlite::Result<Uuid> {
    Uuid::parse_str(&value).map_err(|e| {
        rusqlite::Error::FromSqlConversionFailure(idx, rusqlite::types::Type::Text, Box::new(e))
    })
}

fn parse_timestamp(idx: usize, value: String) -> rusqlite::Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(&value)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| {
            rusqlite::Error::FromSqlConversionFailure(idx, rusqlite::types::Type::Text, Box::new(e))
        })
}
