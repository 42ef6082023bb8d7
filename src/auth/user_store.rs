//! Credential Store
//! Mission: Own user records and password verification, never leak a hash

use crate::auth::models::{AuthenticatedUser, User};
use crate::errors::ApiError;
use anyhow::Result;
use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, ErrorCode, Row};
use tracing::info;
use uuid::Uuid;

const INVALID_CREDENTIALS: &str = "Invalid credentials";
const USER_EXISTS: &str = "User already exists";

/// User storage with SQLite backend.
///
/// Opens a connection per operation, so no lock is shared across requests.
/// Email uniqueness is enforced by the UNIQUE constraint: concurrent
/// duplicate registrations are arbitrated by the database, not by a
/// check-then-insert in application code.
pub struct UserStore {
    db_path: String,
    bcrypt_cost: u32,
}

impl UserStore {
    /// Create a new user store and initialize the schema.
    pub fn new(db_path: &str, bcrypt_cost: u32) -> Result<Self> {
        let store = Self {
            db_path: db_path.to_string(),
            bcrypt_cost,
        };
        store.init_db()?;
        Ok(store)
    }

    fn init_db(&self) -> Result<()> {
        let conn = Connection::open(&self.db_path)?;

        conn.execute(
            "CREATE TABLE IF NOT EXISTS users (
                id TEXT PRIMARY KEY,
                name TEXT NOT NULL,
                email TEXT NOT NULL UNIQUE,
                password_hash TEXT NOT NULL,
                created_at TEXT NOT NULL,
                updated_at TEXT NOT NULL
            )",
            [],
        )?;

        Ok(())
    }

    fn connect(&self) -> Result<Connection, ApiError> {
        Connection::open(&self.db_path).map_err(Into::into)
    }

    /// Hash a plaintext password with the store's configured cost.
    ///
    /// bcrypt generates a fresh random salt per call and embeds it in the
    /// hash string. Every path that persists a password field must go
    /// through here; nothing else may write `password_hash`.
    pub fn hash_password(&self, password: &str) -> Result<String, ApiError> {
        Ok(bcrypt::hash(password, self.bcrypt_cost)?)
    }

    /// Register a new user.
    ///
    /// Fails with `Conflict` if the email is already taken.
    pub fn register(&self, name: &str, email: &str, password: &str) -> Result<User, ApiError> {
        let password_hash = self.hash_password(password)?;
        let now = Utc::now();

        let user = User {
            id: Uuid::new_v4(),
            name: name.to_string(),
            email: email.to_string(),
            password_hash,
            created_at: now,
            updated_at: now,
        };

        let conn = self.connect()?;
        let inserted = conn.execute(
            "INSERT INTO users (id, name, email, password_hash, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![
                user.id.to_string(),
                user.name,
                user.email,
                user.password_hash,
                user.created_at.to_rfc3339(),
                user.updated_at.to_rfc3339(),
            ],
        );

        match inserted {
            Ok(_) => {
                info!("✅ Registered user: {}", user.email);
                Ok(user)
            }
            Err(rusqlite::Error::SqliteFailure(e, _))
                if e.code == ErrorCode::ConstraintViolation =>
            {
                Err(ApiError::Conflict(USER_EXISTS.to_string()))
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Verify an email/password pair and return the matching user.
    ///
    /// Unknown email and wrong password both fail with the same
    /// `Unauthorized` message so callers cannot enumerate accounts.
    pub fn verify_credentials(&self, email: &str, password: &str) -> Result<User, ApiError> {
        let user = self
            .find_by_email(email)?
            .ok_or(ApiError::Unauthorized(INVALID_CREDENTIALS))?;

        let valid = bcrypt::verify(password, &user.password_hash)?;
        if !valid {
            return Err(ApiError::Unauthorized(INVALID_CREDENTIALS));
        }

        Ok(user)
    }

    /// Look up a user by id, excluding the password hash.
    pub fn find_by_id(&self, id: &Uuid) -> Result<Option<AuthenticatedUser>, ApiError> {
        let conn = self.connect()?;

        let mut stmt = conn.prepare(
            "SELECT id, name, email, created_at, updated_at
             FROM users WHERE id = ?1",
        )?;

        match stmt.query_row(params![id.to_string()], row_to_identity) {
            Ok(user) => Ok(Some(user)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// Full-record lookup by email. Private: the only caller is the
    /// credential-verification path, which needs the stored hash.
    fn find_by_email(&self, email: &str) -> Result<Option<User>, ApiError> {
        let conn = self.connect()?;

        let mut stmt = conn.prepare(
            "SELECT id, name, email, password_hash, created_at, updated_at
             FROM users WHERE email = ?1",
        )?;

        match stmt.query_row(params![email], row_to_user) {
            Ok(user) => Ok(Some(user)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }
}

fn row_to_user(row: &Row) -> rusqlite::Result<User> {
    Ok(User {
        id: parse_uuid(0, row.get(0)?)?,
        name: row.get(1)?,
        email: row.get(2)?,
        password_hash: row.get(3)?,
        created_at: parse_timestamp(4, row.get(4)?)?,
        updated_at: parse_timestamp(5, row.get(5)?)?,
    })
}

fn row_to_identity(row: &Row) -> rusqlite::Result<AuthenticatedUser> {
    Ok(AuthenticatedUser {
        id: parse_uuid(0, row.get(0)?)?,
        name: row.get(1)?,
        email: row.get(2)?,
        created_at: parse_timestamp(3, row.get(3)?)?,
        updated_at: parse_timestamp(4, row.get(4)?)?,
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

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::NamedTempFile;

    // Minimum bcrypt cost keeps the suite fast.
    const TEST_COST: u32 = 4;

    fn create_test_store() -> (UserStore, NamedTempFile) {
        let temp_file = NamedTempFile::new().unwrap();
        let db_path = temp_file.path().to_str().unwrap();
        let store = UserStore::new(db_path, TEST_COST).unwrap();
        (store, temp_file)
    }

    #[test]
    fn test_register_then_verify() {
        let (store, _temp) = create_test_store();

        let user = store
            .register("Ava", "ava@x.com", "secret123")
            .unwrap();
        assert_eq!(user.name, "Ava");
        assert_eq!(user.email, "ava@x.com");
        assert_ne!(user.password_hash, "secret123");

        let verified = store.verify_credentials("ava@x.com", "secret123").unwrap();
        assert_eq!(verified.id, user.id);
        assert_eq!(verified.email, "ava@x.com");
    }

    #[test]
    fn test_duplicate_email_conflicts() {
        let (store, _temp) = create_test_store();

        store.register("Ava", "ava@x.com", "secret123").unwrap();
        let err = store
            .register("Other", "ava@x.com", "different1")
            .unwrap_err();

        match err {
            ApiError::Conflict(msg) => assert_eq!(msg, "User already exists"),
            other => panic!("Expected Conflict, got {other}"),
        }

        // Exactly one record survives for that email.
        let found = store.find_by_email("ava@x.com").unwrap().unwrap();
        assert_eq!(found.name, "Ava");
    }

    #[test]
    fn test_wrong_password_and_unknown_email_indistinguishable() {
        let (store, _temp) = create_test_store();

        store.register("Ava", "ava@x.com", "secret123").unwrap();

        let wrong_password = store
            .verify_credentials("ava@x.com", "not-the-password")
            .unwrap_err();
        let unknown_email = store
            .verify_credentials("nobody@x.com", "secret123")
            .unwrap_err();

        assert_eq!(wrong_password.to_string(), unknown_email.to_string());
        assert_eq!(wrong_password.status(), unknown_email.status());
    }

    #[test]
    fn test_find_by_id() {
        let (store, _temp) = create_test_store();

        let user = store.register("Ava", "ava@x.com", "secret123").unwrap();

        let identity = store.find_by_id(&user.id).unwrap().unwrap();
        assert_eq!(identity.id, user.id);
        assert_eq!(identity.email, "ava@x.com");

        assert!(store.find_by_id(&Uuid::new_v4()).unwrap().is_none());
    }

    #[test]
    fn test_salts_are_unique_per_user() {
        let (store, _temp) = create_test_store();

        let a = store.register("A", "a@x.com", "samepassword").unwrap();
        let b = store.register("B", "b@x.com", "samepassword").unwrap();

        assert_ne!(a.password_hash, b.password_hash);
    }
}
