//! Authentication Models
//! Mission: Define user and session data structures that cannot leak secrets

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// User account as stored by the credential store.
///
/// The bcrypt hash is only populated on the credential-verification path and
/// is never serialized, so it cannot end up in a response body even if the
/// full record is returned by mistake.
#[derive(Debug, Clone, Serialize)]
pub struct User {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// The identity a verified request runs as: the stored user minus the
/// password hash. Attached to the request by the auth middleware and read
/// back by handlers via `Extension<AuthenticatedUser>`.
#[derive(Debug, Clone, Serialize)]
pub struct AuthenticatedUser {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl AuthenticatedUser {
    pub fn from_user(user: &User) -> Self {
        Self {
            id: user.id,
            name: user.name.clone(),
            email: user.email.clone(),
            created_at: user.created_at,
            updated_at: user.updated_at,
        }
    }
}

/// JWT Claims payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String, // subject (user id)
    pub iat: usize,  // issued-at timestamp
    pub exp: usize,  // expiration timestamp
}

/// Registration request body
#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub name: String,
    pub email: String,
    pub password: String,
}

/// Login request body
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Response carrying a sanitized user (register, /me)
#[derive(Debug, Serialize)]
pub struct UserResponse {
    pub success: bool,
    pub data: AuthenticatedUser,
}

/// Login response
#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub success: bool,
    pub token: String,
    pub data: AuthenticatedUser,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_user() -> User {
        let now = Utc::now();
        User {
            id: Uuid::new_v4(),
            name: "Ava".to_string(),
            email: "ava@x.com".to_string(),
            password_hash: "$2b$04$abcdefghijklmnopqrstuv".to_string(),
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_password_hash_never_serialized() {
        let user = sample_user();
        let value = serde_json::to_value(&user).unwrap();

        assert!(value.get("password_hash").is_none());
        assert_eq!(value["email"], "ava@x.com");

        let text = serde_json::to_string(&user).unwrap();
        assert!(!text.contains("$2b$"));
    }

    #[test]
    fn test_authenticated_user_from_user() {
        let user = sample_user();
        let identity = AuthenticatedUser::from_user(&user);

        assert_eq!(identity.id, user.id);
        assert_eq!(identity.name, "Ava");
        assert_eq!(identity.email, "ava@x.com");
        assert_eq!(identity.created_at, user.created_at);
    }
}
