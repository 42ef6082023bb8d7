//! API Error Taxonomy
//! Mission: One closed set of classified failures with uniform responses

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

/// Classified API errors. Every variant maps to a stable status code and a
/// message that is safe to expose to the caller.
#[derive(Debug)]
pub enum ApiError {
    /// Malformed or missing input (400).
    Validation(String),
    /// Missing, invalid, or expired credentials (401).
    Unauthorized(&'static str),
    /// Authenticated but disallowed (403). Reserved for future ownership
    /// checks beyond the per-user row scoping.
    Forbidden(&'static str),
    /// Referenced resource absent or not owned by the caller (404).
    NotFound(String),
    /// Uniqueness violation (409).
    Conflict(String),
    /// Unclassified failure (500). The wrapped error is logged server-side
    /// and never reaches the response body.
    Internal(anyhow::Error),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Validation(_) => StatusCode::BAD_REQUEST,
            ApiError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            ApiError::Forbidden(_) => StatusCode::FORBIDDEN,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Conflict(_) => StatusCode::CONFLICT,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = match &self {
            ApiError::Validation(msg) => msg.clone(),
            ApiError::Unauthorized(msg) => (*msg).to_string(),
            ApiError::Forbidden(msg) => (*msg).to_string(),
            ApiError::NotFound(msg) => msg.clone(),
            ApiError::Conflict(msg) => msg.clone(),
            ApiError::Internal(err) => {
                tracing::error!("Internal error: {:#}", err);
                "Internal server error".to_string()
            }
        };

        let body = Json(json!({
            "success": false,
            "message": message,
        }));

        (status, body).into_response()
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ApiError::Validation(msg) => write!(f, "{msg}"),
            ApiError::Unauthorized(msg) => write!(f, "{msg}"),
            ApiError::Forbidden(msg) => write!(f, "{msg}"),
            ApiError::NotFound(msg) => write!(f, "{msg}"),
            ApiError::Conflict(msg) => write!(f, "{msg}"),
            ApiError::Internal(err) => write!(f, "{err}"),
        }
    }
}

impl std::error::Error for ApiError {}

impl From<anyhow::Error> for ApiError {
    fn from(err: anyhow::Error) -> Self {
        ApiError::Internal(err)
    }
}

impl From<rusqlite::Error> for ApiError {
    fn from(err: rusqlite::Error) -> Self {
        ApiError::Internal(err.into())
    }
}

impl From<bcrypt::BcryptError> for ApiError {
    fn from(err: bcrypt::BcryptError) -> Self {
        ApiError::Internal(err.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        assert_eq!(
            ApiError::Validation("bad".into()).status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ApiError::Unauthorized("no").status(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(ApiError::Forbidden("no").status(), StatusCode::FORBIDDEN);
        assert_eq!(
            ApiError::NotFound("gone".into()).status(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            ApiError::Conflict("dup".into()).status(),
            StatusCode::CONFLICT
        );
        assert_eq!(
            ApiError::Internal(anyhow::anyhow!("boom")).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_error_responses() {
        let conflict = ApiError::Conflict("User already exists".into()).into_response();
        assert_eq!(conflict.status(), StatusCode::CONFLICT);

        let internal = ApiError::Internal(anyhow::anyhow!("db exploded")).into_response();
        assert_eq!(internal.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_anyhow_conversion() {
        let err: ApiError = anyhow::anyhow!("unexpected").into();
        match err {
            ApiError::Internal(_) => (),
            _ => panic!("Expected Internal error"),
        }
    }

    #[test]
    fn test_internal_message_not_leaked() {
        // Display shows the underlying error for server-side logs, but the
        // classified response message is the generic one.
        let err = ApiError::Internal(anyhow::anyhow!("secret driver detail"));
        assert_eq!(err.to_string(), "secret driver detail");
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
