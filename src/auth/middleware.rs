//! Authorization Gate
//! Mission: Resolve a bearer token to a concrete user or reject the request

use crate::auth::api::AuthState;
use crate::errors::ApiError;
use axum::{
    extract::{Request, State},
    http::{header, HeaderMap},
    middleware::Next,
    response::Response,
};
use uuid::Uuid;

const NOT_AUTHORIZED: &str = "Not authorized to access this route";

/// Gate middleware for protected routes.
///
/// Extracts the bearer token, verifies it, resolves the subject against the
/// credential store, and attaches the resolved identity to the request. Any
/// failure short-circuits with the same 401 before a handler runs: a missing
/// header, a bad scheme, a forged or expired token, and a user deleted after
/// issuance are deliberately indistinguishable to the caller.
pub async fn auth_middleware(
    State(state): State<AuthState>,
    mut req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let token = bearer_token(req.headers())
        .map(|t| t.to_string())
        .ok_or(ApiError::Unauthorized(NOT_AUTHORIZED))?;

    let claims = state
        .jwt_handler
        .verify(&token)
        .map_err(|_| ApiError::Unauthorized(NOT_AUTHORIZED))?;

    let user_id = Uuid::parse_str(&claims.sub)
        .map_err(|_| ApiError::Unauthorized(NOT_AUTHORIZED))?;

    let user = state
        .user_store
        .find_by_id(&user_id)?
        .ok_or(ApiError::Unauthorized(NOT_AUTHORIZED))?;

    req.extensions_mut().insert(user);

    Ok(next.run(req).await)
}

/// Extract the token from an `Authorization: Bearer <token>` header.
///
/// Only the Bearer scheme is accepted; any other scheme or an absent header
/// yields `None`.
fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn headers_with(value: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(header::AUTHORIZATION, HeaderValue::from_str(value).unwrap());
        headers
    }

    #[test]
    fn test_bearer_token_extracted() {
        let headers = headers_with("Bearer abc.def.ghi");
        assert_eq!(bearer_token(&headers), Some("abc.def.ghi"));
    }

    #[test]
    fn test_missing_header_rejected() {
        let headers = HeaderMap::new();
        assert_eq!(bearer_token(&headers), None);
    }

    #[test]
    fn test_other_schemes_rejected() {
        assert_eq!(bearer_token(&headers_with("Basic dXNlcjpwYXNz")), None);
        assert_eq!(bearer_token(&headers_with("Token abc")), None);
        assert_eq!(bearer_token(&headers_with("bearer abc")), None);
        assert_eq!(bearer_token(&headers_with("Bearer")), None);
    }
}
