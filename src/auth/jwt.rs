//! JWT Token Handler
//! Mission: Issue and verify stateless session tokens

use crate::auth::models::Claims;
use anyhow::{Context, Result};
use chrono::Utc;
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use tracing::debug;
use uuid::Uuid;

/// JWT handler for token operations.
///
/// Tokens are self-contained: validity is decided entirely by signature and
/// expiry at verification time, so no session table exists and no token can
/// be revoked before it expires.
pub struct JwtHandler {
    secret: String,
    ttl_secs: i64,
}

impl JwtHandler {
    pub fn new(secret: String, ttl_secs: i64) -> Self {
        Self { secret, ttl_secs }
    }

    /// Issue a signed token for a user id, expiring after the configured TTL.
    pub fn issue(&self, user_id: Uuid) -> Result<String> {
        let now = Utc::now();
        let expiration = now
            .checked_add_signed(chrono::Duration::seconds(self.ttl_secs))
            .context("Invalid timestamp")?
            .timestamp() as usize;

        let claims = Claims {
            sub: user_id.to_string(),
            iat: now.timestamp() as usize,
            exp: expiration,
        };

        debug!("Issuing token for user {}, ttl {}s", user_id, self.ttl_secs);

        encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(self.secret.as_bytes()),
        )
        .context("Failed to sign token")
    }

    /// Verify a token and extract its claims.
    ///
    /// Fails on a bad signature, structural malformation, or expiry. Zero
    /// leeway: a token is accepted up to and including its expiry instant
    /// and rejected strictly after it.
    pub fn verify(&self, token: &str) -> Result<Claims> {
        let mut validation = Validation::default();
        validation.leeway = 0;

        let decoded = decode::<Claims>(
            token,
            &DecodingKey::from_secret(self.secret.as_bytes()),
            &validation,
        )
        .context("Invalid or expired token")?;

        Ok(decoded.claims)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_handler() -> JwtHandler {
        JwtHandler::new("test-secret-key-12345".to_string(), 3600)
    }

    #[test]
    fn test_issue_and_verify() {
        let handler = test_handler();
        let user_id = Uuid::new_v4();

        let token = handler.issue(user_id).unwrap();
        assert!(!token.is_empty());

        let claims = handler.verify(&token).unwrap();
        assert_eq!(claims.sub, user_id.to_string());
        assert!(claims.exp > claims.iat);
        assert_eq!(claims.exp - claims.iat, 3600);
    }

    #[test]
    fn test_malformed_token_rejected() {
        let handler = test_handler();

        assert!(handler.verify("garbage").is_err());
        assert!(handler.verify("invalid.token.here").is_err());
        assert!(handler.verify("").is_err());
    }

    #[test]
    fn test_different_secrets_reject() {
        let handler1 = JwtHandler::new("secret1".to_string(), 3600);
        let handler2 = JwtHandler::new("secret2".to_string(), 3600);

        let token = handler1.issue(Uuid::new_v4()).unwrap();
        assert!(handler2.verify(&token).is_err());
    }

    #[test]
    fn test_expired_token_rejected() {
        let handler = test_handler();
        let now = Utc::now().timestamp() as usize;

        // Sign claims that expired a minute ago with the handler's secret.
        let claims = Claims {
            sub: Uuid::new_v4().to_string(),
            iat: now - 3660,
            exp: now - 60,
        };
        let token = encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret("test-secret-key-12345".as_bytes()),
        )
        .unwrap();

        assert!(handler.verify(&token).is_err());
    }

    #[test]
    fn test_tampered_payload_rejected() {
        let handler = test_handler();
        let token = handler.issue(Uuid::new_v4()).unwrap();

        // Swap the payload segment for a different (validly encoded) one.
        let other = handler.issue(Uuid::new_v4()).unwrap();
        let mut parts: Vec<&str> = token.split('.').collect();
        let other_parts: Vec<&str> = other.split('.').collect();
        parts[1] = other_parts[1];
        let forged = parts.join(".");

        assert!(handler.verify(&forged).is_err());
    }
}
