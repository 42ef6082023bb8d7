//! Authentication API Endpoints
//! Mission: Registration, login, and current-user lookup

use crate::auth::{
    jwt::JwtHandler,
    models::{
        AuthenticatedUser, LoginRequest, LoginResponse, RegisterRequest, UserResponse,
    },
    user_store::UserStore,
};
use crate::errors::ApiError;
use axum::{extract::State, http::StatusCode, Extension, Json};
use std::sync::Arc;
use tracing::{info, warn};

/// Shared auth state
#[derive(Clone)]
pub struct AuthState {
    pub user_store: Arc<UserStore>,
    pub jwt_handler: Arc<JwtHandler>,
}

impl AuthState {
    pub fn new(user_store: Arc<UserStore>, jwt_handler: Arc<JwtHandler>) -> Self {
        Self {
            user_store,
            jwt_handler,
        }
    }
}

/// Register endpoint - POST /api/auth/register
pub async fn register(
    State(state): State<AuthState>,
    Json(payload): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<UserResponse>), ApiError> {
    validate_registration(&payload)?;

    let user = state
        .user_store
        .register(payload.name.trim(), &payload.email, &payload.password)?;

    Ok((
        StatusCode::CREATED,
        Json(UserResponse {
            success: true,
            data: AuthenticatedUser::from_user(&user),
        }),
    ))
}

/// Login endpoint - POST /api/auth/login
pub async fn login(
    State(state): State<AuthState>,
    Json(payload): Json<LoginRequest>,
) -> Result<Json<LoginResponse>, ApiError> {
    let user = match state
        .user_store
        .verify_credentials(&payload.email, &payload.password)
    {
        Ok(user) => user,
        Err(err) => {
            if matches!(err, ApiError::Unauthorized(_)) {
                warn!("❌ Failed login attempt: {}", payload.email);
            }
            return Err(err);
        }
    };

    let token = state.jwt_handler.issue(user.id)?;

    info!("🔐 Login successful: {}", user.email);

    Ok(Json(LoginResponse {
        success: true,
        token,
        data: AuthenticatedUser::from_user(&user),
    }))
}

/// Current user endpoint - GET /api/auth/me
///
/// Runs behind the auth middleware, so the identity has already been
/// verified and resolved against the store.
pub async fn current_user(
    Extension(user): Extension<AuthenticatedUser>,
) -> Json<UserResponse> {
    Json(UserResponse {
        success: true,
        data: user,
    })
}

fn validate_registration(payload: &RegisterRequest) -> Result<(), ApiError> {
    if payload.name.trim().is_empty() {
        return Err(ApiError::Validation("Name is required".to_string()));
    }
    if payload.email.trim().is_empty() || !payload.email.contains('@') {
        return Err(ApiError::Validation("A valid email is required".to_string()));
    }
    if payload.password.len() < 8 {
        return Err(ApiError::Validation(
            "Password must be at least 8 characters".to_string(),
        ));
    }
    Ok(())
}
