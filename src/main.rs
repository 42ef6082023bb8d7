//! Taskbox - Multi-tenant Todo API
//! Mission: Token-authenticated task tracking, one private list per user

use anyhow::{Context, Result};
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use taskbox_backend::{
    auth::{AuthState, JwtHandler, UserStore},
    config::Config,
    routes::create_router,
    todos::{TodoState, TodoStore},
};

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();

    let config = Config::from_env()?;

    info!("🚀 Taskbox API starting");

    let user_store = Arc::new(UserStore::new(&config.database_path, config.bcrypt_cost)?);
    let todo_store = Arc::new(TodoStore::new(&config.database_path)?);
    let jwt_handler = Arc::new(JwtHandler::new(
        config.jwt_secret.clone(),
        config.token_ttl_secs,
    ));

    info!("🔐 Stores initialized at: {}", config.database_path);

    let auth_state = AuthState::new(user_store, jwt_handler);
    let todo_state = TodoState::new(todo_store);

    let app = create_router(auth_state, todo_state);

    let addr = format!("0.0.0.0:{}", config.port);
    let listener = TcpListener::bind(&addr).await?;
    info!("🎯 API server listening on {}", addr);

    axum::serve(listener, app).await.context("Server error")?;

    Ok(())
}

/// Initialize tracing from RUST_LOG, with a sane default filter.
fn init_tracing() {
    // dotenv must run before the EnvFilter reads RUST_LOG.
    dotenv::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "taskbox_backend=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
}
