//! Auth Router

use std::sync::Arc;
use std::time::Duration;

use axum::{Router, routing::post};

use crate::application::config::AuthConfig;
use crate::domain::repository::{AppProvider, UserProvider, UserSaver};
use crate::infra::postgres::PgAuthRepository;
use crate::presentation::handlers::{self, AuthAppState};

/// Create the Auth router backed by PostgreSQL
pub fn auth_router(repo: PgAuthRepository, config: AuthConfig, request_timeout: Duration) -> Router {
    auth_router_generic(Arc::new(repo), config, request_timeout)
}

/// Create an Auth router for any repository implementing every storage port
pub fn auth_router_generic<R>(repo: Arc<R>, config: AuthConfig, request_timeout: Duration) -> Router
where
    R: UserSaver + UserProvider + AppProvider + Send + Sync + 'static,
{
    let state = AuthAppState::new(repo, Arc::new(config), request_timeout);

    Router::new()
        .route("/register", post(handlers::register::<R>))
        .route("/login", post(handlers::login::<R>))
        .route("/is-admin", post(handlers::is_admin::<R>))
        .with_state(state)
}
