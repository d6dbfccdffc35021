//! Auth Middleware
//!
//! For relying applications that accept tokens minted by this service.

use axum::body::Body;
use axum::extract::State;
use axum::http::{Request, header};
use axum::middleware::Next;
use axum::response::Response;
use kernel::error::app_error::AppError;

use crate::domain::token::TokenIssuer;
use crate::domain::value_object::{AppId, app_secret::AppSecret};
use crate::error::AuthError;

const OP: &str = "auth.require_session_token";

/// The relying application guarded by [`require_session_token`]
#[derive(Debug, Clone)]
pub struct TokenGuardState {
    pub app_id: AppId,
    pub secret: AppSecret,
}

impl TokenGuardState {
    pub fn new(app_id: AppId, secret: AppSecret) -> Self {
        Self { app_id, secret }
    }
}

/// Middleware that requires a valid session token for this application.
///
/// On success the decoded [`SessionClaims`](crate::domain::token::SessionClaims)
/// are available to handlers as `Extension<SessionClaims>`.
pub async fn require_session_token(
    State(state): State<TokenGuardState>,
    mut req: Request<Body>,
    next: Next,
) -> Result<Response, AppError> {
    let token = bearer_token(&req)
        .ok_or_else(|| AppError::unauthorized("missing bearer token"))?;

    let claims = TokenIssuer::new()
        .verify(token, &state.secret)
        .map_err(|e| AuthError::from_token(OP, e))?;

    // A valid signature under our secret but for another app means the
    // secret is shared; refuse it anyway.
    if claims.app_id() != state.app_id {
        tracing::debug!(
            expected = %state.app_id,
            actual = claims.app_id,
            "Token minted for a different app"
        );
        return Err(AuthError::TokenInvalid.into());
    }

    req.extensions_mut().insert(claims);

    Ok(next.run(req).await)
}

fn bearer_token(req: &Request<Body>) -> Option<&str> {
    req.headers()
        .get(header::AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|token| !token.is_empty())
}
