//! HTTP Handlers
//!
//! Request validation happens here; the Authentication Service only ever
//! sees well-formed input. Every call into the service runs under the
//! configured deadline.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use axum::Json;
use axum::extract::State;
use axum::extract::rejection::JsonRejection;
use kernel::error::app_error::{AppError, AppResult};
use platform::password::{ClearTextPassword, check_policy};

use crate::application::config::AuthConfig;
use crate::application::service::AuthService;
use crate::domain::repository::{AppProvider, UserProvider, UserSaver};
use crate::domain::value_object::{AppId, UserId, email::Email};
use crate::error::AuthResult;
use crate::presentation::dto::{
    IsAdminRequest, IsAdminResponse, LoginRequest, LoginResponse, RegisterRequest,
    RegisterResponse,
};

/// Shared state for auth handlers
pub struct AuthAppState<R>
where
    R: UserSaver + UserProvider + AppProvider + Send + Sync + 'static,
{
    pub service: AuthService<R, R, R>,
    pub request_timeout: Duration,
}

impl<R> AuthAppState<R>
where
    R: UserSaver + UserProvider + AppProvider + Send + Sync + 'static,
{
    /// One repository serves every storage port.
    pub fn new(repo: Arc<R>, config: Arc<AuthConfig>, request_timeout: Duration) -> Self {
        Self {
            service: AuthService::new(repo.clone(), repo.clone(), repo, config),
            request_timeout,
        }
    }
}

impl<R> Clone for AuthAppState<R>
where
    R: UserSaver + UserProvider + AppProvider + Send + Sync + 'static,
{
    fn clone(&self) -> Self {
        Self {
            service: self.service.clone(),
            request_timeout: self.request_timeout,
        }
    }
}

// ============================================================================
// Register
// ============================================================================

/// POST /auth/register
pub async fn register<R>(
    State(state): State<AuthAppState<R>>,
    payload: Result<Json<RegisterRequest>, JsonRejection>,
) -> AppResult<Json<RegisterResponse>>
where
    R: UserSaver + UserProvider + AppProvider + Send + Sync + 'static,
{
    let Json(req) = payload?;

    let email = parse_email(&req.email)?;
    let password = parse_password(req.password)?;

    let user_id = with_deadline(
        state.request_timeout,
        "auth.register",
        state.service.register(email, password),
    )
    .await?;

    Ok(Json(RegisterResponse {
        user_id: user_id.get(),
    }))
}

// ============================================================================
// Login
// ============================================================================

/// POST /auth/login
pub async fn login<R>(
    State(state): State<AuthAppState<R>>,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> AppResult<Json<LoginResponse>>
where
    R: UserSaver + UserProvider + AppProvider + Send + Sync + 'static,
{
    let Json(req) = payload?;

    let email = parse_email(&req.email)?;
    let password = parse_password(req.password)?;
    let app_id = AppId::new(req.app_id);
    if app_id.is_unset() {
        return Err(AppError::bad_request("app_id is required"));
    }

    let token = with_deadline(
        state.request_timeout,
        "auth.login",
        state.service.login(email, password, app_id),
    )
    .await?;

    Ok(Json(LoginResponse { token }))
}

// ============================================================================
// Is Admin
// ============================================================================

/// POST /auth/is-admin
pub async fn is_admin<R>(
    State(state): State<AuthAppState<R>>,
    payload: Result<Json<IsAdminRequest>, JsonRejection>,
) -> AppResult<Json<IsAdminResponse>>
where
    R: UserSaver + UserProvider + AppProvider + Send + Sync + 'static,
{
    let Json(req) = payload?;

    let user_id = UserId::new(req.user_id);
    if user_id.is_unset() {
        return Err(AppError::bad_request("user_id is required"));
    }

    let is_admin = with_deadline(
        state.request_timeout,
        "auth.is_admin",
        state.service.is_admin(user_id),
    )
    .await?;

    Ok(Json(IsAdminResponse { is_admin }))
}

// ============================================================================
// Helper Functions
// ============================================================================

fn parse_email(raw: &str) -> AppResult<Email> {
    Email::new(raw).map_err(|e| AppError::bad_request(e.to_string()))
}

fn parse_password(raw: String) -> AppResult<ClearTextPassword> {
    // Wrap first so the plaintext is zeroized on the rejection path too.
    let violation = check_policy(&raw).err();
    let password = ClearTextPassword::new(raw);
    match violation {
        Some(e) => Err(AppError::bad_request(e.to_string())),
        None => Ok(password),
    }
}

/// Run `fut` with a deadline; on expiry the future is dropped, which cancels
/// any storage query it was awaiting.
async fn with_deadline<T>(
    limit: Duration,
    op: &'static str,
    fut: impl Future<Output = AuthResult<T>>,
) -> AppResult<T> {
    match tokio::time::timeout(limit, fut).await {
        Ok(result) => result.map_err(AppError::from),
        Err(_) => {
            tracing::warn!(
                op,
                timeout_ms = limit.as_millis() as u64,
                "Request deadline exceeded"
            );
            Err(AppError::request_timeout("request timed out"))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kernel::error::kind::ErrorKind;

    #[test]
    fn test_parse_email() {
        assert!(parse_email("user@example.com").is_ok());

        let err = parse_email("").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::BadRequest);
        assert_eq!(err.message(), "email is required");

        assert_eq!(
            parse_email("no-domain").unwrap_err().kind(),
            ErrorKind::BadRequest
        );
    }

    #[test]
    fn test_parse_password() {
        assert!(parse_password("Secret123".to_string()).is_ok());

        let err = parse_password(String::new()).unwrap_err();
        assert_eq!(err.message(), "password is required");

        assert_eq!(
            parse_password("short".to_string()).unwrap_err().kind(),
            ErrorKind::BadRequest
        );
    }

    #[tokio::test]
    async fn test_deadline_expiry() {
        let slow = async {
            tokio::time::sleep(Duration::from_secs(5)).await;
            Ok::<_, crate::error::AuthError>(())
        };

        let err = with_deadline(Duration::from_millis(10), "test", slow)
            .await
            .unwrap_err();

        assert_eq!(err.kind(), ErrorKind::RequestTimeout);
    }
}
