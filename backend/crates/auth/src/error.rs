//! Auth Error Types
//!
//! The domain error taxonomy of the SSO core and its conversion into the
//! unified `kernel::error::AppError` used by the transport.

use kernel::error::{app_error::AppError, kind::ErrorKind};
use thiserror::Error;

use crate::domain::token::TokenError;

/// Auth-specific result type alias
pub type AuthResult<T> = Result<T, AuthError>;

/// Every failure an Authentication Service operation can report
#[derive(Debug, Error)]
pub enum AuthError {
    /// Email already registered
    #[error("user already exists")]
    UserExists,

    /// Unknown email or wrong password; deliberately indistinguishable
    #[error("invalid credentials")]
    InvalidCredentials,

    /// Unknown application, or unknown user on the admin lookup
    #[error("app is not found")]
    AppNotFound,

    /// Application is configured without a signing secret
    #[error("application has no signing secret")]
    MissingSigningSecret,

    /// Signature mismatch, malformed token, or expired token
    #[error("session token is invalid")]
    TokenInvalid,

    /// Anything unexpected. The cause is kept for logs only.
    #[error("internal error in {op}")]
    Internal {
        op: &'static str,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync + 'static>,
    },
}

impl AuthError {
    /// Wrap an unexpected failure of operation `op`
    pub fn internal<E>(op: &'static str, source: E) -> Self
    where
        E: Into<Box<dyn std::error::Error + Send + Sync + 'static>>,
    {
        AuthError::Internal {
            op,
            source: source.into(),
        }
    }

    /// Map a token failure raised while serving `op`
    pub fn from_token(op: &'static str, err: TokenError) -> Self {
        match err {
            TokenError::MissingSigningSecret => AuthError::MissingSigningSecret,
            TokenError::Invalid(_) => AuthError::TokenInvalid,
            other => AuthError::internal(op, other),
        }
    }

    /// Get the ErrorKind for this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            AuthError::UserExists => ErrorKind::Conflict,
            AuthError::InvalidCredentials | AuthError::TokenInvalid => ErrorKind::Unauthorized,
            AuthError::AppNotFound => ErrorKind::NotFound,
            AuthError::MissingSigningSecret | AuthError::Internal { .. } => {
                ErrorKind::InternalServerError
            }
        }
    }

    /// Message safe to show end users
    fn public_message(&self) -> &'static str {
        match self {
            AuthError::UserExists => "user already exists",
            AuthError::InvalidCredentials => "invalid credentials",
            AuthError::AppNotFound => "app is not found",
            AuthError::TokenInvalid => "invalid token",
            AuthError::MissingSigningSecret | AuthError::Internal { .. } => "internal error",
        }
    }

    /// Log the error with appropriate level
    fn log(&self) {
        match self {
            AuthError::Internal { op, source } => {
                tracing::error!(op, error = %source, "Auth internal error");
            }
            AuthError::MissingSigningSecret => {
                tracing::error!("Application configured without signing secret");
            }
            AuthError::InvalidCredentials => {
                tracing::warn!("Invalid login attempt");
            }
            _ => {
                tracing::debug!(error = %self, "Auth error");
            }
        }
    }
}

impl From<AuthError> for AppError {
    fn from(err: AuthError) -> Self {
        err.log();
        let app_err = AppError::new(err.kind(), err.public_message());
        if matches!(err, AuthError::Internal { .. }) {
            app_err.with_source(err)
        } else {
            app_err
        }
    }
}
