//! Session Token Issuer
//!
//! Mints and checks the signed tokens handed out on login. Tokens are
//! compact JWS (`header.claims.signature`), HS256 only, keyed with the
//! secret of the application the user logged into. A token minted for one
//! application therefore never verifies under another application's secret.
//!
//! Claims are a flat JSON object:
//! `{"uid": <i64>, "email": <string>, "app_id": <i64>, "exp": <unix seconds>}`.
//! The issue time is not stored; it is `exp - ttl`.

use std::time::Duration;

use chrono::{DateTime, TimeDelta, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::entity::{app::App, user::User};
use crate::domain::value_object::{AppId, UserId, app_secret::AppSecret};

/// The only algorithm tokens are signed or accepted with
pub const ALGORITHM: Algorithm = Algorithm::HS256;

/// Claims carried by a session token
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionClaims {
    pub uid: i64,
    pub email: String,
    pub app_id: i64,
    /// Expiry, seconds since the Unix epoch
    pub exp: i64,
}

impl SessionClaims {
    pub fn user_id(&self) -> UserId {
        UserId::new(self.uid)
    }

    pub fn app_id(&self) -> AppId {
        AppId::new(self.app_id)
    }
}

/// Why a token was rejected
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InvalidReason {
    Signature,
    Expired,
    Malformed,
}

#[derive(Debug, Error)]
pub enum TokenError {
    /// The application has an empty secret. Checked before any signing.
    #[error("application has no signing secret")]
    MissingSigningSecret,

    #[error("session token is invalid ({0:?})")]
    Invalid(InvalidReason),

    /// TTL too large to represent as a timestamp
    #[error("token ttl out of range")]
    TtlOutOfRange,

    #[error("token signing failed")]
    Signing(#[source] jsonwebtoken::errors::Error),
}

/// Stateless token minting and verification.
#[derive(Debug, Clone, Copy, Default)]
pub struct TokenIssuer;

impl TokenIssuer {
    pub const fn new() -> Self {
        Self
    }

    /// Mint a token for `user` bound to `app`, expiring `ttl` from now.
    pub fn issue(&self, user: &User, app: &App, ttl: Duration) -> Result<String, TokenError> {
        self.issue_at(user, app, ttl, Utc::now())
    }

    /// Mint a token as if it were issued at `issued_at`.
    pub fn issue_at(
        &self,
        user: &User,
        app: &App,
        ttl: Duration,
        issued_at: DateTime<Utc>,
    ) -> Result<String, TokenError> {
        if app.secret.is_empty() {
            return Err(TokenError::MissingSigningSecret);
        }

        let ttl = TimeDelta::from_std(ttl).map_err(|_| TokenError::TtlOutOfRange)?;
        let expires_at = issued_at
            .checked_add_signed(ttl)
            .ok_or(TokenError::TtlOutOfRange)?;

        let claims = SessionClaims {
            uid: user.id.get(),
            email: user.email.as_str().to_string(),
            app_id: app.id.get(),
            exp: expires_at.timestamp(),
        };

        encode(
            &Header::new(ALGORITHM),
            &claims,
            &EncodingKey::from_secret(app.secret.as_bytes()),
        )
        .map_err(TokenError::Signing)
    }

    /// Check signature and expiry, returning the claims.
    ///
    /// No leeway is applied to `exp`.
    pub fn verify(&self, token: &str, secret: &AppSecret) -> Result<SessionClaims, TokenError> {
        if secret.is_empty() {
            return Err(TokenError::MissingSigningSecret);
        }

        let mut validation = Validation::new(ALGORITHM);
        validation.leeway = 0;
        validation.set_required_spec_claims(&["exp"]);

        decode::<SessionClaims>(token, &DecodingKey::from_secret(secret.as_bytes()), &validation)
            .map(|data| data.claims)
            .map_err(|e| TokenError::Invalid(invalid_reason(&e)))
    }
}

fn invalid_reason(error: &jsonwebtoken::errors::Error) -> InvalidReason {
    use jsonwebtoken::errors::ErrorKind;

    match error.kind() {
        ErrorKind::InvalidSignature => InvalidReason::Signature,
        ErrorKind::ExpiredSignature => InvalidReason::Expired,
        _ => InvalidReason::Malformed,
    }
}
