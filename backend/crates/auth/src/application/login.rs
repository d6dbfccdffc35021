//! Login Use Case
//!
//! Verifies credentials and mints a session token for one application.

use std::sync::Arc;

use platform::password::{ClearTextPassword, HashedPassword, PasswordHasher};

use crate::application::config::AuthConfig;
use crate::domain::repository::{AppProvider, StorageError, UserProvider};
use crate::domain::token::TokenIssuer;
use crate::domain::value_object::{AppId, email::Email};
use crate::error::{AuthError, AuthResult};

const OP: &str = "auth.login";

/// Login input
pub struct LoginInput {
    pub email: Email,
    pub password: ClearTextPassword,
    pub app_id: AppId,
}

/// Login output
pub struct LoginOutput {
    /// Signed session token bound to the requested application
    pub token: String,
}

/// Login use case
pub struct LoginUseCase<P, A>
where
    P: UserProvider,
    A: AppProvider,
{
    user_provider: Arc<P>,
    app_provider: Arc<A>,
    hasher: PasswordHasher,
    issuer: TokenIssuer,
    config: Arc<AuthConfig>,
}

impl<P, A> LoginUseCase<P, A>
where
    P: UserProvider,
    A: AppProvider,
{
    pub fn new(
        user_provider: Arc<P>,
        app_provider: Arc<A>,
        hasher: PasswordHasher,
        issuer: TokenIssuer,
        config: Arc<AuthConfig>,
    ) -> Self {
        Self {
            user_provider,
            app_provider,
            hasher,
            issuer,
            config,
        }
    }

    pub async fn execute(&self, input: LoginInput) -> AuthResult<LoginOutput> {
        tracing::info!(op = OP, app_id = %input.app_id, "Login attempt");

        let user = match self.user_provider.user(&input.email).await {
            Ok(user) => Some(user),
            Err(StorageError::NotFound) => None,
            Err(e) => return Err(AuthError::internal(OP, e)),
        };

        // An unknown email still pays for one bcrypt round so that response
        // time does not reveal whether the account exists.
        let stored_hash = user.as_ref().map(|u| u.password_hash.clone());
        let password_valid = self.check_password(stored_hash, input.password).await?;

        let user = match user {
            Some(user) if password_valid => user,
            Some(user) => {
                tracing::warn!(op = OP, user_id = %user.id, "Password mismatch");
                return Err(AuthError::InvalidCredentials);
            }
            None => {
                tracing::warn!(op = OP, "Unknown email");
                return Err(AuthError::InvalidCredentials);
            }
        };

        let app = match self.app_provider.app(input.app_id).await {
            Ok(app) => app,
            Err(StorageError::NotFound) => {
                tracing::warn!(op = OP, app_id = %input.app_id, "App not found");
                return Err(AuthError::AppNotFound);
            }
            Err(e) => return Err(AuthError::internal(OP, e)),
        };

        let token = self
            .issuer
            .issue(&user, &app, self.config.token_ttl)
            .map_err(|e| AuthError::from_token(OP, e))?;

        tracing::info!(
            op = OP,
            user_id = %user.id,
            app_id = %app.id,
            "User logged in"
        );

        Ok(LoginOutput { token })
    }

    /// Run bcrypt off the async executor
    async fn check_password(
        &self,
        stored_hash: Option<HashedPassword>,
        password: ClearTextPassword,
    ) -> AuthResult<bool> {
        let hasher = self.hasher;
        tokio::task::spawn_blocking(move || match stored_hash {
            Some(hash) => hasher.verify(&hash, &password),
            None => {
                hasher.burn(&password);
                false
            }
        })
        .await
        .map_err(|e| AuthError::internal(OP, e))
    }
}
