//! Authentication Service
//!
//! Entry point for the transport layer. Holds the storage ports and config
//! behind `Arc`s and runs the use cases; no mutable state, so one instance
//! is shared by every request.

use std::sync::Arc;

use platform::password::ClearTextPassword;

use crate::application::config::AuthConfig;
use crate::application::is_admin::IsAdminUseCase;
use crate::application::login::{LoginInput, LoginUseCase};
use crate::application::register::{RegisterInput, RegisterUseCase};
use crate::domain::repository::{AppProvider, UserProvider, UserSaver};
use crate::domain::token::TokenIssuer;
use crate::domain::value_object::{AppId, UserId, email::Email};
use crate::error::AuthResult;

/// Authentication Service
pub struct AuthService<S, P, A>
where
    S: UserSaver,
    P: UserProvider,
    A: AppProvider,
{
    user_saver: Arc<S>,
    user_provider: Arc<P>,
    app_provider: Arc<A>,
    issuer: TokenIssuer,
    config: Arc<AuthConfig>,
}

impl<S, P, A> Clone for AuthService<S, P, A>
where
    S: UserSaver,
    P: UserProvider,
    A: AppProvider,
{
    fn clone(&self) -> Self {
        Self {
            user_saver: self.user_saver.clone(),
            user_provider: self.user_provider.clone(),
            app_provider: self.app_provider.clone(),
            issuer: self.issuer,
            config: self.config.clone(),
        }
    }
}

impl<S, P, A> AuthService<S, P, A>
where
    S: UserSaver,
    P: UserProvider,
    A: AppProvider,
{
    pub fn new(
        user_saver: Arc<S>,
        user_provider: Arc<P>,
        app_provider: Arc<A>,
        config: Arc<AuthConfig>,
    ) -> Self {
        Self {
            user_saver,
            user_provider,
            app_provider,
            issuer: TokenIssuer::new(),
            config,
        }
    }

    /// Verify credentials and return a token signed with the app's secret.
    pub async fn login(
        &self,
        email: Email,
        password: ClearTextPassword,
        app_id: AppId,
    ) -> AuthResult<String> {
        let use_case = LoginUseCase::new(
            self.user_provider.clone(),
            self.app_provider.clone(),
            self.config.password_hasher(),
            self.issuer,
            self.config.clone(),
        );

        let output = use_case
            .execute(LoginInput {
                email,
                password,
                app_id,
            })
            .await?;

        Ok(output.token)
    }

    /// Create an account and return its new ID.
    pub async fn register(&self, email: Email, password: ClearTextPassword) -> AuthResult<UserId> {
        let use_case = RegisterUseCase::new(self.user_saver.clone(), self.config.password_hasher());

        let output = use_case.execute(RegisterInput { email, password }).await?;

        Ok(output.user_id)
    }

    pub async fn is_admin(&self, user_id: UserId) -> AuthResult<bool> {
        IsAdminUseCase::new(self.user_provider.clone())
            .execute(user_id)
            .await
    }
}
