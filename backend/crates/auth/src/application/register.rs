//! Register Use Case
//!
//! Creates a new user account.

use std::sync::Arc;

use platform::password::{ClearTextPassword, PasswordHasher};

use crate::domain::repository::{StorageError, UserSaver};
use crate::domain::value_object::{UserId, email::Email};
use crate::error::{AuthError, AuthResult};

const OP: &str = "auth.register";

/// Register input
pub struct RegisterInput {
    pub email: Email,
    pub password: ClearTextPassword,
}

/// Register output
pub struct RegisterOutput {
    pub user_id: UserId,
}

/// Register use case
pub struct RegisterUseCase<S>
where
    S: UserSaver,
{
    user_saver: Arc<S>,
    hasher: PasswordHasher,
}

impl<S> RegisterUseCase<S>
where
    S: UserSaver,
{
    pub fn new(user_saver: Arc<S>, hasher: PasswordHasher) -> Self {
        Self { user_saver, hasher }
    }

    pub async fn execute(&self, input: RegisterInput) -> AuthResult<RegisterOutput> {
        tracing::info!(op = OP, "Registering user");

        // A hashing failure means the hasher is misconfigured, not that the
        // input was bad.
        let hasher = self.hasher;
        let password = input.password;
        let password_hash = tokio::task::spawn_blocking(move || hasher.hash(&password))
            .await
            .map_err(|e| AuthError::internal(OP, e))?
            .map_err(|e| AuthError::internal(OP, e))?;

        let user_id = match self.user_saver.save_user(&input.email, &password_hash).await {
            Ok(id) => id,
            Err(StorageError::AlreadyExists) => {
                tracing::warn!(op = OP, "Email already registered");
                return Err(AuthError::UserExists);
            }
            Err(e) => return Err(AuthError::internal(OP, e)),
        };

        tracing::info!(op = OP, user_id = %user_id, "User registered");

        Ok(RegisterOutput { user_id })
    }
}
