//! IsAdmin Use Case
//!
//! Answers whether a user holds administrator rights.

use std::sync::Arc;

use crate::domain::repository::{StorageError, UserProvider};
use crate::domain::value_object::UserId;
use crate::error::{AuthError, AuthResult};

const OP: &str = "auth.is_admin";

/// IsAdmin use case
pub struct IsAdminUseCase<P>
where
    P: UserProvider,
{
    user_provider: Arc<P>,
}

impl<P> IsAdminUseCase<P>
where
    P: UserProvider,
{
    pub fn new(user_provider: Arc<P>) -> Self {
        Self { user_provider }
    }

    /// A missing user is reported as [`AuthError::AppNotFound`], the same
    /// "not found" signal the transport already translates.
    pub async fn execute(&self, user_id: UserId) -> AuthResult<bool> {
        tracing::info!(op = OP, user_id = %user_id, "Checking admin flag");

        match self.user_provider.is_admin(user_id).await {
            Ok(is_admin) => {
                tracing::info!(op = OP, user_id = %user_id, is_admin, "Admin flag resolved");
                Ok(is_admin)
            }
            Err(StorageError::NotFound) => {
                tracing::warn!(op = OP, user_id = %user_id, "User not found");
                Err(AuthError::AppNotFound)
            }
            Err(e) => Err(AuthError::internal(OP, e)),
        }
    }
}
