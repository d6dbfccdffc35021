//! Repository Traits
//!
//! Storage ports. Implementations live in the infrastructure layer.
//!
//! The ports are deliberately split by capability so that each use case
//! depends only on what it calls. Dropping a returned future cancels the
//! underlying query; callers impose deadlines that way.

use platform::password::HashedPassword;
use thiserror::Error;

use crate::domain::entity::{app::App, user::User};
use crate::domain::value_object::{AppId, UserId, email::Email};

/// Storage-layer outcome that callers need to tell apart
#[derive(Debug, Error)]
pub enum StorageError {
    /// Uniqueness constraint hit on insert
    #[error("record already exists")]
    AlreadyExists,

    /// Lookup matched no row
    #[error("record not found")]
    NotFound,

    /// Anything else: connection, protocol, decoding
    #[error("storage backend failure")]
    Backend(#[source] Box<dyn std::error::Error + Send + Sync + 'static>),
}

pub type StorageResult<T> = Result<T, StorageError>;

/// Persists new users
#[trait_variant::make(UserSaver: Send)]
pub trait LocalUserSaver {
    /// Insert a user and return the assigned ID.
    ///
    /// Fails with [`StorageError::AlreadyExists`] when the email is taken.
    async fn save_user(&self, email: &Email, password_hash: &HashedPassword)
    -> StorageResult<UserId>;
}

/// Reads users
#[trait_variant::make(UserProvider: Send)]
pub trait LocalUserProvider {
    /// Find a user by exact email.
    async fn user(&self, email: &Email) -> StorageResult<User>;

    /// Admin flag of a user; [`StorageError::NotFound`] for unknown IDs.
    async fn is_admin(&self, user_id: UserId) -> StorageResult<bool>;
}

/// Resolves relying applications
#[trait_variant::make(AppProvider: Send)]
pub trait LocalAppProvider {
    /// Find an application, including its secret.
    async fn app(&self, app_id: AppId) -> StorageResult<App>;
}
