//! Domain Layer
//!
//! Entities, value objects, storage ports and the token issuer.

pub mod entity;
pub mod repository;
pub mod token;
pub mod value_object;

// Re-exports
pub use entity::{app::App, user::User};
pub use repository::{AppProvider, StorageError, StorageResult, UserProvider, UserSaver};
pub use token::{SessionClaims, TokenError, TokenIssuer};
