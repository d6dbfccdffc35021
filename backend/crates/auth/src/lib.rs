//! Auth (SSO) Backend Module
//!
//! Clean Architecture structure:
//! - `domain/` - Entities, value objects, storage ports, token issuer
//! - `application/` - Use cases and the Authentication Service
//! - `infra/` - PostgreSQL and in-memory storage
//! - `presentation/` - HTTP handlers, DTOs, router, middleware
//!
//! ## Features
//! - Register with email + password
//! - Login for a relying application, returning a signed session token
//! - Admin flag lookup
//!
//! ## Security Model
//! - Passwords hashed with bcrypt; plaintext zeroized on drop
//! - Tokens are HS256 JWTs signed with the target application's own secret
//! - Unknown email and wrong password are indistinguishable, in result and timing

pub mod application;
pub mod domain;
pub mod error;
pub mod infra;
pub mod presentation;

// Re-exports for convenience
pub use application::config::AuthConfig;
pub use application::service::AuthService;
pub use domain::token::{SessionClaims, TokenIssuer};
pub use error::{AuthError, AuthResult};
pub use infra::{memory::InMemoryAuthRepository, postgres::PgAuthRepository};
pub use presentation::router::{auth_router, auth_router_generic};

// Re-export kernel error types for unified error handling
pub use kernel::error::{
    app_error::{AppError, AppResult},
    kind::ErrorKind,
};

pub mod models {
    pub use crate::domain::entity::*;
    pub use crate::domain::value_object::*;
    pub use crate::presentation::dto::*;
}

pub mod middleware {
    pub use crate::presentation::middleware::*;
}

#[cfg(test)]
mod tests;
