//! Application Layer
//!
//! Use cases and the Authentication Service that runs them.

pub mod config;
pub mod is_admin;
pub mod login;
pub mod register;
pub mod service;

// Re-exports
pub use config::AuthConfig;
pub use is_admin::IsAdminUseCase;
pub use login::{LoginInput, LoginOutput, LoginUseCase};
pub use register::{RegisterInput, RegisterOutput, RegisterUseCase};
pub use service::AuthService;
