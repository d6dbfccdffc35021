//! Value Object Module

pub mod app_secret;
pub mod email;

pub use kernel::id::{AppId, UserId};
