//! Entities

pub mod app;
pub mod user;

pub use app::App;
pub use user::User;
