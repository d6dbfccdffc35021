//! App Entity
//!
//! A relying application. Read-only from this service's point of view.

use crate::domain::value_object::{AppId, app_secret::AppSecret};

/// Relying application with its own signing secret
#[derive(Debug, Clone)]
pub struct App {
    pub id: AppId,
    /// Display only
    pub name: String,
    pub secret: AppSecret,
}

impl App {
    pub fn new(id: AppId, name: impl Into<String>, secret: AppSecret) -> Self {
        Self {
            id,
            name: name.into(),
            secret,
        }
    }
}
