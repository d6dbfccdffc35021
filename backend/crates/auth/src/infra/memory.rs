//! In-memory repository
//!
//! Implements every storage port over `HashMap`s behind a single
//! `tokio::sync::RwLock`. Nothing is durable; it backs local runs and tests.
//! IDs are assigned sequentially from 1, matching a fresh `BIGSERIAL`.

use std::collections::HashMap;

use platform::password::HashedPassword;
use tokio::sync::RwLock;

use crate::domain::entity::{app::App, user::User};
use crate::domain::repository::{AppProvider, StorageError, StorageResult, UserProvider, UserSaver};
use crate::domain::value_object::{AppId, UserId, email::Email};

#[derive(Debug)]
struct UserRecord {
    user: User,
    is_admin: bool,
}

#[derive(Debug)]
struct State {
    next_user_id: i64,
    users: HashMap<i64, UserRecord>,
    // email -> user id
    by_email: HashMap<String, i64>,
    apps: HashMap<i64, App>,
}

impl Default for State {
    fn default() -> Self {
        Self {
            next_user_id: 1,
            users: HashMap::new(),
            by_email: HashMap::new(),
            apps: HashMap::new(),
        }
    }
}

/// Volatile auth repository
#[derive(Debug, Default)]
pub struct InMemoryAuthRepository {
    state: RwLock<State>,
}

impl InMemoryAuthRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a relying application. Replaces any app with the same ID.
    pub async fn insert_app(&self, app: App) {
        let mut state = self.state.write().await;
        state.apps.insert(app.id.get(), app);
    }

    /// Set the admin flag of an existing user.
    pub async fn set_admin(&self, user_id: UserId, is_admin: bool) -> StorageResult<()> {
        let mut state = self.state.write().await;
        let record = state
            .users
            .get_mut(&user_id.get())
            .ok_or(StorageError::NotFound)?;
        record.is_admin = is_admin;
        Ok(())
    }

    pub async fn user_count(&self) -> usize {
        self.state.read().await.users.len()
    }
}

impl UserSaver for InMemoryAuthRepository {
    async fn save_user(
        &self,
        email: &Email,
        password_hash: &HashedPassword,
    ) -> StorageResult<UserId> {
        let mut state = self.state.write().await;

        if state.by_email.contains_key(email.as_str()) {
            return Err(StorageError::AlreadyExists);
        }

        let id = state.next_user_id;
        state.next_user_id += 1;

        let user = User::new(UserId::new(id), email.clone(), password_hash.clone());
        state.by_email.insert(email.as_str().to_owned(), id);
        state.users.insert(
            id,
            UserRecord {
                user,
                is_admin: false,
            },
        );

        Ok(UserId::new(id))
    }
}

impl UserProvider for InMemoryAuthRepository {
    async fn user(&self, email: &Email) -> StorageResult<User> {
        let state = self.state.read().await;
        state
            .by_email
            .get(email.as_str())
            .and_then(|id| state.users.get(id))
            .map(|record| record.user.clone())
            .ok_or(StorageError::NotFound)
    }

    async fn is_admin(&self, user_id: UserId) -> StorageResult<bool> {
        let state = self.state.read().await;
        state
            .users
            .get(&user_id.get())
            .map(|record| record.is_admin)
            .ok_or(StorageError::NotFound)
    }
}

impl AppProvider for InMemoryAuthRepository {
    async fn app(&self, app_id: AppId) -> StorageResult<App> {
        let state = self.state.read().await;
        state
            .apps
            .get(&app_id.get())
            .cloned()
            .ok_or(StorageError::NotFound)
    }
}
