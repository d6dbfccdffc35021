//! PostgreSQL Repository Implementations

use platform::password::HashedPassword;
use sqlx::PgPool;

use crate::domain::entity::{app::App, user::User};
use crate::domain::repository::{AppProvider, StorageError, StorageResult, UserProvider, UserSaver};
use crate::domain::value_object::{AppId, UserId, app_secret::AppSecret, email::Email};

/// PostgreSQL-backed auth repository
#[derive(Clone)]
pub struct PgAuthRepository {
    pool: PgPool,
}

impl PgAuthRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

impl From<sqlx::Error> for StorageError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::RowNotFound => StorageError::NotFound,
            sqlx::Error::Database(ref db_err) if db_err.is_unique_violation() => {
                StorageError::AlreadyExists
            }
            other => StorageError::Backend(Box::new(other)),
        }
    }
}

// ============================================================================
// User Ports
// ============================================================================

impl UserSaver for PgAuthRepository {
    async fn save_user(
        &self,
        email: &Email,
        password_hash: &HashedPassword,
    ) -> StorageResult<UserId> {
        let id: i64 = sqlx::query_scalar(
            r#"
            INSERT INTO users (email, pass_hash)
            VALUES ($1, $2)
            RETURNING id
            "#,
        )
        .bind(email.as_str())
        .bind(password_hash.as_bytes())
        .fetch_one(&self.pool)
        .await?;

        Ok(UserId::new(id))
    }
}

impl UserProvider for PgAuthRepository {
    async fn user(&self, email: &Email) -> StorageResult<User> {
        let row = sqlx::query_as::<_, UserRow>(
            r#"
            SELECT id, email, pass_hash
            FROM users
            WHERE email = $1
            "#,
        )
        .bind(email.as_str())
        .fetch_optional(&self.pool)
        .await?
        .ok_or(StorageError::NotFound)?;

        Ok(row.into_user())
    }

    async fn is_admin(&self, user_id: UserId) -> StorageResult<bool> {
        sqlx::query_scalar::<_, bool>("SELECT is_admin FROM users WHERE id = $1")
            .bind(user_id.get())
            .fetch_optional(&self.pool)
            .await?
            .ok_or(StorageError::NotFound)
    }
}

// ============================================================================
// App Port
// ============================================================================

impl AppProvider for PgAuthRepository {
    async fn app(&self, app_id: AppId) -> StorageResult<App> {
        let row = sqlx::query_as::<_, AppRow>(
            r#"
            SELECT id, name, secret
            FROM apps
            WHERE id = $1
            "#,
        )
        .bind(app_id.get())
        .fetch_optional(&self.pool)
        .await?
        .ok_or(StorageError::NotFound)?;

        Ok(row.into_app())
    }
}

// ============================================================================
// Row Types
// ============================================================================

#[derive(sqlx::FromRow)]
struct UserRow {
    id: i64,
    email: String,
    pass_hash: Vec<u8>,
}

impl UserRow {
    fn into_user(self) -> User {
        User::new(
            UserId::new(self.id),
            Email::from_db(self.email),
            HashedPassword::from_bytes(self.pass_hash),
        )
    }
}

#[derive(sqlx::FromRow)]
struct AppRow {
    id: i64,
    name: String,
    secret: String,
}

impl AppRow {
    fn into_app(self) -> App {
        App::new(AppId::new(self.id), self.name, AppSecret::new(self.secret))
    }
}
