//! Server configuration
//!
//! Read from the process environment once at startup. `.env` is loaded by
//! the binaries before this runs.

use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use anyhow::{Context, Result, bail};
use auth::AuthConfig;
use platform::password::{DEFAULT_COST, MAX_COST, MIN_COST};

pub const DEFAULT_PORT: u16 = 44044;
pub const DEFAULT_TOKEN_TTL_SECS: u64 = 3600;
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 5;
pub const DEFAULT_DB_MAX_CONNECTIONS: u32 = 5;

/// Deployment flavour; selects the log format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Environment {
    /// Human-readable logs
    #[default]
    Local,
    /// JSON lines
    Prod,
}

impl Environment {
    pub fn as_str(&self) -> &'static str {
        match self {
            Environment::Local => "local",
            Environment::Prod => "prod",
        }
    }
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub database_url: String,
    pub environment: Environment,
    pub port: u16,
    pub token_ttl: Duration,
    /// Deadline applied to every request
    pub request_timeout: Duration,
    pub db_max_connections: u32,
    pub password_cost: u32,
}

impl ServerConfig {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from any key/value source; absent keys take their defaults.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let database_url = lookup("DATABASE_URL")
            .filter(|url| !url.trim().is_empty())
            .context("DATABASE_URL must be set")?;

        let environment = match lookup("SSO_ENV").as_deref().map(str::trim) {
            None | Some("") | Some("local") => Environment::Local,
            Some("prod") => Environment::Prod,
            Some(other) => bail!("parse SSO_ENV: expected `local` or `prod`, got `{other}`"),
        };

        let port = parse_or(&lookup, "SSO_PORT", DEFAULT_PORT)?;

        let token_ttl_secs = parse_or(&lookup, "SSO_TOKEN_TTL_SECS", DEFAULT_TOKEN_TTL_SECS)?;
        if token_ttl_secs == 0 {
            bail!("SSO_TOKEN_TTL_SECS must be positive");
        }

        let request_timeout_secs = parse_or(
            &lookup,
            "SSO_REQUEST_TIMEOUT_SECS",
            DEFAULT_REQUEST_TIMEOUT_SECS,
        )?;
        if request_timeout_secs == 0 {
            bail!("SSO_REQUEST_TIMEOUT_SECS must be positive");
        }

        let db_max_connections = parse_or(
            &lookup,
            "SSO_DB_MAX_CONNECTIONS",
            DEFAULT_DB_MAX_CONNECTIONS,
        )?;

        let password_cost = parse_or(&lookup, "SSO_PASSWORD_COST", DEFAULT_COST)?;
        if !(MIN_COST..=MAX_COST).contains(&password_cost) {
            bail!("SSO_PASSWORD_COST must be between {MIN_COST} and {MAX_COST}");
        }

        Ok(Self {
            database_url,
            environment,
            port,
            token_ttl: Duration::from_secs(token_ttl_secs),
            request_timeout: Duration::from_secs(request_timeout_secs),
            db_max_connections,
            password_cost,
        })
    }

    pub fn auth_config(&self) -> AuthConfig {
        AuthConfig {
            token_ttl: self.token_ttl,
            password_cost: self.password_cost,
        }
    }
}

fn parse_or<F, T>(lookup: &F, key: &str, default: T) -> Result<T>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match lookup(key) {
        Some(raw) if !raw.trim().is_empty() => {
            raw.trim().parse().with_context(|| format!("parse {key}"))
        }
        _ => Ok(default),
    }
}
