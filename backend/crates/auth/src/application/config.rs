//! Application Configuration
//!
//! Configuration for the Auth application layer.

use std::time::Duration;

use platform::password::{DEFAULT_COST, PasswordHasher};

/// Auth application configuration
#[derive(Debug, Clone)]
pub struct AuthConfig {
    /// Lifetime of issued session tokens
    pub token_ttl: Duration,
    /// bcrypt work factor for new hashes
    pub password_cost: u32,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            token_ttl: Duration::from_secs(3600), // 1 hour
            password_cost: DEFAULT_COST,
        }
    }
}

impl AuthConfig {
    /// Hasher configured with this cost
    pub fn password_hasher(&self) -> PasswordHasher {
        PasswordHasher::new(self.password_cost)
    }
}
