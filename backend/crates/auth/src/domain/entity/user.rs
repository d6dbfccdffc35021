//! User Entity
//!
//! Identity record. Created on registration and never mutated by this
//! service.

use platform::password::HashedPassword;

use crate::domain::value_object::{UserId, email::Email};

/// User entity
///
/// `Debug` is safe to log: the hash redacts itself.
#[derive(Debug, Clone)]
pub struct User {
    /// Storage-assigned, immutable
    pub id: UserId,
    /// Unique across the store
    pub email: Email,
    /// bcrypt output; never returned to callers
    pub password_hash: HashedPassword,
}

impl User {
    pub fn new(id: UserId, email: Email, password_hash: HashedPassword) -> Self {
        Self {
            id,
            email,
            password_hash,
        }
    }
}
