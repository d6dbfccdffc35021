//! Password Hashing and Verification
//!
//! One-way password storage with bcrypt:
//! - Salted, adaptive-cost hashing (cost is fixed per hasher, never per call)
//! - Zeroization of clear-text input
//! - Verification that never distinguishes "wrong password" from "corrupt hash"
//!
//! bcrypt only looks at the first 72 bytes of its input. The hasher uses the
//! non-truncating bcrypt entry points: hashing a longer password is an error
//! and verifying one is `false`. The policy check rejects such passwords
//! earlier, at the request boundary.

use std::fmt;

use thiserror::Error;
use zeroize::{Zeroize, ZeroizeOnDrop};

// ============================================================================
// Constants
// ============================================================================

/// Minimum password length in characters
pub const MIN_PASSWORD_LENGTH: usize = 8;

/// Maximum password length in bytes (bcrypt input limit)
pub const MAX_PASSWORD_BYTES: usize = 72;

/// Default work factor. Each step doubles the hashing time.
pub const DEFAULT_COST: u32 = 10;

/// Lowest work factor bcrypt accepts. Only suitable for tests.
pub const MIN_COST: u32 = 4;

/// Highest work factor bcrypt accepts.
pub const MAX_COST: u32 = 31;

// ============================================================================
// Error Types
// ============================================================================

/// Password policy violation errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PasswordPolicyError {
    #[error("password is required")]
    Empty,

    #[error("password must be at least {min} characters")]
    TooShort { min: usize, actual: usize },

    #[error("password must be at most {max} bytes")]
    TooLong { max: usize, actual: usize },

    #[error("password contains invalid control characters")]
    InvalidCharacter,
}

/// Password hashing errors
#[derive(Debug, Error)]
pub enum PasswordHashError {
    /// The primitive refused to hash (bad cost, input over 72 bytes)
    #[error("password hashing failed")]
    HashingFailed(#[source] bcrypt::BcryptError),
}

// ============================================================================
// Policy
// ============================================================================

/// Check a password against the request-level policy.
///
/// Lengths are counted in characters for the minimum and in bytes for the
/// maximum, since the bcrypt limit is a byte limit.
pub fn check_policy(raw: &str) -> Result<(), PasswordPolicyError> {
    if raw.trim().is_empty() {
        return Err(PasswordPolicyError::Empty);
    }

    let char_count = raw.chars().count();
    if char_count < MIN_PASSWORD_LENGTH {
        return Err(PasswordPolicyError::TooShort {
            min: MIN_PASSWORD_LENGTH,
            actual: char_count,
        });
    }

    if raw.len() > MAX_PASSWORD_BYTES {
        return Err(PasswordPolicyError::TooLong {
            max: MAX_PASSWORD_BYTES,
            actual: raw.len(),
        });
    }

    if raw.chars().any(|ch| ch.is_control() && ch != '\t') {
        return Err(PasswordPolicyError::InvalidCharacter);
    }

    Ok(())
}

// ============================================================================
// Clear Text Password (Zeroized on drop)
// ============================================================================

/// Clear text password with automatic memory zeroization
///
/// Construction performs no policy check: the login path must be able to
/// carry any candidate to verification. Use [`check_policy`] at the
/// validation boundary.
///
/// - Does not implement `Clone` to prevent accidental copies
/// - Debug output is redacted
#[derive(Zeroize, ZeroizeOnDrop)]
pub struct ClearTextPassword(String);

impl ClearTextPassword {
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    pub(crate) fn as_bytes(&self) -> &[u8] {
        self.0.as_bytes()
    }
}

impl fmt::Debug for ClearTextPassword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("ClearTextPassword")
            .field(&"[REDACTED]")
            .finish()
    }
}

// ============================================================================
// Hashed Password (Safe to store)
// ============================================================================

/// bcrypt hash in modular crypt format (`$2b$<cost>$<salt+hash>`)
///
/// Self-describing: cost and salt travel with the hash, so verification
/// needs no extra parameters.
#[derive(Clone, PartialEq, Eq)]
pub struct HashedPassword {
    hash: String,
}

impl HashedPassword {
    /// Wrap bytes read back from storage.
    ///
    /// Invalid UTF-8 is kept as a hash that can never verify rather than
    /// rejected, so a corrupt row looks exactly like a wrong password.
    pub fn from_bytes(bytes: impl Into<Vec<u8>>) -> Self {
        let hash = String::from_utf8(bytes.into()).unwrap_or_default();
        Self { hash }
    }

    /// Bytes for storage
    pub fn as_bytes(&self) -> &[u8] {
        self.hash.as_bytes()
    }

    /// The modular crypt string
    pub fn as_str(&self) -> &str {
        &self.hash
    }
}

impl fmt::Debug for HashedPassword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HashedPassword")
            .field("hash", &"[HASH]")
            .finish()
    }
}

// ============================================================================
// Hasher
// ============================================================================

/// bcrypt with a fixed work factor.
///
/// Holds no mutable state; copies are free and may be used from any thread.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PasswordHasher {
    cost: u32,
}

impl Default for PasswordHasher {
    fn default() -> Self {
        Self::new(DEFAULT_COST)
    }
}

impl PasswordHasher {
    pub const fn new(cost: u32) -> Self {
        Self { cost }
    }

    pub const fn cost(&self) -> u32 {
        self.cost
    }

    /// Hash with a fresh random salt.
    ///
    /// Fails when the cost is out of range or the password is longer than
    /// [`MAX_PASSWORD_BYTES`].
    pub fn hash(&self, password: &ClearTextPassword) -> Result<HashedPassword, PasswordHashError> {
        let hash = bcrypt::non_truncating_hash(password.as_bytes(), self.cost)
            .map_err(PasswordHashError::HashingFailed)?;
        Ok(HashedPassword { hash })
    }

    /// Verify a password against a stored hash.
    ///
    /// bcrypt compares digests in constant time. A malformed hash or a
    /// password over [`MAX_PASSWORD_BYTES`] yields `false`, exactly like a
    /// mismatch.
    pub fn verify(&self, hash: &HashedPassword, password: &ClearTextPassword) -> bool {
        bcrypt::non_truncating_verify(password.as_bytes(), hash.as_str()).unwrap_or(false)
    }

    /// Spend the same work as a verification and throw the result away.
    ///
    /// Used when there is no stored hash to check against, so a missing
    /// account costs as much time as a wrong password. Truncates, so an
    /// overlong candidate still pays the full cost.
    pub fn burn(&self, password: &ClearTextPassword) {
        let _ = bcrypt::hash(password.as_bytes(), self.cost);
    }
}

// ============================================================================
// Tests
// ============================================================================
