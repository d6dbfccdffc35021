//! Common ID Types
//!
//! Type-safe wrappers for storage-assigned integer keys.

use std::fmt;
use std::hash::{Hash, Hasher};
use std::marker::PhantomData;

/// Generic typed ID wrapper over an `i64` key.
///
/// Zero is never assigned by storage and is treated as "not provided" by
/// request validation.
///
/// Usage:
/// ```
/// use kernel::id::{AppId, UserId};
///
/// let user = UserId::new(7);
/// let app = AppId::new(7);
/// assert_eq!(user.get(), app.get()); // same key, different types
/// ```
pub struct Id<T> {
    value: i64,
    _marker: PhantomData<fn() -> T>,
}

impl<T> Id<T> {
    pub const fn new(value: i64) -> Self {
        Self {
            value,
            _marker: PhantomData,
        }
    }

    /// Underlying key
    pub const fn get(&self) -> i64 {
        self.value
    }

    /// True for the zero value a client sends when it omits the field.
    pub const fn is_unset(&self) -> bool {
        self.value == 0
    }
}

// Manual impls so that `T` does not need to implement these traits itself.

impl<T> Clone for Id<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for Id<T> {}

impl<T> PartialEq for Id<T> {
    fn eq(&self, other: &Self) -> bool {
        self.value == other.value
    }
}

impl<T> Eq for Id<T> {}

impl<T> Hash for Id<T> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.value.hash(state);
    }
}

impl<T> fmt::Debug for Id<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Id({})", self.value)
    }
}

impl<T> fmt::Display for Id<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.value)
    }
}

impl<T> From<i64> for Id<T> {
    fn from(value: i64) -> Self {
        Self::new(value)
    }
}

impl<T> From<Id<T>> for i64 {
    fn from(id: Id<T>) -> Self {
        id.value
    }
}

/// Marker types for different entity IDs
pub mod markers {
    /// Marker for user IDs
    pub struct User;

    /// Marker for relying-application IDs
    pub struct App;
}

pub type UserId = Id<markers::User>;
pub type AppId = Id<markers::App>;
