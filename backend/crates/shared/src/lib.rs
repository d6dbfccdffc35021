//! Shared Kernel - vocabulary shared by every SSO crate
//!
//! This crate contains the smallest common core:
//! - Transport-independent error classification and the unified error type
//! - Typed identifiers for storage-assigned integer keys
//!
//! Nothing in here knows about users, applications or tokens; those live in
//! the `auth` crate.

pub mod error {
    pub mod app_error;
    pub mod conversions;
    pub mod kind;
}
pub mod id;
