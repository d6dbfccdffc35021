//! Platform Crate - Technical Infrastructure
//!
//! This crate provides shared technical foundations:
//! - Password hashing and verification (bcrypt)
//! - The password policy applied at the request validation boundary

pub mod password;
