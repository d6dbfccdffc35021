//! SSO server wiring shared by the `sso` and `migrator` binaries.

pub mod config;
pub mod telemetry;

use sqlx::migrate::Migrator;

/// Schema migrations, embedded at compile time
pub static MIGRATOR: Migrator = sqlx::migrate!("../../../database/migrations");
