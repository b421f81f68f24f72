//! Database module
//!
//! PostgreSQL-backed implementations of the persistence and identity
//! gateways, plus pool and migration helpers.

pub mod connection;
pub mod repositories;

use sqlx::PgPool;

pub use connection::*;
pub use repositories::{AccountRepository, PermissionRepository, ProblemRepository};

/// Run database migrations
pub async fn run_migrations(pool: &PgPool) -> Result<(), sqlx::migrate::MigrateError> {
    sqlx::migrate!("./migrations").run(pool).await
}
