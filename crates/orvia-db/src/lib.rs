//! Database layer for the Orvia auth service.
//!
//! Provides pool construction, a transaction helper with rollback-on-drop
//! semantics, and row models with inherent query methods generic over
//! [`sqlx::PgExecutor`] so they run on a pool or inside a transaction alike.

pub mod error;
pub mod models;
pub mod transaction;

pub use error::{DbError, ParseEnumError};
pub use transaction::transact;

use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use std::time::Duration;

/// Create a connection pool against the given database URL.
///
/// # Errors
///
/// Returns [`DbError::ConnectionFailed`] if the initial connection cannot
/// be established.
pub async fn connect(database_url: &str, max_connections: u32) -> Result<PgPool, DbError> {
    PgPoolOptions::new()
        .max_connections(max_connections)
        .acquire_timeout(Duration::from_secs(10))
        .connect(database_url)
        .await
        .map_err(DbError::ConnectionFailed)
}
