//! Transaction helper.
//!
//! Wraps a closure in `BEGIN`/`COMMIT`. If the closure returns an error, or
//! the future is dropped mid-flight, the transaction rolls back when the
//! guard is dropped; no commit is ever reachable on the failure path.

use futures::future::BoxFuture;
use sqlx::{PgConnection, PgPool};

/// Run `f` inside a database transaction.
///
/// Commits when `f` returns `Ok`, rolls back otherwise. The closure receives
/// a `&mut PgConnection` so model methods taking a [`sqlx::PgExecutor`] work
/// unchanged inside the transaction.
///
/// The closure must capture owned data only; borrowed captures do not
/// satisfy the higher-ranked lifetime on the connection.
pub async fn transact<T, E, F>(pool: &PgPool, f: F) -> Result<T, E>
where
    E: From<sqlx::Error>,
    F: for<'c> FnOnce(&'c mut PgConnection) -> BoxFuture<'c, Result<T, E>>,
{
    let mut tx = pool.begin().await?;
    let out = f(&mut tx).await?;
    tx.commit().await?;
    Ok(out)
}
