//! Account audit events.

use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgExecutor};
use uuid::Uuid;

/// An append-only audit record for an account.
#[derive(Debug, Clone, FromRow)]
pub struct AccountEvent {
    pub id: Uuid,

    pub account_id: Uuid,

    /// Short event name, e.g. `account_created` or `password_reset`.
    pub event: String,

    pub created_at: DateTime<Utc>,
}

impl AccountEvent {
    pub async fn create<'e, E>(
        executor: E,
        account_id: Uuid,
        event: &str,
    ) -> Result<Self, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        sqlx::query_as(
            r#"
            INSERT INTO account_events (account_id, event)
            VALUES ($1, $2)
            RETURNING *
            "#,
        )
        .bind(account_id)
        .bind(event)
        .fetch_one(executor)
        .await
    }

    /// Events for an account, newest first.
    pub async fn find_by_account<'e, E>(
        executor: E,
        account_id: Uuid,
    ) -> Result<Vec<Self>, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        sqlx::query_as(
            "SELECT * FROM account_events WHERE account_id = $1 ORDER BY created_at DESC",
        )
        .bind(account_id)
        .fetch_all(executor)
        .await
    }
}
