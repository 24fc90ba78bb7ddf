//! Trusted-device record for two-factor login.

use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgExecutor};
use uuid::Uuid;

/// A device that completed a two-factor challenge for an account.
#[derive(Debug, Clone, FromRow)]
pub struct TwoFactorLogin {
    pub account_id: Uuid,

    pub device_id: String,

    pub last_login: DateTime<Utc>,
}

impl TwoFactorLogin {
    pub async fn find<'e, E>(
        executor: E,
        account_id: Uuid,
        device_id: &str,
    ) -> Result<Option<Self>, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        sqlx::query_as(
            "SELECT * FROM two_factor_logins WHERE account_id = $1 AND device_id = $2",
        )
        .bind(account_id)
        .bind(device_id)
        .fetch_optional(executor)
        .await
    }

    /// Record a successful challenge, refreshing `last_login` on repeat.
    pub async fn upsert<'e, E>(
        executor: E,
        account_id: Uuid,
        device_id: &str,
        last_login: DateTime<Utc>,
    ) -> Result<u64, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        let result = sqlx::query(
            r#"
            INSERT INTO two_factor_logins (account_id, device_id, last_login)
            VALUES ($1, $2, $3)
            ON CONFLICT (account_id, device_id)
            DO UPDATE SET last_login = EXCLUDED.last_login
            "#,
        )
        .bind(account_id)
        .bind(device_id)
        .bind(last_login)
        .execute(executor)
        .await?;
        Ok(result.rows_affected())
    }
}
