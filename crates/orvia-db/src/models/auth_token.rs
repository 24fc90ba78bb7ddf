//! Bearer session token model.
//!
//! The `token` column stores the attributed token (bare token plus sorted
//! client attributes). Rotation updates the row in place, preserving
//! `created_at` so the lifecycle ceiling is measured from first issuance,
//! and leaves a short-lived shadow row under the old token for requests
//! already in flight.

use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgExecutor};
use uuid::Uuid;

/// A bearer session token row.
#[derive(Debug, Clone, FromRow)]
pub struct AuthToken {
    /// Attributed token value, primary key.
    pub token: String,

    /// HMAC-SHA-512 of the bare token under the service secret. Fixed at
    /// issuance; rotation copies it forward.
    pub client_encryption_key: Vec<u8>,

    pub account_id: Uuid,

    /// First issuance time; rotation never touches this.
    pub created_at: DateTime<Utc>,

    pub expires_at: DateTime<Utc>,

    /// Shadow rows are grace copies left behind by rotation and are never
    /// rotated themselves.
    pub shadow: bool,
}

/// Data required to insert a token row.
#[derive(Debug, Clone)]
pub struct NewAuthToken {
    pub token: String,
    pub client_encryption_key: Vec<u8>,
    pub account_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
    pub shadow: bool,
}

impl AuthToken {
    pub async fn create<'e, E>(executor: E, data: NewAuthToken) -> Result<Self, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        sqlx::query_as(
            r#"
            INSERT INTO auth_tokens (token, client_encryption_key, account_id, created_at, expires_at, shadow)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING *
            "#,
        )
        .bind(&data.token)
        .bind(&data.client_encryption_key)
        .bind(data.account_id)
        .bind(data.created_at)
        .bind(data.expires_at)
        .bind(data.shadow)
        .fetch_one(executor)
        .await
    }

    /// Find an unexpired token row and lock it for the transaction, so two
    /// concurrent checks cannot both rotate it.
    pub async fn find_valid_for_update<'e, E>(
        executor: E,
        token: &str,
        now: DateTime<Utc>,
    ) -> Result<Option<Self>, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        sqlx::query_as(
            "SELECT * FROM auth_tokens WHERE token = $1 AND expires_at > $2 FOR UPDATE",
        )
        .bind(token)
        .bind(now)
        .fetch_optional(executor)
        .await
    }

    /// Rewrite a row under a new token value, keeping `created_at` intact.
    pub async fn rotate_in_place<'e, E>(
        executor: E,
        old_token: &str,
        new_token: &str,
        new_expires_at: DateTime<Utc>,
    ) -> Result<u64, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        let result = sqlx::query(
            "UPDATE auth_tokens SET token = $2, expires_at = $3 WHERE token = $1",
        )
        .bind(old_token)
        .bind(new_token)
        .bind(new_expires_at)
        .execute(executor)
        .await?;
        Ok(result.rows_affected())
    }

    pub async fn delete<'e, E>(executor: E, token: &str) -> Result<u64, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        let result = sqlx::query("DELETE FROM auth_tokens WHERE token = $1")
            .bind(token)
            .execute(executor)
            .await?;
        Ok(result.rows_affected())
    }

    /// Drop every session for an account, shadow rows included. Used when a
    /// password reset forces a global logout.
    pub async fn delete_all_for_account<'e, E>(
        executor: E,
        account_id: Uuid,
    ) -> Result<u64, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        let result = sqlx::query("DELETE FROM auth_tokens WHERE account_id = $1")
            .bind(account_id)
            .execute(executor)
            .await?;
        Ok(result.rows_affected())
    }
}
