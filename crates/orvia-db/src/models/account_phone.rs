//! Phone contact model.

use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgExecutor};
use uuid::Uuid;

use super::account_email::ContactStatus;

/// A phone number attached to an account.
#[derive(Debug, Clone, FromRow)]
pub struct AccountPhone {
    pub id: Uuid,

    pub account_id: Uuid,

    /// Normalized to digits with a leading country code.
    pub phone_number: String,

    #[sqlx(try_from = "String")]
    pub status: ContactStatus,

    pub verified: bool,

    pub created_at: DateTime<Utc>,

    pub modified_at: DateTime<Utc>,
}

/// Data required to attach a phone number to an account.
#[derive(Debug, Clone)]
pub struct NewAccountPhone {
    pub account_id: Uuid,
    pub phone_number: String,
    pub status: ContactStatus,
    pub verified: bool,
}

impl AccountPhone {
    pub async fn create<'e, E>(executor: E, data: NewAccountPhone) -> Result<Self, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        sqlx::query_as(
            r#"
            INSERT INTO account_phones (account_id, phone_number, status, verified)
            VALUES ($1, $2, $3, $4)
            RETURNING *
            "#,
        )
        .bind(data.account_id)
        .bind(&data.phone_number)
        .bind(data.status.as_str())
        .bind(data.verified)
        .fetch_one(executor)
        .await
    }

    pub async fn find_by_id<'e, E>(executor: E, id: Uuid) -> Result<Option<Self>, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        sqlx::query_as("SELECT * FROM account_phones WHERE id = $1")
            .bind(id)
            .fetch_optional(executor)
            .await
    }
}
