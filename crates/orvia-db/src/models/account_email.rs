//! Email contact model.

use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgExecutor};
use uuid::Uuid;

use crate::error::ParseEnumError;

/// Status shared by email and phone contact rows. Stored uppercase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ContactStatus {
    Active,
    Deleted,
    Suspended,
}

impl ContactStatus {
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Active => "ACTIVE",
            Self::Deleted => "DELETED",
            Self::Suspended => "SUSPENDED",
        }
    }
}

impl std::fmt::Display for ContactStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ContactStatus {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "ACTIVE" => Ok(Self::Active),
            "DELETED" => Ok(Self::Deleted),
            "SUSPENDED" => Ok(Self::Suspended),
            _ => Err(ParseEnumError::new("contact_status", s)),
        }
    }
}

impl TryFrom<String> for ContactStatus {
    type Error = ParseEnumError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

/// An email address attached to an account.
#[derive(Debug, Clone, FromRow)]
pub struct AccountEmail {
    pub id: Uuid,

    pub account_id: Uuid,

    /// Normalized (lowercased, trimmed) address.
    pub email: String,

    #[sqlx(try_from = "String")]
    pub status: ContactStatus,

    /// Set once ownership has been proven with a verification code.
    pub verified: bool,

    pub created_at: DateTime<Utc>,

    pub modified_at: DateTime<Utc>,
}

/// Data required to attach an email to an account.
#[derive(Debug, Clone)]
pub struct NewAccountEmail {
    pub account_id: Uuid,
    pub email: String,
    pub status: ContactStatus,
    pub verified: bool,
}

impl AccountEmail {
    pub async fn create<'e, E>(executor: E, data: NewAccountEmail) -> Result<Self, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        sqlx::query_as(
            r#"
            INSERT INTO account_emails (account_id, email, status, verified)
            VALUES ($1, $2, $3, $4)
            RETURNING *
            "#,
        )
        .bind(data.account_id)
        .bind(&data.email)
        .bind(data.status.as_str())
        .bind(data.verified)
        .fetch_one(executor)
        .await
    }

    pub async fn find_by_id<'e, E>(executor: E, id: Uuid) -> Result<Option<Self>, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        sqlx::query_as("SELECT * FROM account_emails WHERE id = $1")
            .bind(id)
            .fetch_optional(executor)
            .await
    }

    /// Whether an active contact row already claims this address.
    pub async fn exists_active<'e, E>(executor: E, email: &str) -> Result<bool, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        let row: (bool,) = sqlx::query_as(
            "SELECT EXISTS(SELECT 1 FROM account_emails WHERE email = $1 AND status = 'ACTIVE')",
        )
        .bind(email)
        .fetch_one(executor)
        .await?;
        Ok(row.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn contact_status_parses_case_insensitively() {
        assert_eq!(
            "deleted".parse::<ContactStatus>().unwrap(),
            ContactStatus::Deleted
        );
        assert!("BLOCKED".parse::<ContactStatus>().is_err());
    }
}
