//! Account model.

use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgExecutor};
use uuid::Uuid;

use crate::error::ParseEnumError;

/// Lifecycle status of an account. Stored uppercase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AccountStatus {
    Active,
    Deleted,
    Suspended,
    Blocked,
}

impl AccountStatus {
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Active => "ACTIVE",
            Self::Deleted => "DELETED",
            Self::Suspended => "SUSPENDED",
            Self::Blocked => "BLOCKED",
        }
    }
}

impl std::fmt::Display for AccountStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AccountStatus {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "ACTIVE" => Ok(Self::Active),
            "DELETED" => Ok(Self::Deleted),
            "SUSPENDED" => Ok(Self::Suspended),
            "BLOCKED" => Ok(Self::Blocked),
            _ => Err(ParseEnumError::new("account_status", s)),
        }
    }
}

impl TryFrom<String> for AccountStatus {
    type Error = ParseEnumError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

/// Role of an account holder. Stored uppercase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AccountType {
    Patient,
    Provider,
}

impl AccountType {
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Patient => "PATIENT",
            Self::Provider => "PROVIDER",
        }
    }
}

impl std::fmt::Display for AccountType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AccountType {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "PATIENT" => Ok(Self::Patient),
            "PROVIDER" => Ok(Self::Provider),
            _ => Err(ParseEnumError::new("account_type", s)),
        }
    }
}

impl TryFrom<String> for AccountType {
    type Error = ParseEnumError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

/// An account holder.
#[derive(Debug, Clone, FromRow)]
pub struct Account {
    pub id: Uuid,

    pub first_name: String,

    pub last_name: String,

    /// Argon2id PHC hash, never the plaintext.
    pub password: String,

    #[sqlx(try_from = "String")]
    pub status: AccountStatus,

    #[sqlx(try_from = "String")]
    pub account_type: AccountType,

    /// Primary email row, set after the contact rows exist.
    pub primary_email_id: Option<Uuid>,

    /// Primary phone row, set after the contact rows exist.
    pub primary_phone_id: Option<Uuid>,

    pub created_at: DateTime<Utc>,

    pub modified_at: DateTime<Utc>,
}

/// Data required to create an account.
#[derive(Debug, Clone)]
pub struct NewAccount {
    /// Explicit id, or `None` to mint one.
    pub id: Option<Uuid>,
    pub first_name: String,
    pub last_name: String,
    pub password: String,
    pub status: AccountStatus,
    pub account_type: AccountType,
}

impl Account {
    /// Whether the account may authenticate.
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.status == AccountStatus::Active
    }

    /// Insert a new account row.
    pub async fn create<'e, E>(executor: E, data: NewAccount) -> Result<Self, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        let id = data.id.unwrap_or_else(Uuid::new_v4);
        sqlx::query_as(
            r#"
            INSERT INTO accounts (id, first_name, last_name, password, status, account_type)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(&data.first_name)
        .bind(&data.last_name)
        .bind(&data.password)
        .bind(data.status.as_str())
        .bind(data.account_type.as_str())
        .fetch_one(executor)
        .await
    }

    /// Find an account by ID.
    pub async fn find_by_id<'e, E>(executor: E, id: Uuid) -> Result<Option<Self>, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        sqlx::query_as("SELECT * FROM accounts WHERE id = $1")
            .bind(id)
            .fetch_optional(executor)
            .await
    }

    /// Find the account owning an active email contact.
    pub async fn find_by_email<'e, E>(executor: E, email: &str) -> Result<Option<Self>, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        sqlx::query_as(
            r#"
            SELECT a.* FROM accounts a
            JOIN account_emails e ON e.account_id = a.id
            WHERE e.email = $1 AND e.status = 'ACTIVE'
            "#,
        )
        .bind(email)
        .fetch_optional(executor)
        .await
    }

    /// Point the account at its primary contact rows.
    pub async fn update_primary_contacts<'e, E>(
        executor: E,
        id: Uuid,
        primary_email_id: Uuid,
        primary_phone_id: Uuid,
    ) -> Result<u64, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        let result = sqlx::query(
            r#"
            UPDATE accounts
            SET primary_email_id = $2, primary_phone_id = $3, modified_at = NOW()
            WHERE id = $1
            "#,
        )
        .bind(id)
        .bind(primary_email_id)
        .bind(primary_phone_id)
        .execute(executor)
        .await?;
        Ok(result.rows_affected())
    }

    /// Replace the stored password hash.
    pub async fn update_password<'e, E>(
        executor: E,
        id: Uuid,
        password_hash: &str,
    ) -> Result<u64, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        let result = sqlx::query(
            "UPDATE accounts SET password = $2, modified_at = NOW() WHERE id = $1",
        )
        .bind(id)
        .bind(password_hash)
        .execute(executor)
        .await?;
        Ok(result.rows_affected())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_round_trips_case_insensitively() {
        assert_eq!(
            "active".parse::<AccountStatus>().unwrap(),
            AccountStatus::Active
        );
        assert_eq!(AccountStatus::Suspended.to_string(), "SUSPENDED");
    }

    #[test]
    fn unknown_status_is_rejected() {
        let err = "FROZEN".parse::<AccountStatus>().unwrap_err();
        assert_eq!(err.value, "FROZEN");
        assert_eq!(err.column, "account_status");
    }

    #[test]
    fn account_type_parses() {
        assert_eq!(
            "provider".parse::<AccountType>().unwrap(),
            AccountType::Provider
        );
        assert!("ADMIN".parse::<AccountType>().is_err());
    }

    #[test]
    fn only_active_accounts_authenticate() {
        let mut account = Account {
            id: Uuid::new_v4(),
            first_name: "Ada".to_string(),
            last_name: "Lovelace".to_string(),
            password: "$argon2id$...".to_string(),
            status: AccountStatus::Active,
            account_type: AccountType::Patient,
            primary_email_id: None,
            primary_phone_id: None,
            created_at: Utc::now(),
            modified_at: Utc::now(),
        };
        assert!(account.is_active());

        for status in [
            AccountStatus::Deleted,
            AccountStatus::Suspended,
            AccountStatus::Blocked,
        ] {
            account.status = status;
            assert!(!account.is_active());
        }
    }
}
