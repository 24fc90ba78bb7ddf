//! Verification code model.

use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgExecutor};

use crate::error::ParseEnumError;

/// What a verification code proves. Stored uppercase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum VerificationCodeType {
    Phone,
    Email,
    #[serde(rename = "ACCOUNT_2FA")]
    Account2fa,
    PasswordReset,
}

impl VerificationCodeType {
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Phone => "PHONE",
            Self::Email => "EMAIL",
            Self::Account2fa => "ACCOUNT_2FA",
            Self::PasswordReset => "PASSWORD_RESET",
        }
    }
}

impl std::fmt::Display for VerificationCodeType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for VerificationCodeType {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "PHONE" => Ok(Self::Phone),
            "EMAIL" => Ok(Self::Email),
            "ACCOUNT_2FA" => Ok(Self::Account2fa),
            "PASSWORD_RESET" => Ok(Self::PasswordReset),
            _ => Err(ParseEnumError::new("verification_type", s)),
        }
    }
}

impl TryFrom<String> for VerificationCodeType {
    type Error = ParseEnumError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

/// A short-lived numeric code tied to an opaque token.
#[derive(Debug, Clone, FromRow)]
pub struct VerificationCode {
    /// Opaque handle handed to the client; primary key.
    pub token: String,

    /// Zero-padded numeric code the holder must present.
    pub code: String,

    #[sqlx(try_from = "String")]
    pub verification_type: VerificationCodeType,

    /// The value being verified: an email address, a phone number, or an
    /// account id rendered as a string.
    pub verified_value: String,

    pub expires_at: DateTime<Utc>,

    pub consumed: bool,

    pub created_at: DateTime<Utc>,
}

/// Data required to insert a verification code.
#[derive(Debug, Clone)]
pub struct NewVerificationCode {
    pub token: String,
    pub code: String,
    pub verification_type: VerificationCodeType,
    pub verified_value: String,
    pub expires_at: DateTime<Utc>,
}

impl VerificationCode {
    /// Whether the code's redemption window has closed.
    #[must_use]
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now >= self.expires_at
    }

    pub async fn create<'e, E>(executor: E, data: NewVerificationCode) -> Result<Self, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        sqlx::query_as(
            r#"
            INSERT INTO verification_codes (token, code, verification_type, verified_value, expires_at)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING *
            "#,
        )
        .bind(&data.token)
        .bind(&data.code)
        .bind(data.verification_type.as_str())
        .bind(&data.verified_value)
        .bind(data.expires_at)
        .fetch_one(executor)
        .await
    }

    pub async fn find_by_token<'e, E>(executor: E, token: &str) -> Result<Option<Self>, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        sqlx::query_as("SELECT * FROM verification_codes WHERE token = $1")
            .bind(token)
            .fetch_optional(executor)
            .await
    }

    /// Mark a code consumed. Returns 0 when it was already consumed, so a
    /// second redemption loses the race no matter how the requests interleave.
    pub async fn consume<'e, E>(executor: E, token: &str) -> Result<u64, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        let result = sqlx::query(
            "UPDATE verification_codes SET consumed = TRUE WHERE token = $1 AND consumed = FALSE",
        )
        .bind(token)
        .execute(executor)
        .await?;
        Ok(result.rows_affected())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn type_parses_case_insensitively() {
        assert_eq!(
            "password_reset".parse::<VerificationCodeType>().unwrap(),
            VerificationCodeType::PasswordReset
        );
        assert_eq!(VerificationCodeType::Account2fa.to_string(), "ACCOUNT_2FA");
        assert!("TOTP".parse::<VerificationCodeType>().is_err());
    }

    #[test]
    fn expiry_boundary_is_exclusive_of_validity() {
        let now = Utc::now();
        let code = VerificationCode {
            token: "tok".to_string(),
            code: "123456".to_string(),
            verification_type: VerificationCodeType::Phone,
            verified_value: "15551234567".to_string(),
            expires_at: now,
            consumed: false,
            created_at: now - Duration::minutes(15),
        };
        assert!(code.is_expired(now));
        assert!(!code.is_expired(now - Duration::seconds(1)));
        assert!(code.is_expired(now + Duration::seconds(1)));
    }
}
