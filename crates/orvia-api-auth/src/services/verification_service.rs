//! Verification-code issuance and redemption.

use chrono::{DateTime, Duration, Utc};
use futures::FutureExt;
use sqlx::{PgConnection, PgPool};
use uuid::Uuid;

use orvia_auth::{codes_match, generate_numeric_code, generate_token};
use orvia_db::models::{
    Account, AccountEmail, AccountPhone, NewVerificationCode, VerificationCode,
    VerificationCodeType,
};
use orvia_db::transact;

use crate::error::ApiAuthError;

/// Digits in a verification code.
pub const CODE_DIGITS: u32 = 6;

/// Minutes before a code expires.
pub const CODE_TTL_MINUTES: i64 = 15;

/// A freshly issued code, returned to the caller for delivery.
#[derive(Debug, Clone)]
pub struct IssuedCode {
    pub token: String,
    pub code: String,
    pub verification_type: VerificationCodeType,
    pub expiration_epoch: i64,
}

/// Result of a password-reset token check.
#[derive(Debug, Clone)]
pub struct PasswordResetContext {
    pub account_id: Uuid,
    pub account_email: String,
    pub account_phone_number: String,
}

/// Issues, redeems, and reads back verification codes.
pub struct VerificationService {
    pool: PgPool,
}

impl VerificationService {
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Mint a code for a value and persist it unconsumed.
    ///
    /// The numeric code is never logged; the token is enough to correlate.
    pub async fn issue(
        &self,
        value_to_verify: &str,
        verification_type: VerificationCodeType,
    ) -> Result<IssuedCode, ApiAuthError> {
        let token = generate_token();
        let code = generate_numeric_code(CODE_DIGITS);
        let expires_at = Utc::now() + Duration::minutes(CODE_TTL_MINUTES);

        tracing::debug!(
            token = %token,
            verification_type = %verification_type,
            value = %value_to_verify,
            expires_at = %expires_at,
            "inserting verification code"
        );
        VerificationCode::create(
            &self.pool,
            NewVerificationCode {
                token: token.clone(),
                code: code.clone(),
                verification_type,
                verified_value: value_to_verify.to_string(),
                expires_at,
            },
        )
        .await?;

        Ok(IssuedCode {
            token,
            code,
            verification_type,
            expiration_epoch: expires_at.timestamp(),
        })
    }

    /// Redeem a code, consuming it.
    ///
    /// `expected_type` narrows lookup; a code of another type behaves as if
    /// it did not exist.
    pub async fn redeem(
        &self,
        token: &str,
        code: &str,
        expected_type: Option<VerificationCodeType>,
    ) -> Result<VerificationCode, ApiAuthError> {
        let token = token.to_string();
        let code = code.to_string();
        transact(&self.pool, move |conn| {
            async move { redeem_code(conn, &token, &code, expected_type, Utc::now()).await }.boxed()
        })
        .await
    }

    /// Validate and consume a password-reset token, returning the account's
    /// delivery contact points.
    pub async fn check_password_reset(
        &self,
        token: &str,
    ) -> Result<PasswordResetContext, ApiAuthError> {
        let token = token.to_string();
        transact(&self.pool, move |conn| {
            async move {
                let verification = require_code(&mut *conn, &token).await?;
                if verification.verification_type != VerificationCodeType::PasswordReset {
                    return Err(ApiAuthError::Validation(
                        "the provided token is not a password reset token".to_string(),
                    ));
                }
                if verification.is_expired(Utc::now()) {
                    return Err(ApiAuthError::VerificationCodeExpired);
                }
                if VerificationCode::consume(&mut *conn, &token).await? != 1 {
                    return Err(ApiAuthError::CodeAlreadyConsumed);
                }

                let account_id = parse_account_value(&verification.verified_value)?;
                let account = Account::find_by_id(&mut *conn, account_id)
                    .await?
                    .ok_or(ApiAuthError::AccountNotFound)?;
                let (email, phone) = primary_contacts(conn, &account).await?;
                Ok(PasswordResetContext {
                    account_id: account.id,
                    account_email: email,
                    account_phone_number: phone,
                })
            }
            .boxed()
        })
        .await
    }

    /// Read back a verified value after its code has been consumed.
    pub async fn verified_value(&self, token: &str) -> Result<String, ApiAuthError> {
        if token.is_empty() {
            return Err(ApiAuthError::CodeNotFound);
        }
        let verification = VerificationCode::find_by_token(&self.pool, token)
            .await?
            .ok_or(ApiAuthError::CodeNotFound)?;
        if !verification.consumed {
            return Err(ApiAuthError::NotYetVerified);
        }
        Ok(verification.verified_value)
    }
}

/// Shared redemption path: match the code, check expiry, consume atomically.
///
/// Used by both the code-check endpoint and two-factor login, which runs it
/// inside the same transaction that issues the session token.
pub(crate) async fn redeem_code(
    conn: &mut PgConnection,
    token: &str,
    code: &str,
    expected_type: Option<VerificationCodeType>,
    now: DateTime<Utc>,
) -> Result<VerificationCode, ApiAuthError> {
    let verification = require_code(&mut *conn, token).await?;
    if let Some(expected) = expected_type {
        if verification.verification_type != expected {
            return Err(ApiAuthError::CodeNotFound);
        }
    }
    if !codes_match(code, &verification.code) {
        return Err(ApiAuthError::BadVerificationCode);
    }
    if verification.is_expired(now) {
        return Err(ApiAuthError::VerificationCodeExpired);
    }
    if VerificationCode::consume(&mut *conn, token).await? != 1 {
        return Err(ApiAuthError::CodeAlreadyConsumed);
    }
    Ok(verification)
}

async fn require_code(
    conn: &mut PgConnection,
    token: &str,
) -> Result<VerificationCode, ApiAuthError> {
    if token.is_empty() {
        return Err(ApiAuthError::CodeNotFound);
    }
    VerificationCode::find_by_token(conn, token)
        .await?
        .ok_or(ApiAuthError::CodeNotFound)
}

/// ACCOUNT_2FA and PASSWORD_RESET codes verify an account id.
pub(crate) fn parse_account_value(value: &str) -> Result<Uuid, ApiAuthError> {
    value.parse().map_err(|_| {
        ApiAuthError::Internal(format!(
            "verification code value {value:?} failed to parse into an account id"
        ))
    })
}

pub(crate) async fn primary_contacts(
    conn: &mut PgConnection,
    account: &Account,
) -> Result<(String, String), ApiAuthError> {
    let email_id = account.primary_email_id.ok_or_else(|| {
        ApiAuthError::Internal(format!("account {} has no primary email", account.id))
    })?;
    let phone_id = account.primary_phone_id.ok_or_else(|| {
        ApiAuthError::Internal(format!("account {} has no primary phone", account.id))
    })?;
    let email = AccountEmail::find_by_id(&mut *conn, email_id)
        .await?
        .ok_or_else(|| {
            ApiAuthError::Internal(format!("primary email row {email_id} is missing"))
        })?;
    let phone = AccountPhone::find_by_id(&mut *conn, phone_id)
        .await?
        .ok_or_else(|| {
            ApiAuthError::Internal(format!("primary phone row {phone_id} is missing"))
        })?;
    Ok((email.email, phone.phone_number))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn account_value_must_be_a_uuid() {
        assert!(parse_account_value("not-a-uuid").is_err());
        let id = Uuid::new_v4();
        assert_eq!(parse_account_value(&id.to_string()).unwrap(), id);
    }
}
