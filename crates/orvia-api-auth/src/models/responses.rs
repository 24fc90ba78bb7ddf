//! Response DTOs for the auth endpoints.

use serde::Serialize;
use uuid::Uuid;

use orvia_db::models::Account;

use crate::services::{AuthTokenDetails, IssuedCode, PasswordResetContext};

/// A session token as returned to clients.
#[derive(Debug, Clone, Serialize)]
pub struct AuthTokenResponse {
    /// Plain token value; the stored row carries the attributed form.
    pub value: String,
    pub expiration_epoch: i64,
    /// Base64 client encryption key, constant across rotations.
    pub client_encryption_key: String,
}

impl From<AuthTokenDetails> for AuthTokenResponse {
    fn from(details: AuthTokenDetails) -> Self {
        Self {
            value: details.value,
            expiration_epoch: details.expiration_epoch,
            client_encryption_key: details.client_encryption_key,
        }
    }
}

/// Public account fields.
#[derive(Debug, Clone, Serialize)]
pub struct AccountSummary {
    pub id: Uuid,
    pub first_name: String,
    pub last_name: String,
}

impl From<&Account> for AccountSummary {
    fn from(account: &Account) -> Self {
        Self {
            id: account.id,
            first_name: account.first_name.clone(),
            last_name: account.last_name.clone(),
        }
    }
}

/// Login response: either a session or a two-factor challenge.
#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum LoginResponse {
    Success {
        token: AuthTokenResponse,
        account: AccountSummary,
    },
    TwoFactorRequired {
        two_factor_required: bool,
        phone_number: String,
        verification_token: String,
        expiration_epoch: i64,
    },
}

#[derive(Debug, Serialize)]
pub struct CheckAuthenticationResponse {
    pub is_authenticated: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub token: Option<AuthTokenResponse>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub account: Option<AccountSummary>,
}

#[derive(Debug, Serialize)]
pub struct VerificationCodeResponse {
    pub token: String,
    pub code: String,
    #[serde(rename = "type")]
    pub verification_type: String,
    pub expiration_epoch: i64,
}

impl From<IssuedCode> for VerificationCodeResponse {
    fn from(issued: IssuedCode) -> Self {
        Self {
            token: issued.token,
            code: issued.code,
            verification_type: issued.verification_type.to_string(),
            expiration_epoch: issued.expiration_epoch,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct CheckVerificationCodeResponse {
    pub value: String,
    /// Present only for ACCOUNT_2FA codes.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub account: Option<AccountSummary>,
}

#[derive(Debug, Serialize)]
pub struct PasswordResetTokenResponse {
    pub token: String,
}

#[derive(Debug, Serialize)]
pub struct CheckPasswordResetTokenResponse {
    pub account_id: Uuid,
    pub account_email: String,
    pub account_phone_number: String,
}

impl From<PasswordResetContext> for CheckPasswordResetTokenResponse {
    fn from(context: PasswordResetContext) -> Self {
        Self {
            account_id: context.account_id,
            account_email: context.account_email,
            account_phone_number: context.account_phone_number,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct VerifiedValueResponse {
    pub value: String,
}

#[derive(Debug, Serialize)]
pub struct AccountResponse {
    pub account: AccountSummary,
}
