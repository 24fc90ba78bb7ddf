//! Request DTOs for the auth endpoints.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use validator::Validate;

use orvia_db::models::{AccountType, VerificationCodeType};

/// Password login payload.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(email(message = "Invalid email format"))]
    pub email: String,

    /// Length cap bounds the CPU spent hashing attacker-supplied input.
    #[validate(length(min = 1, max = 1024, message = "Password must be 1-1024 characters"))]
    pub password: String,

    #[serde(default)]
    pub device_id: String,

    #[serde(default)]
    pub token_attributes: HashMap<String, String>,
}

/// Two-factor login payload.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct LoginWithCodeRequest {
    #[validate(length(min = 1, message = "Token cannot be empty"))]
    pub token: String,

    #[validate(length(min = 1, message = "Code cannot be empty"))]
    pub code: String,

    #[serde(default)]
    pub device_id: String,

    #[serde(default)]
    pub token_attributes: HashMap<String, String>,
}

/// Token validation payload.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CheckAuthenticationRequest {
    #[validate(length(min = 1, message = "Token cannot be empty"))]
    pub token: String,

    #[serde(default)]
    pub token_attributes: HashMap<String, String>,
}

/// Logout payload.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct LogoutRequest {
    #[validate(length(min = 1, message = "Token cannot be empty"))]
    pub token: String,

    #[serde(default)]
    pub token_attributes: HashMap<String, String>,
}

/// Account creation payload.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateAccountRequest {
    #[validate(length(min = 1, message = "FirstName cannot be empty"))]
    pub first_name: String,

    #[validate(length(min = 1, message = "LastName cannot be empty"))]
    pub last_name: String,

    #[validate(length(min = 1, message = "Email cannot be empty"))]
    pub email: String,

    #[validate(length(min = 1, message = "PhoneNumber cannot be empty"))]
    pub phone_number: String,

    #[validate(length(min = 1, max = 1024, message = "Password cannot be empty"))]
    pub password: String,

    pub account_type: AccountType,

    #[serde(default)]
    pub token_attributes: HashMap<String, String>,
}

/// Verification-code issuance payload.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateVerificationCodeRequest {
    #[validate(length(min = 1, message = "ValueToVerify cannot be empty"))]
    pub value_to_verify: String,

    #[serde(rename = "type")]
    pub verification_type: VerificationCodeType,
}

/// Verification-code redemption payload.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CheckVerificationCodeRequest {
    #[validate(length(min = 1, message = "Token cannot be empty"))]
    pub token: String,

    #[validate(length(min = 1, message = "Code cannot be empty"))]
    pub code: String,
}

/// Password-reset initiation payload.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct PasswordResetRequest {
    #[validate(email(message = "Invalid email format"))]
    pub email: String,
}

/// Password-reset token check payload.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CheckPasswordResetTokenRequest {
    #[validate(length(min = 1, message = "Token cannot be empty"))]
    pub token: String,
}

/// Password-reset completion payload.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CompletePasswordResetRequest {
    #[validate(length(min = 1, message = "Token cannot be empty"))]
    pub token: String,

    #[validate(length(min = 1, message = "Code cannot be empty"))]
    pub code: String,

    #[validate(length(min = 1, max = 1024, message = "Password cannot be empty"))]
    pub new_password: String,
}
