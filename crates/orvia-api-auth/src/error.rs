//! Error types for the auth API.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

use crate::services::settings::SettingsError;

/// Errors surfaced by the auth endpoints.
#[derive(Debug, Error)]
pub enum ApiAuthError {
    /// No active account owns the given email.
    #[error("Unknown email: {0}")]
    EmailNotFound(String),

    /// No account with the given id.
    #[error("Account not found")]
    AccountNotFound,

    /// No verification code maps to the given token.
    #[error("No verification code maps to the provided token")]
    CodeNotFound,

    /// Password does not match the account.
    #[error("The password does not match the provided account email")]
    BadPassword,

    /// The account exists but may not authenticate.
    #[error("The account is not active")]
    AccountInactive,

    /// Submitted code does not match the one on file.
    #[error("The code mapped to the provided token does not match")]
    BadVerificationCode,

    /// The code's redemption window has closed.
    #[error("The code mapped to the provided token has expired")]
    VerificationCodeExpired,

    /// A second redemption of an already-consumed code.
    #[error("The code mapped to the provided token was already used")]
    CodeAlreadyConsumed,

    /// Verified-value read before the code was consumed.
    #[error("The value mapped to this token has not yet been verified")]
    NotYetVerified,

    /// The email is already claimed by an active account.
    #[error("The email {0} is already in use by an account")]
    DuplicateEmail(String),

    /// The email failed syntactic validation.
    #[error("The provided email is not valid: {0}")]
    InvalidEmail(String),

    /// The phone number failed normalization.
    #[error("The provided phone number is not valid: {0}")]
    InvalidPhoneNumber(String),

    /// Request-shape validation failure.
    #[error("Validation error: {0}")]
    Validation(String),

    /// Credential primitive failure (hashing, key derivation, token size).
    #[error(transparent)]
    Auth(#[from] orvia_auth::AuthError),

    /// Database failure.
    #[error(transparent)]
    Database(#[from] sqlx::Error),

    /// Settings collaborator failure.
    #[error(transparent)]
    Settings(#[from] SettingsError),

    /// Invariant violation with no client-actionable remedy.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<orvia_db::DbError> for ApiAuthError {
    fn from(err: orvia_db::DbError) -> Self {
        match err {
            orvia_db::DbError::QueryFailed(e) => ApiAuthError::Database(e),
            other => ApiAuthError::Internal(other.to_string()),
        }
    }
}

/// Error response body.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
}

impl IntoResponse for ApiAuthError {
    fn into_response(self) -> Response {
        let (status, error_code, message) = match &self {
            ApiAuthError::EmailNotFound(_) => {
                (StatusCode::NOT_FOUND, "email_not_found", self.to_string())
            }
            ApiAuthError::AccountNotFound => {
                (StatusCode::NOT_FOUND, "account_not_found", self.to_string())
            }
            ApiAuthError::CodeNotFound => {
                (StatusCode::NOT_FOUND, "code_not_found", self.to_string())
            }
            ApiAuthError::BadPassword => {
                (StatusCode::FORBIDDEN, "bad_password", self.to_string())
            }
            ApiAuthError::AccountInactive => {
                (StatusCode::FORBIDDEN, "account_inactive", self.to_string())
            }
            ApiAuthError::BadVerificationCode => (
                StatusCode::BAD_REQUEST,
                "bad_verification_code",
                self.to_string(),
            ),
            ApiAuthError::VerificationCodeExpired => (
                StatusCode::GONE,
                "verification_code_expired",
                self.to_string(),
            ),
            ApiAuthError::CodeAlreadyConsumed => {
                (StatusCode::GONE, "code_already_consumed", self.to_string())
            }
            ApiAuthError::NotYetVerified => {
                (StatusCode::CONFLICT, "not_yet_verified", self.to_string())
            }
            ApiAuthError::DuplicateEmail(_) => {
                (StatusCode::BAD_REQUEST, "duplicate_email", self.to_string())
            }
            ApiAuthError::InvalidEmail(_) => {
                (StatusCode::BAD_REQUEST, "invalid_email", self.to_string())
            }
            ApiAuthError::InvalidPhoneNumber(_) => (
                StatusCode::BAD_REQUEST,
                "invalid_phone_number",
                self.to_string(),
            ),
            ApiAuthError::Validation(msg) => {
                (StatusCode::BAD_REQUEST, "validation_error", msg.clone())
            }
            ApiAuthError::Auth(e) => {
                tracing::error!("Credential primitive error: {}", e);
                internal()
            }
            ApiAuthError::Database(e) => {
                tracing::error!("Database error: {}", e);
                internal()
            }
            ApiAuthError::Settings(e) => {
                tracing::error!("Settings lookup error: {}", e);
                internal()
            }
            ApiAuthError::Internal(msg) => {
                tracing::error!("Internal error: {}", msg);
                internal()
            }
        };

        let body = ErrorResponse {
            error: error_code.to_string(),
            message,
        };
        (status, Json(body)).into_response()
    }
}

fn internal() -> (StatusCode, &'static str, String) {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        "internal_error",
        "An unexpected error occurred".to_string(),
    )
}
