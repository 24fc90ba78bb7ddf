//! Password-reset endpoints.
//!
//! POST /password-reset/request - mint a PASSWORD_RESET token for an email.
//! POST /password-reset/check - validate and consume the reset token.
//! POST /password-reset/complete - set the new password and revoke sessions.

use std::sync::Arc;

use axum::{http::StatusCode, Extension, Json};

use orvia_db::models::VerificationCodeType;

use crate::error::ApiAuthError;
use crate::handlers::validate_request;
use crate::models::{
    CheckPasswordResetTokenRequest, CheckPasswordResetTokenResponse,
    CompletePasswordResetRequest, PasswordResetRequest, PasswordResetTokenResponse,
};
use crate::services::{SessionService, VerificationService};

pub async fn request_password_reset_handler(
    Extension(session_service): Extension<Arc<SessionService>>,
    Extension(verification_service): Extension<Arc<VerificationService>>,
    Json(request): Json<PasswordResetRequest>,
) -> Result<(StatusCode, Json<PasswordResetTokenResponse>), ApiAuthError> {
    validate_request(&request)?;
    let account = session_service.account_for_email(&request.email).await?;
    let issued = verification_service
        .issue(
            &account.id.to_string(),
            VerificationCodeType::PasswordReset,
        )
        .await?;
    // Only the token leaves here; the code is delivered out of band.
    Ok((
        StatusCode::CREATED,
        Json(PasswordResetTokenResponse {
            token: issued.token,
        }),
    ))
}

pub async fn check_password_reset_handler(
    Extension(verification_service): Extension<Arc<VerificationService>>,
    Json(request): Json<CheckPasswordResetTokenRequest>,
) -> Result<(StatusCode, Json<CheckPasswordResetTokenResponse>), ApiAuthError> {
    validate_request(&request)?;
    let context = verification_service
        .check_password_reset(&request.token)
        .await?;
    Ok((StatusCode::OK, Json(context.into())))
}

pub async fn complete_password_reset_handler(
    Extension(session_service): Extension<Arc<SessionService>>,
    Json(request): Json<CompletePasswordResetRequest>,
) -> Result<StatusCode, ApiAuthError> {
    validate_request(&request)?;
    session_service
        .update_password(&request.token, &request.code, &request.new_password)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}
