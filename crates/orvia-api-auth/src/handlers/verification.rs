//! Verification-code endpoints.
//!
//! POST /verification-codes - issue a code for a value.
//! POST /verification-codes/check - redeem a code.
//! GET /verification-codes/:token/value - read back a verified value.

use std::sync::Arc;

use axum::{extract::Path, http::StatusCode, Extension, Json};

use orvia_db::models::VerificationCodeType;

use crate::error::ApiAuthError;
use crate::handlers::validate_request;
use crate::models::{
    CheckVerificationCodeRequest, CheckVerificationCodeResponse, CreateVerificationCodeRequest,
    VerificationCodeResponse, VerifiedValueResponse,
};
use crate::services::{SessionService, VerificationService};

pub async fn create_verification_code_handler(
    Extension(verification_service): Extension<Arc<VerificationService>>,
    Json(request): Json<CreateVerificationCodeRequest>,
) -> Result<(StatusCode, Json<VerificationCodeResponse>), ApiAuthError> {
    validate_request(&request)?;
    let issued = verification_service
        .issue(&request.value_to_verify, request.verification_type)
        .await?;
    Ok((StatusCode::CREATED, Json(issued.into())))
}

pub async fn check_verification_code_handler(
    Extension(verification_service): Extension<Arc<VerificationService>>,
    Extension(session_service): Extension<Arc<SessionService>>,
    Json(request): Json<CheckVerificationCodeRequest>,
) -> Result<(StatusCode, Json<CheckVerificationCodeResponse>), ApiAuthError> {
    validate_request(&request)?;
    let verification = verification_service
        .redeem(&request.token, &request.code, None)
        .await?;

    // An ACCOUNT_2FA code verifies an account id, so the caller gets the
    // account summary back as well.
    let account = if verification.verification_type == VerificationCodeType::Account2fa {
        let account_id =
            crate::services::verification_service::parse_account_value(&verification.verified_value)?;
        let account = session_service.get_account(account_id).await?;
        Some((&account).into())
    } else {
        None
    };

    Ok((
        StatusCode::OK,
        Json(CheckVerificationCodeResponse {
            value: verification.verified_value,
            account,
        }),
    ))
}

pub async fn verified_value_handler(
    Extension(verification_service): Extension<Arc<VerificationService>>,
    Path(token): Path<String>,
) -> Result<(StatusCode, Json<VerifiedValueResponse>), ApiAuthError> {
    let value = verification_service.verified_value(&token).await?;
    Ok((StatusCode::OK, Json(VerifiedValueResponse { value })))
}
