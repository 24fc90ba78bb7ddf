//! Login endpoint handlers.
//!
//! POST /auth/login - password login, possibly answering with a two-factor
//! challenge.
//! POST /auth/login/code - redeem the challenge and receive the session.

use std::sync::Arc;

use axum::{http::StatusCode, Extension, Json};

use crate::error::ApiAuthError;
use crate::handlers::validate_request;
use crate::models::{LoginRequest, LoginResponse, LoginWithCodeRequest};
use crate::services::{LoginOutcome, SessionService};

pub async fn login_handler(
    Extension(session_service): Extension<Arc<SessionService>>,
    Json(request): Json<LoginRequest>,
) -> Result<(StatusCode, Json<LoginResponse>), ApiAuthError> {
    validate_request(&request)?;

    let outcome = session_service
        .authenticate_login(
            &request.email,
            &request.password,
            &request.device_id,
            request.token_attributes,
        )
        .await?;

    let response = match outcome {
        LoginOutcome::Success { token, account } => {
            tracing::info!(account_id = %account.id, "login succeeded");
            LoginResponse::Success {
                token: token.into(),
                account: (&account).into(),
            }
        }
        LoginOutcome::TwoFactorRequired {
            phone_number,
            verification_token,
            expiration_epoch,
        } => LoginResponse::TwoFactorRequired {
            two_factor_required: true,
            phone_number,
            verification_token,
            expiration_epoch,
        },
    };
    Ok((StatusCode::OK, Json(response)))
}

pub async fn login_with_code_handler(
    Extension(session_service): Extension<Arc<SessionService>>,
    Json(request): Json<LoginWithCodeRequest>,
) -> Result<(StatusCode, Json<LoginResponse>), ApiAuthError> {
    validate_request(&request)?;

    let (token, account) = session_service
        .login_with_code(
            &request.token,
            &request.code,
            &request.device_id,
            request.token_attributes,
        )
        .await?;
    tracing::info!(account_id = %account.id, "two factor login succeeded");

    Ok((
        StatusCode::OK,
        Json(LoginResponse::Success {
            token: token.into(),
            account: (&account).into(),
        }),
    ))
}
