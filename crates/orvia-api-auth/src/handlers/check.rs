//! Token validation endpoint.
//!
//! POST /auth/check - validate a bearer token, rotating it when due.

use std::sync::Arc;

use axum::{http::StatusCode, Extension, Json};

use crate::error::ApiAuthError;
use crate::handlers::validate_request;
use crate::models::{CheckAuthenticationRequest, CheckAuthenticationResponse};
use crate::services::SessionService;

pub async fn check_authentication_handler(
    Extension(session_service): Extension<Arc<SessionService>>,
    Json(request): Json<CheckAuthenticationRequest>,
) -> Result<(StatusCode, Json<CheckAuthenticationResponse>), ApiAuthError> {
    validate_request(&request)?;

    let response = match session_service
        .check_authentication(&request.token, request.token_attributes)
        .await?
    {
        Some((token, account)) => CheckAuthenticationResponse {
            is_authenticated: true,
            token: Some(token.into()),
            account: Some((&account).into()),
        },
        None => CheckAuthenticationResponse {
            is_authenticated: false,
            token: None,
            account: None,
        },
    };
    Ok((StatusCode::OK, Json(response)))
}
