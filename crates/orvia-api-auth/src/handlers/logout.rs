//! Logout endpoint.
//!
//! POST /auth/logout - delete the session row for a bearer token.

use std::sync::Arc;

use axum::{http::StatusCode, Extension, Json};

use crate::error::ApiAuthError;
use crate::handlers::validate_request;
use crate::models::LogoutRequest;
use crate::services::SessionService;

pub async fn logout_handler(
    Extension(session_service): Extension<Arc<SessionService>>,
    Json(request): Json<LogoutRequest>,
) -> Result<StatusCode, ApiAuthError> {
    validate_request(&request)?;
    session_service
        .unauthenticate(&request.token, request.token_attributes)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}
