//! Account creation endpoint.
//!
//! POST /accounts - create an account with its primary contact rows and a
//! first session, in one transaction.

use std::sync::Arc;

use axum::{http::StatusCode, Extension, Json};

use crate::error::ApiAuthError;
use crate::handlers::validate_request;
use crate::models::{CreateAccountRequest, LoginResponse};
use crate::services::{CreateAccountInput, SessionService};

pub async fn create_account_handler(
    Extension(session_service): Extension<Arc<SessionService>>,
    Json(request): Json<CreateAccountRequest>,
) -> Result<(StatusCode, Json<LoginResponse>), ApiAuthError> {
    validate_request(&request)?;

    let (token, account) = session_service
        .create_account(CreateAccountInput {
            first_name: request.first_name,
            last_name: request.last_name,
            email: request.email,
            phone_number: request.phone_number,
            password: request.password,
            account_type: request.account_type,
            token_attributes: request.token_attributes,
        })
        .await?;
    tracing::info!(account_id = %account.id, "account created");

    Ok((
        StatusCode::CREATED,
        Json(LoginResponse::Success {
            token: token.into(),
            account: (&account).into(),
        }),
    ))
}
