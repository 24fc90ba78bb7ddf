//! Account lookup endpoint.
//!
//! GET /accounts/:id - public account summary.

use std::sync::Arc;

use axum::{
    extract::Path,
    http::StatusCode,
    Extension, Json,
};

use orvia_core::AccountId;

use crate::error::ApiAuthError;
use crate::models::AccountResponse;
use crate::services::SessionService;

pub async fn get_account_handler(
    Extension(session_service): Extension<Arc<SessionService>>,
    Path(id): Path<String>,
) -> Result<(StatusCode, Json<AccountResponse>), ApiAuthError> {
    let id: AccountId = id
        .parse()
        .map_err(|_| ApiAuthError::Validation("Unable to parse provided account ID".to_string()))?;
    let account = session_service.get_account(id.into_uuid()).await?;
    Ok((
        StatusCode::OK,
        Json(AccountResponse {
            account: (&account).into(),
        }),
    ))
}
