//! Auth API router configuration.
//!
//! Routes:
//! - POST /auth/login
//! - POST /auth/login/code
//! - POST /auth/check
//! - POST /auth/logout
//! - POST /accounts
//! - GET /accounts/:id
//! - POST /verification-codes
//! - POST /verification-codes/check
//! - GET /verification-codes/:token/value
//! - POST /password-reset/request
//! - POST /password-reset/check
//! - POST /password-reset/complete

use std::sync::Arc;

use axum::{
    routing::{get, post},
    Extension, Router,
};

use crate::handlers::{
    check_authentication_handler, check_password_reset_handler,
    check_verification_code_handler, complete_password_reset_handler, create_account_handler,
    create_verification_code_handler, get_account_handler, login_handler,
    login_with_code_handler, logout_handler, request_password_reset_handler,
    verified_value_handler,
};
use crate::services::{SessionService, VerificationService};

/// Shared state injected into every handler.
#[derive(Clone)]
pub struct AuthState {
    pub session_service: Arc<SessionService>,
    pub verification_service: Arc<VerificationService>,
}

impl AuthState {
    #[must_use]
    pub fn new(
        session_service: Arc<SessionService>,
        verification_service: Arc<VerificationService>,
    ) -> Self {
        Self {
            session_service,
            verification_service,
        }
    }
}

/// Build the full auth router.
pub fn auth_router(state: AuthState) -> Router {
    let auth_routes = Router::new()
        .route("/login", post(login_handler))
        .route("/login/code", post(login_with_code_handler))
        .route("/check", post(check_authentication_handler))
        .route("/logout", post(logout_handler));

    let account_routes = Router::new()
        .route("/", post(create_account_handler))
        .route("/:id", get(get_account_handler));

    let verification_routes = Router::new()
        .route("/", post(create_verification_code_handler))
        .route("/check", post(check_verification_code_handler))
        .route("/:token/value", get(verified_value_handler));

    let password_reset_routes = Router::new()
        .route("/request", post(request_password_reset_handler))
        .route("/check", post(check_password_reset_handler))
        .route("/complete", post(complete_password_reset_handler));

    Router::new()
        .nest("/auth", auth_routes)
        .nest("/accounts", account_routes)
        .nest("/verification-codes", verification_routes)
        .nest("/password-reset", password_reset_routes)
        .layer(Extension(state.session_service))
        .layer(Extension(state.verification_service))
}
