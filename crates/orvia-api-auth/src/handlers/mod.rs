//! HTTP handlers for the auth endpoints.

pub mod accounts;
pub mod check;
pub mod login;
pub mod logout;
pub mod password_reset;
pub mod signup;
pub mod verification;

pub use accounts::get_account_handler;
pub use check::check_authentication_handler;
pub use login::{login_handler, login_with_code_handler};
pub use logout::logout_handler;
pub use password_reset::{
    check_password_reset_handler, complete_password_reset_handler, request_password_reset_handler,
};
pub use signup::create_account_handler;
pub use verification::{
    check_verification_code_handler, create_verification_code_handler, verified_value_handler,
};

use validator::Validate;

use crate::error::ApiAuthError;

/// Run derive-based request validation, flattening field errors into one
/// message.
pub(crate) fn validate_request<T: Validate>(request: &T) -> Result<(), ApiAuthError> {
    request.validate().map_err(|e| {
        let errors: Vec<String> = e
            .field_errors()
            .values()
            .flat_map(|errors| {
                errors
                    .iter()
                    .filter_map(|e| e.message.as_ref().map(std::string::ToString::to_string))
            })
            .collect();
        ApiAuthError::Validation(errors.join(", "))
    })
}
