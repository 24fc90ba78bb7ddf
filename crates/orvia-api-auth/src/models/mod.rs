//! Request and response DTOs.

pub mod requests;
pub mod responses;

pub use requests::{
    CheckAuthenticationRequest, CheckPasswordResetTokenRequest, CheckVerificationCodeRequest,
    CompletePasswordResetRequest, CreateAccountRequest, CreateVerificationCodeRequest,
    LoginRequest, LoginWithCodeRequest, LogoutRequest, PasswordResetRequest,
};
pub use responses::{
    AccountResponse, AccountSummary, AuthTokenResponse, CheckAuthenticationResponse,
    CheckPasswordResetTokenResponse, CheckVerificationCodeResponse, LoginResponse,
    PasswordResetTokenResponse, VerificationCodeResponse, VerifiedValueResponse,
};
