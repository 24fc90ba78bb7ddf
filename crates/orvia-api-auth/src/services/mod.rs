//! Domain services behind the auth endpoints.

pub mod session_service;
pub mod session_state;
pub mod settings;
pub mod validation;
pub mod verification_service;

pub use session_service::{
    AuthTokenDetails, CreateAccountInput, LoginOutcome, SessionService,
};
pub use session_state::{
    session_state, should_rotate, SessionState, MAX_LIFECYCLE_DAYS, REFRESH_WINDOW_SECS,
    SESSION_TTL_DAYS, SHADOW_TTL_SECS, TWO_FACTOR_TRUST_DAYS,
};
pub use settings::{HttpSettingsClient, SettingsClient, SettingsError, StaticSettingsClient};
pub use verification_service::{
    IssuedCode, PasswordResetContext, VerificationService, CODE_DIGITS, CODE_TTL_MINUTES,
};
