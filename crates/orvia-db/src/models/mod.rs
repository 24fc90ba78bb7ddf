//! Row models for the auth schema.

pub mod account;
pub mod account_email;
pub mod account_event;
pub mod account_phone;
pub mod auth_token;
pub mod two_factor_login;
pub mod verification_code;

pub use account::{Account, AccountStatus, AccountType, NewAccount};
pub use account_email::{AccountEmail, ContactStatus, NewAccountEmail};
pub use account_event::AccountEvent;
pub use account_phone::{AccountPhone, NewAccountPhone};
pub use auth_token::{AuthToken, NewAuthToken};
pub use two_factor_login::TwoFactorLogin;
pub use verification_code::{NewVerificationCode, VerificationCode, VerificationCodeType};
