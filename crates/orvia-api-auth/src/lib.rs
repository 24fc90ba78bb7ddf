//! HTTP surface for the Orvia auth service.
//!
//! Bearer session tokens with rotate-on-check lifecycle, verification codes
//! for contact points, two-factor login, and password reset.

pub mod error;
pub mod handlers;
pub mod models;
pub mod router;
pub mod services;

pub use error::ApiAuthError;
pub use router::{auth_router, AuthState};
