//! Error types for credential primitives.

use thiserror::Error;

/// Failures in password hashing, token minting, or key derivation.
#[derive(Debug, Clone, Error)]
pub enum AuthError {
    /// Password hashing operation failed.
    #[error("password hashing failed: {0}")]
    HashingFailed(String),

    /// A stored password hash is not in PHC format.
    #[error("invalid password hash format")]
    InvalidHashFormat,

    /// Key derivation failed (bad key material).
    #[error("key derivation failed: {0}")]
    KeyDerivationFailed(String),

    /// The attributed token exceeded the size ceiling.
    ///
    /// Attribute maps are caller-supplied, so the serialized token length is
    /// capped to keep attacker-controlled input from growing stored tokens
    /// without bound.
    #[error("attributed token is {0} bytes, ceiling is {max}", max = crate::token::MAX_TOKEN_SIZE)]
    TokenTooLong(usize),
}

impl AuthError {
    /// Whether this error came from password hashing.
    #[must_use]
    pub fn is_password_error(&self) -> bool {
        matches!(
            self,
            AuthError::HashingFailed(_) | AuthError::InvalidHashFormat
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_includes_ceiling() {
        let msg = AuthError::TokenTooLong(300).to_string();
        assert!(msg.contains("300"));
        assert!(msg.contains("250"));
    }

    #[test]
    fn password_error_classification() {
        assert!(AuthError::InvalidHashFormat.is_password_error());
        assert!(!AuthError::TokenTooLong(10).is_password_error());
    }
}
