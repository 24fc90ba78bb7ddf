//! Client encryption key derivation.
//!
//! Each session carries a key derived from the bare token with HMAC-SHA-512
//! under a service-wide secret. The key is fixed at issuance; token rotation
//! never re-derives it.

use hmac::{Hmac, Mac};
use sha2::Sha512;

use crate::error::AuthError;

type HmacSha512 = Hmac<Sha512>;

/// Derives per-session client encryption keys.
#[derive(Clone)]
pub struct ClientKeySigner {
    secret: Vec<u8>,
}

impl std::fmt::Debug for ClientKeySigner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClientKeySigner").finish_non_exhaustive()
    }
}

impl ClientKeySigner {
    /// Build a signer from the service secret.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::KeyDerivationFailed`] if the secret is empty.
    pub fn new(secret: impl Into<Vec<u8>>) -> Result<Self, AuthError> {
        let secret = secret.into();
        if secret.is_empty() {
            return Err(AuthError::KeyDerivationFailed(
                "secret must not be empty".to_owned(),
            ));
        }
        Ok(Self { secret })
    }

    /// Derive the 64-byte client encryption key for a bare token.
    pub fn derive_key(&self, token: &str) -> Result<Vec<u8>, AuthError> {
        let mut mac = HmacSha512::new_from_slice(&self.secret)
            .map_err(|e| AuthError::KeyDerivationFailed(e.to_string()))?;
        mac.update(token.as_bytes());
        Ok(mac.finalize().into_bytes().to_vec())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_empty_secret() {
        assert!(ClientKeySigner::new(Vec::new()).is_err());
    }

    #[test]
    fn key_is_64_bytes() {
        let signer = ClientKeySigner::new(b"secret".to_vec()).unwrap();
        assert_eq!(signer.derive_key("token").unwrap().len(), 64);
    }

    #[test]
    fn same_token_same_key() {
        let signer = ClientKeySigner::new(b"secret".to_vec()).unwrap();
        assert_eq!(
            signer.derive_key("tok").unwrap(),
            signer.derive_key("tok").unwrap()
        );
    }

    #[test]
    fn different_tokens_different_keys() {
        let signer = ClientKeySigner::new(b"secret".to_vec()).unwrap();
        assert_ne!(
            signer.derive_key("tok-a").unwrap(),
            signer.derive_key("tok-b").unwrap()
        );
    }

    #[test]
    fn different_secrets_different_keys() {
        let a = ClientKeySigner::new(b"alpha".to_vec()).unwrap();
        let b = ClientKeySigner::new(b"bravo".to_vec()).unwrap();
        assert_ne!(a.derive_key("tok").unwrap(), b.derive_key("tok").unwrap());
    }

    #[test]
    fn debug_does_not_leak_secret() {
        let signer = ClientKeySigner::new(b"topsecret".to_vec()).unwrap();
        let rendered = format!("{signer:?}");
        assert!(!rendered.contains("topsecret"));
    }
}
