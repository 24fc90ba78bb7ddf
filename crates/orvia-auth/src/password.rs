//! Password hashing with Argon2id.
//!
//! The cost parameters are plain data handed to the constructor at process
//! start; there is no package-level mutable cost to tweak at runtime.

use crate::error::AuthError;
use argon2::{
    password_hash::{
        rand_core::OsRng, PasswordHash, PasswordHasher as _, PasswordVerifier, SaltString,
    },
    Algorithm, Argon2, Params, Version,
};

/// Argon2id cost parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HashCost {
    /// Memory cost in KiB.
    pub memory_kib: u32,
    /// Number of iterations.
    pub iterations: u32,
    /// Degree of parallelism.
    pub parallelism: u32,
}

impl HashCost {
    /// OWASP-recommended parameters (m=19456 KiB, t=2, p=1).
    #[must_use]
    pub const fn recommended() -> Self {
        Self {
            memory_kib: 19456,
            iterations: 2,
            parallelism: 1,
        }
    }
}

impl Default for HashCost {
    fn default() -> Self {
        Self::recommended()
    }
}

/// One-way credential verification.
///
/// Hashes passwords with Argon2id into PHC strings and verifies candidate
/// passwords against stored hashes.
#[derive(Debug, Clone)]
pub struct PasswordHasher {
    params: Params,
}

impl PasswordHasher {
    /// Build a hasher from explicit cost parameters.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::HashingFailed`] if the parameters are outside the
    /// ranges Argon2 accepts.
    pub fn new(cost: HashCost) -> Result<Self, AuthError> {
        let params = Params::new(cost.memory_kib, cost.iterations, cost.parallelism, None)
            .map_err(|e| AuthError::HashingFailed(format!("invalid cost parameters: {e}")))?;
        Ok(Self { params })
    }

    /// Hash a password, producing a PHC-formatted string with a fresh salt.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::HashingFailed`] if the underlying hash fails.
    pub fn hash(&self, password: &str) -> Result<String, AuthError> {
        let salt = SaltString::generate(&mut OsRng);
        let argon2 = Argon2::new(Algorithm::Argon2id, Version::V0x13, self.params.clone());
        let hash = argon2
            .hash_password(password.as_bytes(), &salt)
            .map_err(|e| AuthError::HashingFailed(e.to_string()))?;
        Ok(hash.to_string())
    }

    /// Verify a password against a stored PHC hash.
    ///
    /// Returns `Ok(false)` for a non-matching password; only a malformed
    /// stored hash is an error.
    pub fn verify(&self, password: &str, hash: &str) -> Result<bool, AuthError> {
        let parsed = PasswordHash::new(hash).map_err(|_| AuthError::InvalidHashFormat)?;
        let argon2 = Argon2::new(Algorithm::Argon2id, Version::V0x13, self.params.clone());
        match argon2.verify_password(password.as_bytes(), &parsed) {
            Ok(()) => Ok(true),
            Err(_) => Ok(false),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // Low-cost parameters so the test suite stays fast.
    fn test_hasher() -> PasswordHasher {
        PasswordHasher::new(HashCost {
            memory_kib: 4096,
            iterations: 1,
            parallelism: 1,
        })
        .unwrap()
    }

    #[test]
    fn hash_is_phc_argon2id() {
        let hash = test_hasher().hash("hunter2").unwrap();
        assert!(hash.starts_with("$argon2id$"));
    }

    #[test]
    fn verify_accepts_matching_password() {
        let hasher = test_hasher();
        let hash = hasher.hash("correct horse").unwrap();
        assert!(hasher.verify("correct horse", &hash).unwrap());
    }

    #[test]
    fn verify_rejects_wrong_password() {
        let hasher = test_hasher();
        let hash = hasher.hash("correct horse").unwrap();
        assert!(!hasher.verify("battery staple", &hash).unwrap());
    }

    #[test]
    fn verify_rejects_malformed_hash() {
        let err = test_hasher().verify("pw", "not-a-phc-string").unwrap_err();
        assert!(matches!(err, AuthError::InvalidHashFormat));
    }

    #[test]
    fn salts_differ_between_hashes() {
        let hasher = test_hasher();
        let a = hasher.hash("same").unwrap();
        let b = hasher.hash("same").unwrap();
        assert_ne!(a, b);
        assert!(hasher.verify("same", &a).unwrap());
        assert!(hasher.verify("same", &b).unwrap());
    }

    #[test]
    fn rejects_zero_memory_cost() {
        let result = PasswordHasher::new(HashCost {
            memory_kib: 0,
            iterations: 1,
            parallelism: 1,
        });
        assert!(result.is_err());
    }
}
