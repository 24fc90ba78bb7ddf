//! Credential primitives for the Orvia auth service.
//!
//! Password hashing (Argon2id), opaque token and numeric code minting, and
//! HMAC-SHA-512 client key derivation. Everything here is pure with respect
//! to storage; persistence lives in `orvia-db`.

pub mod error;
pub mod password;
pub mod signer;
pub mod token;

pub use error::AuthError;
pub use password::{HashCost, PasswordHasher};
pub use signer::ClientKeySigner;
pub use token::{
    append_attributes, codes_match, generate_numeric_code, generate_token, MAX_TOKEN_SIZE,
    TOKEN_BYTES,
};
