//! Opaque bearer token and numeric code generation.

use std::collections::HashMap;

use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine};
use rand::{rngs::OsRng, Rng, RngCore};
use subtle::ConstantTimeEq;

use crate::error::AuthError;

/// Random bytes per bearer token (43 base64url characters).
pub const TOKEN_BYTES: usize = 32;

/// Ceiling on an attributed token's byte length.
pub const MAX_TOKEN_SIZE: usize = 250;

/// Generate a fresh opaque bearer token from the OS CSPRNG.
#[must_use]
pub fn generate_token() -> String {
    let mut bytes = [0u8; TOKEN_BYTES];
    OsRng.fill_bytes(&mut bytes);
    URL_SAFE_NO_PAD.encode(bytes)
}

/// Generate a zero-padded numeric code of `digits` digits.
#[must_use]
pub fn generate_numeric_code(digits: u32) -> String {
    let ceiling = 10u64.pow(digits);
    let n = OsRng.gen_range(0..ceiling);
    format!("{n:0width$}", width = digits as usize)
}

/// Append client attributes to a token deterministically.
///
/// Keys are sorted so the same token and attribute set always produce the
/// same stored value. With no attributes the token passes through unchanged.
///
/// # Errors
///
/// Returns [`AuthError::TokenTooLong`] when the attributed token reaches
/// [`MAX_TOKEN_SIZE`] bytes.
pub fn append_attributes(
    token: &str,
    attributes: &HashMap<String, String>,
) -> Result<String, AuthError> {
    if attributes.is_empty() {
        return Ok(token.to_owned());
    }
    let mut keys: Vec<&String> = attributes.keys().collect();
    keys.sort();
    let mut out = String::with_capacity(token.len() + 1);
    out.push_str(token);
    out.push(':');
    for key in keys {
        out.push_str(key);
        out.push_str(&attributes[key]);
    }
    if out.len() >= MAX_TOKEN_SIZE {
        return Err(AuthError::TokenTooLong(out.len()));
    }
    Ok(out)
}

/// Compare two codes in constant time.
#[must_use]
pub fn codes_match(candidate: &str, expected: &str) -> bool {
    candidate.as_bytes().ct_eq(expected.as_bytes()).into()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn token_is_43_url_safe_chars() {
        let token = generate_token();
        assert_eq!(token.len(), 43);
        assert!(token
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_'));
    }

    #[test]
    fn tokens_are_unique() {
        assert_ne!(generate_token(), generate_token());
    }

    #[test]
    fn numeric_code_is_zero_padded() {
        for _ in 0..50 {
            let code = generate_numeric_code(6);
            assert_eq!(code.len(), 6);
            assert!(code.chars().all(|c| c.is_ascii_digit()));
        }
    }

    #[test]
    fn codes_match_handles_equal_and_unequal() {
        assert!(codes_match("123456", "123456"));
        assert!(!codes_match("123456", "654321"));
        assert!(!codes_match("123456", "12345"));
    }

    #[test]
    fn no_attributes_passes_token_through() {
        let out = append_attributes("abc", &HashMap::new()).unwrap();
        assert_eq!(out, "abc");
    }

    #[test]
    fn attributes_are_sorted_by_key() {
        let mut attrs = HashMap::new();
        attrs.insert("device".to_owned(), "d1".to_owned());
        attrs.insert("app".to_owned(), "ios".to_owned());
        let out = append_attributes("tok", &attrs).unwrap();
        assert_eq!(out, "tok:appiosdeviced1");
    }

    #[test]
    fn same_attributes_are_deterministic() {
        let mut attrs = HashMap::new();
        attrs.insert("b".to_owned(), "2".to_owned());
        attrs.insert("a".to_owned(), "1".to_owned());
        attrs.insert("c".to_owned(), "3".to_owned());
        let first = append_attributes("t", &attrs).unwrap();
        for _ in 0..10 {
            assert_eq!(append_attributes("t", &attrs).unwrap(), first);
        }
    }

    #[test]
    fn oversized_attributed_token_is_rejected() {
        let mut attrs = HashMap::new();
        attrs.insert("k".to_owned(), "v".repeat(MAX_TOKEN_SIZE));
        let err = append_attributes("tok", &attrs).unwrap_err();
        assert!(matches!(err, AuthError::TokenTooLong(_)));
    }

    #[test]
    fn attributed_token_just_under_ceiling_is_accepted() {
        let token = "t".repeat(40);
        let mut attrs = HashMap::new();
        // 40 + 1 + 1 + value = 249 bytes total.
        attrs.insert("k".to_owned(), "v".repeat(MAX_TOKEN_SIZE - 43));
        let out = append_attributes(&token, &attrs).unwrap();
        assert_eq!(out.len(), MAX_TOKEN_SIZE - 1);
    }
}
