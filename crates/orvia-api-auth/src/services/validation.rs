//! Contact-point normalization.

use crate::error::ApiAuthError;

/// Lowercase and trim an email address, rejecting obviously malformed input.
pub fn normalize_email(email: &str) -> Result<String, ApiAuthError> {
    let normalized = email.trim().to_lowercase();
    if normalized.is_empty() || !validator::ValidateEmail::validate_email(&normalized) {
        return Err(ApiAuthError::InvalidEmail(email.to_string()));
    }
    Ok(normalized)
}

/// Normalize a phone number to `+` followed by 10 to 15 digits.
///
/// Bare 10-digit national numbers get a `+1` country code; anything else must
/// already carry one.
pub fn normalize_phone(phone: &str) -> Result<String, ApiAuthError> {
    let trimmed = phone.trim();
    let had_plus = trimmed.starts_with('+');
    let digits: String = trimmed.chars().filter(char::is_ascii_digit).collect();
    if trimmed
        .chars()
        .any(|c| !c.is_ascii_digit() && !matches!(c, '+' | '-' | '.' | ' ' | '(' | ')'))
    {
        return Err(ApiAuthError::InvalidPhoneNumber(phone.to_string()));
    }
    let normalized = if !had_plus && digits.len() == 10 {
        format!("+1{digits}")
    } else if digits.len() >= 10 && digits.len() <= 15 {
        format!("+{digits}")
    } else {
        return Err(ApiAuthError::InvalidPhoneNumber(phone.to_string()));
    };
    Ok(normalized)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn email_is_lowercased_and_trimmed() {
        assert_eq!(
            normalize_email("  Ada@Example.COM ").unwrap(),
            "ada@example.com"
        );
    }

    #[test]
    fn malformed_email_is_rejected() {
        for bad in ["", "no-at-sign", "a@", "@b.com", "   "] {
            assert!(matches!(
                normalize_email(bad),
                Err(ApiAuthError::InvalidEmail(_))
            ));
        }
    }

    #[test]
    fn national_number_gets_country_code() {
        assert_eq!(normalize_phone("555-123-4567").unwrap(), "+15551234567");
        assert_eq!(normalize_phone("(555) 123 4567").unwrap(), "+15551234567");
    }

    #[test]
    fn international_number_keeps_digits() {
        assert_eq!(normalize_phone("+44 20 7946 0958").unwrap(), "+442079460958");
    }

    #[test]
    fn malformed_phone_is_rejected() {
        for bad in ["", "12345", "555-123-456789012345", "not a number"] {
            assert!(matches!(
                normalize_phone(bad),
                Err(ApiAuthError::InvalidPhoneNumber(_))
            ));
        }
    }
}
