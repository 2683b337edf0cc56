//! Email normalization and validation.

use validator::ValidateEmail;

/// Trim surrounding whitespace and lower-case an address.
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// Check an address is syntactically valid (HTML5 rules).
pub fn is_valid_email(email: &str) -> bool {
    email.to_string().validate_email()
}
