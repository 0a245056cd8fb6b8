//! Common validation rules shared across request payloads.

use std::borrow::Cow;
use validator::ValidationError;

/// Special characters accepted by the password policy.
pub const PASSWORD_SPECIAL_CHARS: &str = "@$!%*?&#";

/// Collects every failed password-strength rule, not just the first.
///
/// Requirements:
/// - At least 8 characters
/// - At least one uppercase letter
/// - At least one lowercase letter
/// - At least one digit
/// - At least one special character from [`PASSWORD_SPECIAL_CHARS`]
pub fn password_strength_violations(password: &str) -> Vec<String> {
    let mut violations = Vec::new();

    if password.chars().count() < 8 {
        violations.push("Password must contain at least 8 characters.".to_string());
    }
    if !password.chars().any(|c| c.is_ascii_uppercase()) {
        violations.push("Password must contain at least one uppercase letter.".to_string());
    }
    if !password.chars().any(|c| c.is_ascii_lowercase()) {
        violations.push("Password must contain at least one lowercase letter.".to_string());
    }
    if !password.chars().any(|c| c.is_ascii_digit()) {
        violations.push("Password must contain at least one digit.".to_string());
    }
    if !password.chars().any(|c| PASSWORD_SPECIAL_CHARS.contains(c)) {
        violations.push(format!(
            "Password must contain at least one special character: {}.",
            PASSWORD_SPECIAL_CHARS
        ));
    }

    violations
}

/// Validator-compatible wrapper around [`password_strength_violations`].
///
/// The message carries every failed rule so callers see the full list.
pub fn validate_password_strength(password: &str) -> Result<(), ValidationError> {
    let violations = password_strength_violations(password);
    if violations.is_empty() {
        return Ok(());
    }

    let mut error = ValidationError::new("password_strength");
    error.message = Some(Cow::Owned(violations.join(" ")));
    Err(error)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strong_password_passes() {
        assert!(password_strength_violations("Str0ng!pass").is_empty());
        assert!(validate_password_strength("Str0ng!pass").is_ok());
    }

    #[test]
    fn missing_digit_reports_exactly_that_rule() {
        let violations = password_strength_violations("Strong!pass");
        assert_eq!(violations.len(), 1);
        assert!(violations[0].contains("digit"));
    }

    #[test]
    fn weak_password_reports_every_failed_rule() {
        let violations = password_strength_violations("abc");
        assert_eq!(violations.len(), 4);
        assert!(violations.iter().any(|v| v.contains("8 characters")));
        assert!(violations.iter().any(|v| v.contains("uppercase")));
        assert!(violations.iter().any(|v| v.contains("digit")));
        assert!(violations.iter().any(|v| v.contains("special character")));
    }

    #[test]
    fn validator_message_joins_all_rules() {
        let err = validate_password_strength("alllowercase").unwrap_err();
        let message = err.message.expect("message");
        assert!(message.contains("uppercase"));
        assert!(message.contains("digit"));
        assert!(message.contains("special character"));
    }
}
