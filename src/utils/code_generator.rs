//! Short code generation and validation utilities.

use crate::error::AppError;
use rand::Rng;
use rand::distr::Alphanumeric;
use regex::Regex;
use serde_json::json;
use std::sync::LazyLock;

/// Length of auto-generated codes.
pub const GENERATED_CODE_LENGTH: usize = 7;

/// Accepted shape of a caller-supplied code.
pub static CODE_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z0-9]{6,8}$").expect("static regex is valid"));

/// Path segments owned by other routes. Never valid as short codes.
const RESERVED_CODES: &[&str] = &["", "api", "healthz"];

/// Generates a random 7-character alphanumeric code.
///
/// # Examples
///
/// ```ignore
/// let code = generate_code();
/// assert_eq!(code.len(), 7);
/// assert!(code.chars().all(|c| c.is_ascii_alphanumeric()));
/// ```
pub fn generate_code() -> String {
    rand::rng()
        .sample_iter(&Alphanumeric)
        .take(GENERATED_CODE_LENGTH)
        .map(char::from)
        .collect()
}

/// Returns true if `segment` is claimed by a non-redirect route (case-insensitive).
pub fn is_reserved(segment: &str) -> bool {
    RESERVED_CODES
        .iter()
        .any(|reserved| reserved.eq_ignore_ascii_case(segment))
}

/// Validates a caller-supplied short code.
///
/// # Rules
///
/// - 6-8 characters
/// - ASCII letters and digits only
/// - Not a reserved path segment
///
/// # Errors
///
/// Returns [`AppError::InvalidCodeFormat`] if any rule is violated.
pub fn validate_code(code: &str) -> Result<(), AppError> {
    if !CODE_REGEX.is_match(code) {
        return Err(AppError::invalid_code_format(
            "Invalid code format [A-Za-z0-9]{6,8}",
            json!({ "code": code }),
        ));
    }

    if is_reserved(code) {
        return Err(AppError::invalid_code_format(
            "This code is reserved",
            json!({ "code": code }),
        ));
    }

    Ok(())
}
