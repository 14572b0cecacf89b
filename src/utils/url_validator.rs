//! Target URL validation.
//!
//! Targets are checked once, at creation, and stored exactly as supplied.

use url::Url;

/// Errors that can occur while validating a target URL.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum TargetUrlError {
    #[error("Target URL is empty")]
    Empty,

    #[error("Invalid URL format: {0}")]
    InvalidFormat(String),

    #[error("Only HTTP and HTTPS protocols are allowed, got '{0}'")]
    UnsupportedProtocol(String),
}

/// Checks that `target` is an absolute `http` or `https` URL.
///
/// The input is not rewritten; callers store the original string.
///
/// # Errors
///
/// Returns [`TargetUrlError::InvalidFormat`] for strings that do not parse as absolute URLs
/// and [`TargetUrlError::UnsupportedProtocol`] for any other scheme (`ftp:`, `javascript:`,
/// `data:`, ...).
pub fn validate_target(target: &str) -> Result<(), TargetUrlError> {
    if target.is_empty() {
        return Err(TargetUrlError::Empty);
    }

    let parsed = Url::parse(target).map_err(|e| TargetUrlError::InvalidFormat(e.to_string()))?;

    match parsed.scheme() {
        "http" | "https" => Ok(()),
        other => Err(TargetUrlError::UnsupportedProtocol(other.to_string())),
    }
}
