//! Application error type and its HTTP mapping.

use axum::{
    Json,
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use serde_json::{Value, json};
use validator::ValidationErrors;

#[derive(Serialize)]
struct ErrorBody {
    error: ErrorInfo,
}

/// Machine-readable error payload returned to API clients.
#[derive(Debug, Serialize)]
pub struct ErrorInfo {
    pub code: &'static str,
    pub message: String,
    pub details: Value,
}

/// Errors produced by the link service and stores.
///
/// Client input errors (`InvalidTarget`, `InvalidCodeFormat`) and lookup failures are
/// recoverable at the HTTP boundary. `Storage` is fatal for the operation that hit it.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("{message}")]
    InvalidTarget { message: String, details: Value },

    #[error("{message}")]
    InvalidCodeFormat { message: String, details: Value },

    #[error("{message}")]
    CodeConflict { message: String, details: Value },

    #[error("{message}")]
    NotFound { message: String, details: Value },

    #[error("{message}")]
    Storage { message: String, details: Value },
}

impl AppError {
    pub fn invalid_target(message: impl Into<String>, details: Value) -> Self {
        Self::InvalidTarget {
            message: message.into(),
            details,
        }
    }
    pub fn invalid_code_format(message: impl Into<String>, details: Value) -> Self {
        Self::InvalidCodeFormat {
            message: message.into(),
            details,
        }
    }
    pub fn code_conflict(message: impl Into<String>, details: Value) -> Self {
        Self::CodeConflict {
            message: message.into(),
            details,
        }
    }
    pub fn not_found(message: impl Into<String>, details: Value) -> Self {
        Self::NotFound {
            message: message.into(),
            details,
        }
    }
    pub fn storage(message: impl Into<String>, details: Value) -> Self {
        Self::Storage {
            message: message.into(),
            details,
        }
    }

    /// HTTP status this error maps to.
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::InvalidTarget { .. } | AppError::InvalidCodeFormat { .. } => {
                StatusCode::BAD_REQUEST
            }
            AppError::CodeConflict { .. } => StatusCode::CONFLICT,
            AppError::NotFound { .. } => StatusCode::NOT_FOUND,
            AppError::Storage { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Converts the error into the JSON payload sent to clients.
    ///
    /// Storage details stay in the logs; clients only see a generic message.
    pub fn to_error_info(&self) -> ErrorInfo {
        match self {
            AppError::InvalidTarget { message, details } => ErrorInfo {
                code: "invalid_target",
                message: message.clone(),
                details: details.clone(),
            },
            AppError::InvalidCodeFormat { message, details } => ErrorInfo {
                code: "invalid_code_format",
                message: message.clone(),
                details: details.clone(),
            },
            AppError::CodeConflict { message, details } => ErrorInfo {
                code: "code_conflict",
                message: message.clone(),
                details: details.clone(),
            },
            AppError::NotFound { message, details } => ErrorInfo {
                code: "not_found",
                message: message.clone(),
                details: details.clone(),
            },
            AppError::Storage { .. } => ErrorInfo {
                code: "internal_error",
                message: "Internal storage error".to_string(),
                details: json!({}),
            },
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        if let AppError::Storage { message, details } = &self {
            tracing::error!(%message, %details, "Storage failure");
        }

        let body = ErrorBody {
            error: self.to_error_info(),
        };

        (self.status(), Json(body)).into_response()
    }
}

impl From<ValidationErrors> for AppError {
    fn from(errors: ValidationErrors) -> Self {
        let fields = errors.field_errors();

        // The target is reported first when both fields are wrong.
        if let Some(target_errors) = fields.get("target") {
            let reason = target_errors
                .iter()
                .find_map(|e| e.message.as_ref())
                .map(|m| m.to_string());
            return AppError::invalid_target(
                "Invalid target URL. Must be http(s).",
                json!({ "fields": ["target"], "reason": reason }),
            );
        }

        let details = json!({ "fields": fields.keys().collect::<Vec<_>>() });
        AppError::invalid_code_format("Invalid code format [A-Za-z0-9]{6,8}", details)
    }
}

/// A create body that is not a JSON object with a string `target` is an invalid target.
impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::invalid_target(
            "Invalid target URL. Must be http(s).",
            json!({ "reason": rejection.body_text() }),
        )
    }
}

pub fn map_sqlx_error(e: sqlx::Error) -> AppError {
    if let Some(db) = e.as_database_error()
        && db.is_unique_violation()
    {
        return AppError::code_conflict(
            "Code already exists.",
            json!({ "constraint": db.constraint() }),
        );
    }

    AppError::storage("Database error", json!({ "reason": e.to_string() }))
}

impl From<sqlx::Error> for AppError {
    fn from(e: sqlx::Error) -> Self {
        map_sqlx_error(e)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        assert_eq!(
            AppError::invalid_target("x", json!({})).status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            AppError::invalid_code_format("x", json!({})).status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            AppError::code_conflict("x", json!({})).status(),
            StatusCode::CONFLICT
        );
        assert_eq!(
            AppError::not_found("x", json!({})).status(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            AppError::storage("x", json!({})).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_storage_details_are_not_exposed() {
        let err = AppError::storage("disk full", json!({ "path": "/data/db.json" }));
        let info = err.to_error_info();

        assert_eq!(info.code, "internal_error");
        assert!(!info.message.contains("disk full"));
        assert_eq!(info.details, json!({}));
    }

    #[test]
    fn test_validation_reports_target_before_code() {
        let mut errors = ValidationErrors::new();
        errors.add("code", validator::ValidationError::new("regex"));
        errors.add("target", validator::ValidationError::new("http_target"));

        assert!(matches!(
            AppError::from(errors),
            AppError::InvalidTarget { .. }
        ));
    }

    #[test]
    fn test_validation_on_code_only() {
        let mut errors = ValidationErrors::new();
        errors.add("code", validator::ValidationError::new("regex"));

        assert!(matches!(
            AppError::from(errors),
            AppError::InvalidCodeFormat { .. }
        ));
    }

    #[test]
    fn test_display_uses_message() {
        let err = AppError::code_conflict("Code already exists.", json!({ "code": "abcdef" }));
        assert_eq!(err.to_string(), "Code already exists.");
    }
}
