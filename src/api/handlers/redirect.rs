//! Handler for short URL redirect.

use axum::{
    extract::{Path, State},
    http::{HeaderValue, StatusCode, header},
    response::{IntoResponse, Response},
};
use serde_json::json;
use url::Url;

use crate::error::AppError;
use crate::state::AppState;
use crate::utils::code_generator::is_reserved;

/// Redirects a short code to its target and counts the click.
///
/// # Endpoint
///
/// `GET /{code}`
///
/// # Response
///
/// `302 Found` with `Location: <target>` and `Cache-Control: no-store`, so every visit
/// reaches the server and is counted.
///
/// # Errors
///
/// Returns 404 with the plain-text body `Not found` for unknown codes and for reserved
/// segments (`api`, `healthz`). Storage failures produce the usual JSON 500.
pub async fn redirect_handler(Path(code): Path<String>, State(state): State<AppState>) -> Response {
    if is_reserved(&code) {
        return not_found();
    }

    match state.link_service.resolve_and_record_click(&code).await {
        Ok(target) => match location(&target) {
            Some(location) => (
                StatusCode::FOUND,
                [
                    (header::LOCATION, location),
                    (header::CACHE_CONTROL, HeaderValue::from_static("no-store")),
                ],
            )
                .into_response(),
            None => AppError::storage(
                "Stored target is not a valid Location header",
                json!({ "code": code }),
            )
            .into_response(),
        },
        Err(AppError::NotFound { .. }) => not_found(),
        Err(e) => e.into_response(),
    }
}

/// Builds the `Location` value, falling back to the percent-encoded form of the target when
/// the stored string contains characters a header cannot carry.
fn location(target: &str) -> Option<HeaderValue> {
    HeaderValue::from_str(target).ok().or_else(|| {
        Url::parse(target)
            .ok()
            .and_then(|url| HeaderValue::from_str(url.as_str()).ok())
    })
}

fn not_found() -> Response {
    (StatusCode::NOT_FOUND, "Not found").into_response()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_location_passes_ascii_through() {
        let value = location("https://example.com/a?b=c").unwrap();
        assert_eq!(value, "https://example.com/a?b=c");
    }

    #[test]
    fn test_location_encodes_non_ascii() {
        let value = location("https://example.com/caf\u{e9}").unwrap();
        assert_eq!(value, "https://example.com/caf%C3%A9");
    }
}
