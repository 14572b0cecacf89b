//! Cross-origin policy for the JSON API.

use tower_http::cors::CorsLayer;

/// Allows any origin, method and header.
///
/// The dashboard is served from a different origin than the API during development, and the
/// API carries no credentials.
pub fn layer() -> CorsLayer {
    CorsLayer::permissive()
}
