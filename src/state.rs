//! Shared state injected into every handler.

use std::sync::Arc;
use std::time::Instant;

use crate::application::services::LinkService;
use crate::domain::repositories::LinkStore;

/// Link service type used by the HTTP layer, erased over the configured store.
pub type DynLinkService = LinkService<dyn LinkStore>;

/// Application state shared across requests.
///
/// Owns the single store instance for the lifetime of the server.
#[derive(Clone)]
pub struct AppState {
    pub link_service: Arc<DynLinkService>,
    pub started_at: Instant,
}

impl AppState {
    /// Builds the state around `store`.
    pub fn new(store: Arc<dyn LinkStore>) -> Self {
        Self {
            link_service: Arc::new(LinkService::new(store)),
            started_at: Instant::now(),
        }
    }
}
