#![allow(dead_code)]

use axum_test::TestServer;
use chrono::Utc;
use std::sync::Arc;
use tinylink::domain::entities::Link;
use tinylink::infrastructure::persistence::InMemoryLinkStore;
use tinylink::routes;
use tinylink::state::AppState;

pub fn create_test_state() -> AppState {
    AppState::new(Arc::new(InMemoryLinkStore::new()))
}

pub fn create_test_state_with(links: &[(&str, &str)]) -> AppState {
    let now = Utc::now();
    let store = InMemoryLinkStore::with_links(
        links
            .iter()
            .map(|(code, target)| Link::new(code.to_string(), target.to_string(), now)),
    )
    .unwrap();
    AppState::new(Arc::new(store))
}

/// Full application router backed by the given state.
pub fn make_server(state: AppState) -> TestServer {
    TestServer::new(routes::router(state)).unwrap()
}
