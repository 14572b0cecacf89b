mod common;

use axum::http::StatusCode;
use chrono::{DateTime, Utc};
use serde_json::json;

fn last_clicked_at(body: &serde_json::Value) -> DateTime<Utc> {
    body["lastClickedAt"]
        .as_str()
        .expect("lastClickedAt should be set")
        .parse()
        .unwrap()
}

#[tokio::test]
async fn test_redirect_success() {
    let state = common::create_test_state_with(&[("redir01", "https://example.com/target")]);
    let server = common::make_server(state);

    let response = server.get("/redir01").await;

    response.assert_status(StatusCode::FOUND);
    assert_eq!(response.header("location"), "https://example.com/target");
    assert_eq!(response.header("cache-control"), "no-store");
}

#[tokio::test]
async fn test_redirect_case_insensitive() {
    let state = common::create_test_state_with(&[("MiXeD01", "https://example.com")]);
    let server = common::make_server(state);

    let response = server.get("/mixed01").await;

    response.assert_status(StatusCode::FOUND);
    assert_eq!(response.header("location"), "https://example.com");
}

#[tokio::test]
async fn test_redirect_records_click() {
    let state = common::create_test_state_with(&[("click01", "https://example.com")]);
    let server = common::make_server(state);

    let before = server
        .get("/api/links/click01")
        .await
        .json::<serde_json::Value>();
    assert_eq!(before["clicks"], 0);
    assert!(before["lastClickedAt"].is_null());

    server.get("/click01").await.assert_status(StatusCode::FOUND);
    let first = last_clicked_at(
        &server
            .get("/api/links/click01")
            .await
            .json::<serde_json::Value>(),
    );

    let started = Utc::now();
    server.get("/CLICK01").await.assert_status(StatusCode::FOUND);

    let after = server
        .get("/api/links/click01")
        .await
        .json::<serde_json::Value>();
    assert_eq!(after["clicks"], 2);
    let second = last_clicked_at(&after);
    assert!(second >= started);
    assert!(second >= first);
}

#[tokio::test]
async fn test_redirect_not_found() {
    let server = common::make_server(common::create_test_state());

    let response = server.get("/unknown1").await;

    response.assert_status_not_found();
    assert_eq!(response.text(), "Not found");

    // A miss never creates a record.
    let list = server.get("/api/links").await.json::<serde_json::Value>();
    assert_eq!(list, json!([]));
}

#[tokio::test]
async fn test_redirect_reserved_segments() {
    let server = common::make_server(common::create_test_state());

    server.get("/api").await.assert_status_not_found();

    let response = server.get("/API").await;
    response.assert_status_not_found();
    assert_eq!(response.text(), "Not found");
}

#[tokio::test]
async fn test_create_redirect_delete_flow() {
    let server = common::make_server(common::create_test_state());

    let created = server
        .post("/api/links")
        .json(&json!({ "target": "https://example.com/a" }))
        .await;
    created.assert_status(StatusCode::CREATED);

    let body = created.json::<serde_json::Value>();
    let code = body["code"].as_str().unwrap().to_string();
    assert_eq!(code.len(), 7);
    assert_eq!(body["clicks"], 0);

    let mut previous: Option<DateTime<Utc>> = None;
    for expected_clicks in 1..=3 {
        let before = Utc::now();
        let response = server.get(&format!("/{code}")).await;
        let after = Utc::now();
        response.assert_status(StatusCode::FOUND);
        assert_eq!(response.header("location"), "https://example.com/a");

        let body = server
            .get(&format!("/api/links/{code}"))
            .await
            .json::<serde_json::Value>();
        assert_eq!(body["clicks"], expected_clicks);

        // lastClickedAt is the time of this redirect.
        let clicked = last_clicked_at(&body);
        assert!(clicked >= before && clicked <= after);
        if let Some(previous) = previous {
            assert!(clicked >= previous);
        }
        previous = Some(clicked);
    }

    server
        .delete(&format!("/api/links/{code}"))
        .await
        .assert_status(StatusCode::NO_CONTENT);

    server
        .get(&format!("/api/links/{code}"))
        .await
        .assert_status_not_found();

    server
        .delete(&format!("/api/links/{code}"))
        .await
        .assert_status_not_found();

    let response = server.get(&format!("/{code}")).await;
    response.assert_status_not_found();
    assert_eq!(response.text(), "Not found");
}
