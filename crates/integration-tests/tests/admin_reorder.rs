//! Dragging sliders: the response is always the order the backend holds.

use axum::http::StatusCode;
use emporium_integration_tests::backend::{ADMIN_EMAIL, MockBackend};
use emporium_integration_tests::harness::{TestClient, TestResponse};
use serde_json::{Value, json};

const TITLES: [&str; 4] = ["Alpha", "Bravo", "Charlie", "Delta"];

async fn signed_in_admin() -> (MockBackend, TestClient) {
    let backend = MockBackend::start().await;
    backend.seed(
        "sliders",
        TITLES
            .iter()
            .zip(1..)
            .map(|(title, id)| json!({"id": id, "title": title, "position": id, "status": true}))
            .collect(),
    );

    let mut admin = TestClient::admin(&backend);
    admin.sign_in(ADMIN_EMAIL).await;
    backend.clear_requests();
    (backend, admin)
}

/// Titles in the order they appear in the rendered list.
fn rendered_order(response: &TestResponse) -> Vec<&'static str> {
    let mut titles = TITLES.to_vec();
    titles.sort_by_key(|title| response.position(title));
    titles
}

fn stored_ids(backend: &MockBackend) -> Vec<u64> {
    backend
        .items("sliders")
        .iter()
        .filter_map(|s| s.get("id").and_then(Value::as_u64))
        .collect()
}

#[tokio::test]
async fn test_drop_persists_full_order() {
    let (backend, mut admin) = signed_in_admin().await;

    let response = admin
        .post_form("/sliders/reorder", &[("source_id", "3"), ("target_id", "1")], true)
        .await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.header("hx-retarget"), Some("#slider-list"));
    assert_eq!(response.toast_kind().as_deref(), Some("success"));
    assert_eq!(rendered_order(&response), ["Charlie", "Alpha", "Bravo", "Delta"]);
    assert_eq!(stored_ids(&backend), [3, 1, 2, 4]);
    assert_eq!(backend.requests(), ["GET /sliders", "PUT /sliders/reorder"]);
}

#[tokio::test]
async fn test_rejected_drop_renders_backend_order() {
    let (backend, mut admin) = signed_in_admin().await;
    backend.fail(
        "PUT /sliders/reorder",
        StatusCode::UNPROCESSABLE_ENTITY,
        "Slider order is locked",
    );

    let response = admin
        .post_form("/sliders/reorder", &[("source_id", "3"), ("target_id", "1")], true)
        .await;

    assert_eq!(response.header("hx-retarget"), Some("#slider-list"));
    assert_eq!(response.toast_kind().as_deref(), Some("error"));
    assert!(
        response.triggers()["showToast"]["message"]
            .as_str()
            .is_some_and(|m| m.contains("Slider order is locked"))
    );
    assert_eq!(rendered_order(&response), TITLES);
    assert_eq!(stored_ids(&backend), [1, 2, 3, 4]);
    assert_eq!(backend.count("GET /sliders"), 2);
}

#[tokio::test]
async fn test_drop_on_itself_does_nothing() {
    let (backend, mut admin) = signed_in_admin().await;

    let response = admin
        .post_form("/sliders/reorder", &[("source_id", "2"), ("target_id", "2")], true)
        .await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.header("hx-reswap"), Some("none"));
    assert!(response.body.is_empty());
    assert!(backend.requests().is_empty());
}

#[tokio::test]
async fn test_drop_on_deleted_slider_renders_current_list() {
    let (backend, mut admin) = signed_in_admin().await;
    // Another admin removed Delta after this page was rendered.
    backend.seed(
        "sliders",
        backend.items("sliders").into_iter().take(3).collect(),
    );

    let response = admin
        .post_form("/sliders/reorder", &[("source_id", "1"), ("target_id", "4")], true)
        .await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.header("hx-retarget"), Some("#slider-list"));
    assert_eq!(response.header("hx-reswap"), Some("outerHTML"));
    assert_eq!(response.toast_kind().as_deref(), Some("error"));
    assert!(!response.body.contains("Delta"));
    let alpha = response.position("Alpha");
    let bravo = response.position("Bravo");
    let charlie = response.position("Charlie");
    assert!(alpha < bravo && bravo < charlie);
    assert_eq!(backend.count("PUT /sliders/reorder"), 0);
}

#[tokio::test]
async fn test_unknown_source_renders_current_list() {
    let (backend, mut admin) = signed_in_admin().await;

    let response = admin
        .post_form("/sliders/reorder", &[("source_id", "9"), ("target_id", "1")], true)
        .await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.header("hx-retarget"), Some("#slider-list"));
    assert_eq!(rendered_order(&response), TITLES);
    assert_eq!(backend.count("PUT /sliders/reorder"), 0);
}

#[tokio::test]
async fn test_unreadable_list_reloads_page() {
    let (backend, mut admin) = signed_in_admin().await;
    backend.fail("GET /sliders", StatusCode::SERVICE_UNAVAILABLE, "Maintenance");

    let response = admin
        .post_form("/sliders/reorder", &[("source_id", "3"), ("target_id", "1")], true)
        .await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.header("hx-refresh"), Some("true"));
    assert_eq!(response.header("hx-reswap"), None);
    assert_eq!(backend.count("PUT /sliders/reorder"), 0);
    assert_eq!(stored_ids(&backend), [1, 2, 3, 4]);
}

#[tokio::test]
async fn test_expired_token_during_reorder_redirects() {
    let (backend, mut admin) = signed_in_admin().await;
    backend.fail("GET /sliders", StatusCode::UNAUTHORIZED, "Token expired");

    let response = admin
        .post_form("/sliders/reorder", &[("source_id", "3"), ("target_id", "1")], true)
        .await;

    assert_eq!(response.header("location"), Some("/auth/expired"));
    let response = admin.htmx_get("/auth/expired").await;
    assert_eq!(
        response.header("hx-redirect"),
        Some("/auth/login?expired=true")
    );
}
