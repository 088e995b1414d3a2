//! Product reviews and helpful votes against the mock backend.

use axum::http::StatusCode;
use emporium_integration_tests::backend::{CUSTOMER_EMAIL, MockBackend};
use emporium_integration_tests::harness::TestClient;
use serde_json::{Value, json};

fn review(id: u64, author_id: u64, author: &str, comment: &str) -> Value {
    json!({
        "id": id,
        "product_id": 1,
        "user": {"id": author_id, "name": author},
        "rating": 2,
        "comment": comment,
        "helpful_count": 3,
        "is_helpful": false,
    })
}

async fn signed_in(backend: &MockBackend) -> TestClient {
    backend.seed(
        "products",
        vec![json!({"id": 1, "name": "Desk Lamp", "price": "49.00", "status": true})],
    );
    let mut storefront = TestClient::storefront(backend);
    let response = storefront.sign_in(CUSTOMER_EMAIL).await;
    assert_eq!(response.status, StatusCode::SEE_OTHER);
    backend.clear_requests();
    storefront
}

#[tokio::test]
async fn test_create_review_rerenders_list() {
    let backend = MockBackend::start().await;
    let mut storefront = signed_in(&backend).await;

    let response = storefront
        .post_form(
            "/products/1/reviews",
            &[("rating", "4"), ("comment", "  Bright enough to read by \n")],
            true,
        )
        .await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.toast_message().as_deref(), Some("Thanks for your review"));
    assert!(response.body.contains("<p>Bright enough to read by</p>"));
    assert!(response.body.contains("<strong>Sam Shopper</strong>"));
    // Own review, so the edit form is offered.
    assert!(response.body.contains("hx-post=\"/reviews/1001/update\""));
    assert_eq!(
        backend.requests(),
        ["POST /products/1/reviews", "GET /products/1/reviews"]
    );
    assert_eq!(backend.items("reviews")[0]["comment"], json!("Bright enough to read by"));
}

#[tokio::test]
async fn test_out_of_range_rating_skips_backend() {
    let backend = MockBackend::start().await;
    let mut storefront = signed_in(&backend).await;

    let response = storefront
        .post_form("/products/1/reviews", &[("rating", "9"), ("comment", "")], true)
        .await;

    assert_eq!(response.header("hx-reswap"), Some("none"));
    assert_eq!(response.toast_kind().as_deref(), Some("error"));
    assert_eq!(
        response.toast_message().as_deref(),
        Some("Rating must be between 1 and 5")
    );
    assert!(backend.requests().is_empty());
}

#[tokio::test]
async fn test_update_own_review() {
    let backend = MockBackend::start().await;
    let mut storefront = signed_in(&backend).await;
    backend.seed("reviews", vec![review(5, 2, "Sam Shopper", "Too dim")]);

    let response = storefront
        .post_form(
            "/reviews/5/update",
            &[("product_id", "1"), ("rating", "5"), ("comment", "Grew on me")],
            true,
        )
        .await;

    assert_eq!(response.toast_message().as_deref(), Some("Review updated"));
    assert!(response.body.contains("<p>Grew on me</p>"));
    assert!(!response.body.contains("Too dim"));
    assert_eq!(backend.requests(), ["PUT /reviews/5", "GET /products/1/reviews"]);
    assert_eq!(backend.items("reviews")[0]["rating"], json!(5));
}

#[tokio::test]
async fn test_rejected_update_leaves_list_alone() {
    let backend = MockBackend::start().await;
    let mut storefront = signed_in(&backend).await;
    backend.seed("reviews", vec![review(5, 9, "Riley", "Too dim")]);
    backend.fail(
        "PUT /reviews/5",
        StatusCode::UNPROCESSABLE_ENTITY,
        "You can only edit your own reviews.",
    );

    let response = storefront
        .post_form(
            "/reviews/5/update",
            &[("product_id", "1"), ("rating", "5"), ("comment", "Mine now")],
            true,
        )
        .await;

    assert_eq!(response.header("hx-reswap"), Some("none"));
    assert_eq!(
        response.toast_message().as_deref(),
        Some("You can only edit your own reviews.")
    );
    assert_eq!(backend.count("GET /products/1/reviews"), 0);
    assert_eq!(backend.items("reviews")[0]["comment"], json!("Too dim"));
}

#[tokio::test]
async fn test_delete_own_review() {
    let backend = MockBackend::start().await;
    let mut storefront = signed_in(&backend).await;
    backend.seed("reviews", vec![review(5, 2, "Sam Shopper", "Too dim")]);

    let response = storefront
        .post_form("/reviews/5/delete", &[("product_id", "1")], true)
        .await;

    assert_eq!(response.toast_message().as_deref(), Some("Review deleted"));
    assert!(response.body.contains("No reviews yet."));
    assert_eq!(backend.requests(), ["DELETE /reviews/5", "GET /products/1/reviews"]);
    assert!(backend.items("reviews").is_empty());
}

#[tokio::test]
async fn test_helpful_vote_toggles() {
    let backend = MockBackend::start().await;
    let mut storefront = signed_in(&backend).await;
    backend.seed("reviews", vec![review(5, 9, "Riley", "Too dim")]);

    let response = storefront
        .post_form("/reviews/5/helpful", &[("product_id", "1")], true)
        .await;

    assert_eq!(response.toast_message().as_deref(), Some("Thanks for your feedback"));
    assert!(response.body.contains("class=\"link active\""));
    assert!(response.body.contains("Helpful (4)"));
    // Someone else's review: no edit controls.
    assert!(!response.body.contains("/reviews/5/update"));

    let response = storefront
        .post_form("/reviews/5/helpful", &[("product_id", "1")], true)
        .await;

    assert!(response.body.contains("Helpful (3)"));
    assert!(!response.body.contains("class=\"link active\""));
    assert_eq!(backend.count("POST /reviews/5/helpful"), 2);
}

#[tokio::test]
async fn test_reviewing_requires_sign_in() {
    let backend = MockBackend::start().await;
    let mut storefront = TestClient::storefront(&backend);

    let response = storefront
        .post_form("/products/1/reviews", &[("rating", "4")], true)
        .await;

    assert_eq!(response.header("hx-redirect"), Some("/auth/login"));
    assert!(backend.requests().is_empty());
}
