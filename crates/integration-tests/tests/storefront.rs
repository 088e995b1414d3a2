//! Storefront search, cart and wishlist against the mock backend.

use axum::http::StatusCode;
use emporium_core::Product;
use emporium_integration_tests::backend::{CUSTOMER_EMAIL, MockBackend};
use emporium_integration_tests::harness::TestClient;
use serde_json::{Value, json};

fn lamps() -> Vec<Value> {
    vec![
        json!({"id": 1, "name": "Desk Lamp", "price": "49.00", "status": true}),
        json!({"id": 2, "name": "Floor Lamp", "price": 12.5, "status": true}),
        json!({"id": 3, "name": "Lamp Shade", "price": "30", "status": true}),
        json!({"id": 4, "name": "Wall Clock", "price": "5.00", "status": true}),
    ]
}

#[tokio::test]
async fn test_search_sorts_results_locally() {
    let backend = MockBackend::start().await;
    backend.seed("products", lamps());
    let mut storefront = TestClient::storefront(&backend);

    let response = storefront.htmx_get("/search?q=lamp&sort=price_asc").await;

    assert_eq!(response.status, StatusCode::OK);
    assert!(!response.body.contains("Wall Clock"));
    let floor = response.position("<h3>Floor Lamp</h3>");
    let shade = response.position("<h3>Lamp Shade</h3>");
    let desk = response.position("<h3>Desk Lamp</h3>");
    assert!(floor < shade && shade < desk);
    assert_eq!(backend.count("GET /products/search"), 1);
}

#[tokio::test]
async fn test_empty_search_skips_backend() {
    let backend = MockBackend::start().await;
    let mut storefront = TestClient::storefront(&backend);

    let response = storefront.htmx_get("/search?q=%20%20").await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(backend.count("GET /products/search"), 0);
}

#[test]
fn test_product_round_trips_backend_json() {
    let product: Product = serde_json::from_value(lamps().remove(0)).expect("product");
    let value = serde_json::to_value(&product).expect("serialize");

    assert_eq!(value["id"], json!(1));
    assert_eq!(value["name"], json!("Desk Lamp"));
    assert_eq!(value["price"], json!("49.00"));
    assert_eq!(value["status"], json!(true));
}

#[tokio::test]
async fn test_cart_count_always_reads_backend() {
    let backend = MockBackend::start().await;
    backend.seed("products", lamps());
    let mut storefront = TestClient::storefront(&backend);
    let response = storefront.sign_in(CUSTOMER_EMAIL).await;
    assert_eq!(response.status, StatusCode::SEE_OTHER);
    backend.clear_requests();

    let response = storefront
        .post_form("/cart/add", &[("product_id", "1"), ("quantity", "2")], true)
        .await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.toast_kind().as_deref(), Some("success"));
    assert!(response.body.contains(">2</span>"));
    assert_eq!(backend.requests(), ["POST /cart", "GET /cart"]);

    // Another device empties the cart; the next read must see it.
    backend.seed("cart", Vec::new());
    let response = storefront.htmx_get("/cart/count").await;
    assert!(response.body.contains("\"outerHTML\"></span>"));
    assert_eq!(backend.count("GET /cart"), 2);
}

#[tokio::test]
async fn test_cart_requires_sign_in() {
    let backend = MockBackend::start().await;
    let mut storefront = TestClient::storefront(&backend);

    let response = storefront
        .post_form("/cart/add", &[("product_id", "1")], true)
        .await;

    assert_eq!(response.header("hx-redirect"), Some("/auth/login"));
    assert!(backend.requests().is_empty());
}

async fn signed_in(backend: &MockBackend) -> TestClient {
    let mut storefront = TestClient::storefront(backend);
    let response = storefront.sign_in(CUSTOMER_EMAIL).await;
    assert_eq!(response.status, StatusCode::SEE_OTHER);
    backend.clear_requests();
    storefront
}

#[tokio::test]
async fn test_wishlist_toggle_adds_then_removes() {
    let backend = MockBackend::start().await;
    backend.seed("products", lamps());
    let mut storefront = signed_in(&backend).await;

    let response = storefront
        .post_form("/wishlist/toggle", &[("product_id", "2")], true)
        .await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.toast_message().as_deref(), Some("Added to your wishlist"));
    assert!(response.body.contains("aria-pressed=\"true\""));
    assert_eq!(backend.requests(), ["GET /wishlist", "POST /wishlist"]);
    assert_eq!(backend.items("wishlist").len(), 1);

    backend.clear_requests();
    let response = storefront
        .post_form("/wishlist/toggle", &[("product_id", "2")], true)
        .await;

    assert_eq!(response.toast_message().as_deref(), Some("Removed from your wishlist"));
    assert!(response.body.contains("aria-pressed=\"false\""));
    assert_eq!(backend.requests(), ["GET /wishlist", "DELETE /wishlist/2"]);
    assert!(backend.items("wishlist").is_empty());
}

#[tokio::test]
async fn test_wishlist_toggle_follows_backend_state() {
    let backend = MockBackend::start().await;
    backend.seed("products", lamps());
    // Liked from another device; this page still shows an empty heart.
    backend.seed(
        "wishlist",
        vec![json!({"id": 70, "product": lamps().remove(2)})],
    );
    let mut storefront = signed_in(&backend).await;

    let response = storefront
        .post_form("/wishlist/toggle", &[("product_id", "3")], true)
        .await;

    assert!(response.body.contains("aria-pressed=\"false\""));
    assert_eq!(backend.requests(), ["GET /wishlist", "DELETE /wishlist/3"]);
    assert_eq!(backend.count("POST /wishlist"), 0);
}

#[tokio::test]
async fn test_wishlist_toggle_failure_keeps_button() {
    let backend = MockBackend::start().await;
    backend.seed("products", lamps());
    backend.fail("POST /wishlist", StatusCode::SERVICE_UNAVAILABLE, "Wishlist is offline");
    let mut storefront = signed_in(&backend).await;

    let response = storefront
        .post_form("/wishlist/toggle", &[("product_id", "1")], true)
        .await;

    assert_eq!(response.header("hx-reswap"), Some("none"));
    assert_eq!(response.toast_kind().as_deref(), Some("error"));
    assert_eq!(response.toast_message().as_deref(), Some("Wishlist is offline"));
    assert!(backend.items("wishlist").is_empty());
}
