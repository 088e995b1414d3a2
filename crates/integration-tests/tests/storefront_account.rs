//! Account settings, the contact form and forced sign-out against the mock
//! backend.

use axum::http::StatusCode;
use emporium_integration_tests::backend::{CUSTOMER_EMAIL, MockBackend, PASSWORD};
use emporium_integration_tests::harness::{TestClient, TestResponse};
use serde_json::{Value, json};

async fn signed_in(backend: &MockBackend) -> TestClient {
    let mut storefront = TestClient::storefront(backend);
    let response = storefront.sign_in(CUSTOMER_EMAIL).await;
    assert_eq!(response.status, StatusCode::SEE_OTHER);
    backend.clear_requests();
    storefront
}

#[tokio::test]
async fn test_mismatched_password_skips_backend() {
    let backend = MockBackend::start().await;
    let mut storefront = signed_in(&backend).await;

    let response = storefront
        .post_form(
            "/account/password",
            &[
                ("current_password", PASSWORD),
                ("password", "lamp post lantern"),
                ("password_confirmation", "lamp post lanterns"),
            ],
            false,
        )
        .await;

    assert_eq!(response.status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(response.body.contains("Passwords do not match"));
    assert!(response.body.contains("Sam Shopper"));
    assert!(backend.requests().is_empty());
}

#[tokio::test]
async fn test_password_change() {
    let backend = MockBackend::start().await;
    let mut storefront = signed_in(&backend).await;

    let response = storefront
        .post_form(
            "/account/password",
            &[
                ("current_password", PASSWORD),
                ("password", "lamp post lantern"),
                ("password_confirmation", "lamp post lantern"),
            ],
            false,
        )
        .await;

    assert_eq!(response.status, StatusCode::OK);
    assert!(response.body.contains("Your password has been changed."));
    assert_eq!(backend.requests(), ["PUT /profile/password", "GET /profile"]);
}

#[tokio::test]
async fn test_wrong_current_password_shows_backend_error() {
    let backend = MockBackend::start().await;
    let mut storefront = signed_in(&backend).await;

    let response = storefront
        .post_form(
            "/account/password",
            &[
                ("current_password", "not my password"),
                ("password", "lamp post lantern"),
                ("password_confirmation", "lamp post lantern"),
            ],
            false,
        )
        .await;

    assert_eq!(response.status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(response.body.contains("The current password is incorrect."));
    assert_eq!(backend.count("PUT /profile/password"), 1);
}

#[tokio::test]
async fn test_avatar_upload_then_delete() {
    let backend = MockBackend::start().await;
    let mut storefront = signed_in(&backend).await;
    let avatar_url = format!("{}uploads/sam.png", backend.url());

    let response = storefront
        .post_file("/account/picture", "picture", "sam.png", b"\x89PNG\r\n\x1a\n")
        .await;

    assert_eq!(response.status, StatusCode::SEE_OTHER);
    assert_eq!(response.header("location"), Some("/account"));
    assert_eq!(backend.requests(), ["POST /profile/picture"]);
    assert_eq!(backend.items("profile")[0]["avatar"], json!("uploads/sam.png"));

    let response = storefront.get("/account").await;
    assert!(response.body.contains(&avatar_url));
    assert!(response.body.contains("Remove picture"));

    backend.clear_requests();
    let response = storefront.post_form("/account/picture/delete", &[], false).await;

    assert_eq!(response.status, StatusCode::OK);
    assert!(response.body.contains("Your profile picture has been removed."));
    assert!(!response.body.contains(&avatar_url));
    assert_eq!(backend.requests(), ["DELETE /profile/picture", "GET /profile"]);
    assert!(backend.items("profile")[0].get("avatar").is_none());
}

#[tokio::test]
async fn test_upload_without_file_is_rejected() {
    let backend = MockBackend::start().await;
    let mut storefront = signed_in(&backend).await;

    let response = storefront
        .post_file("/account/picture", "picture", "", b"")
        .await;

    assert_eq!(response.status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(response.body.contains("Please choose an image to upload."));
    assert_eq!(backend.count("POST /profile/picture"), 0);
}

fn contact_fields(message: &str) -> Vec<(&'static str, String)> {
    vec![
        ("name", "Jane Doe".to_string()),
        ("email", "jane@example.com ".to_string()),
        ("phone", "  ".to_string()),
        ("subject", "Sizing".to_string()),
        ("message", message.to_string()),
    ]
}

async fn send_contact(storefront: &mut TestClient, message: &str) -> TestResponse {
    let fields = contact_fields(message);
    let fields: Vec<(&str, &str)> = fields.iter().map(|(k, v)| (*k, v.as_str())).collect();
    storefront.post_form("/contact", &fields, false).await
}

#[tokio::test]
async fn test_contact_message_sent() {
    let backend = MockBackend::start().await;
    let mut storefront = TestClient::storefront(&backend);

    let response = send_contact(&mut storefront, "Do the shirts run small?").await;

    assert_eq!(response.status, StatusCode::OK);
    assert!(response.body.contains("Thanks for getting in touch."));
    assert!(!response.body.contains("Do the shirts run small?"));

    let sent = backend.items("contact-messages");
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0]["email"], json!("jane@example.com"));
    assert_eq!(sent[0]["phone"], Value::Null);
}

#[tokio::test]
async fn test_contact_failure_keeps_message() {
    let backend = MockBackend::start().await;
    backend.fail_with(
        "POST /contact-messages",
        StatusCode::UNPROCESSABLE_ENTITY,
        json!({
            "message": "This address cannot receive replies.",
            "errors": {"email": ["This address cannot receive replies."]},
        }),
    );
    let mut storefront = TestClient::storefront(&backend);

    let response = send_contact(&mut storefront, "Do the shirts run small?").await;

    assert_eq!(response.status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(response.body.contains("This address cannot receive replies."));
    assert!(response.body.contains("Do the shirts run small?"));
    assert!(!response.body.contains("Thanks for getting in touch."));
}

#[tokio::test]
async fn test_short_contact_message_skips_backend() {
    let backend = MockBackend::start().await;
    let mut storefront = TestClient::storefront(&backend);

    let response = send_contact(&mut storefront, "Hi").await;

    assert_eq!(response.status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(response.body.contains("Message must be 10 to 2000 characters"));
    assert!(backend.requests().is_empty());
}

#[tokio::test]
async fn test_rejected_token_signs_out() {
    let backend = MockBackend::start().await;
    let mut storefront = signed_in(&backend).await;
    backend.fail("GET /cart", StatusCode::UNAUTHORIZED, "Unauthenticated.");

    let response = storefront.get("/cart").await;
    assert_eq!(response.status, StatusCode::SEE_OTHER);
    assert_eq!(response.header("location"), Some("/unauthorized"));

    let response = storefront.get("/unauthorized").await;
    assert_eq!(response.status, StatusCode::OK);
    assert!(response.body.contains("You have been signed out"));

    // The session is gone, so the next fragment request is sent to login.
    backend.clear_requests();
    let response = storefront
        .post_form("/cart/add", &[("product_id", "1")], true)
        .await;
    assert_eq!(response.header("hx-redirect"), Some("/auth/login"));
    assert!(backend.requests().is_empty());
}

#[tokio::test]
async fn test_unauthorized_from_htmx_redirects_whole_page() {
    let backend = MockBackend::start().await;
    let mut storefront = signed_in(&backend).await;

    let response = storefront.htmx_get("/unauthorized").await;

    assert_eq!(response.header("hx-redirect"), Some("/unauthorized"));
    let response = storefront.get("/account").await;
    assert_eq!(response.header("location"), Some("/auth/login"));
    assert!(backend.requests().is_empty());
}
