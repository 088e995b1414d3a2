//! Contact messages sent through the storefront.

use emporium_core::api::{ApiClient, ApiError};
use emporium_core::{ContactMessage, ContactMessageId, Page};
use secrecy::SecretString;
use serde::Serialize;
use tracing::instrument;

#[derive(Serialize)]
struct PageQuery {
    page: u32,
}

/// `GET /contact-messages?page=N`
///
/// # Errors
///
/// Returns error if the backend call fails.
#[instrument(skip(api, token))]
pub async fn list(
    api: &ApiClient,
    token: &SecretString,
    page: u32,
) -> Result<Page<ContactMessage>, ApiError> {
    api.get("/contact-messages")
        .bearer(token)
        .query(&PageQuery { page })
        .send_json()
        .await
}

/// `PATCH /contact-messages/{id}/read`
///
/// # Errors
///
/// Returns the backend's rejection.
#[instrument(skip(api, token))]
pub async fn mark_read(
    api: &ApiClient,
    token: &SecretString,
    id: ContactMessageId,
) -> Result<(), ApiError> {
    api.patch(&format!("/contact-messages/{id}/read"))
        .bearer(token)
        .send_empty()
        .await
}

/// `DELETE /contact-messages/{id}`
///
/// # Errors
///
/// Returns the backend's rejection.
#[instrument(skip(api, token))]
pub async fn delete(
    api: &ApiClient,
    token: &SecretString,
    id: ContactMessageId,
) -> Result<(), ApiError> {
    api.delete(&format!("/contact-messages/{id}"))
        .bearer(token)
        .send_empty()
        .await
}
