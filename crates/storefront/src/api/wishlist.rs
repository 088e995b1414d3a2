//! Wishlist ("likes") endpoints.

use emporium_core::api::{ApiClient, ApiError};
use emporium_core::{ProductId, WishlistItem};
use secrecy::SecretString;
use serde::Serialize;
use tracing::instrument;

#[derive(Serialize)]
struct Like {
    product_id: ProductId,
}

/// `GET /wishlist`
///
/// # Errors
///
/// Returns error if the backend call fails.
#[instrument(skip_all)]
pub async fn list(api: &ApiClient, token: &SecretString) -> Result<Vec<WishlistItem>, ApiError> {
    api.get("/wishlist").bearer(token).send_json().await
}

/// `POST /wishlist`
///
/// # Errors
///
/// Returns error if the backend call fails.
#[instrument(skip(api, token))]
pub async fn add(api: &ApiClient, token: &SecretString, product_id: ProductId) -> Result<(), ApiError> {
    api.post("/wishlist")
        .bearer(token)
        .json(&Like { product_id })
        .send_empty()
        .await
}

/// `DELETE /wishlist/{product_id}`
///
/// # Errors
///
/// Returns error if the backend call fails.
#[instrument(skip(api, token))]
pub async fn remove(
    api: &ApiClient,
    token: &SecretString,
    product_id: ProductId,
) -> Result<(), ApiError> {
    api.delete(&format!("/wishlist/{product_id}"))
        .bearer(token)
        .send_empty()
        .await
}
