//! Cart endpoints. The backend owns the cart; nothing is cached here.

use emporium_core::api::{ApiClient, ApiError};
use emporium_core::{Cart, CartItemId, ProductId, VariantId};
use secrecy::SecretString;
use serde::Serialize;
use tracing::instrument;

/// Line to add to the cart.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct NewCartItem {
    pub product_id: ProductId,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub variant_id: Option<VariantId>,
    pub quantity: u32,
}

#[derive(Serialize)]
struct Quantity {
    quantity: u32,
}

/// `GET /cart`
///
/// # Errors
///
/// Returns error if the backend call fails.
#[instrument(skip_all)]
pub async fn get(api: &ApiClient, token: &SecretString) -> Result<Cart, ApiError> {
    api.get("/cart").bearer(token).send_json().await
}

/// `POST /cart`
///
/// # Errors
///
/// Returns error if the backend rejects the line (e.g. out of stock).
#[instrument(skip(api, token))]
pub async fn add(api: &ApiClient, token: &SecretString, item: &NewCartItem) -> Result<(), ApiError> {
    api.post("/cart").bearer(token).json(item).send_empty().await
}

/// `PUT /cart/{item_id}`
///
/// # Errors
///
/// Returns error if the backend call fails.
#[instrument(skip(api, token))]
pub async fn update(
    api: &ApiClient,
    token: &SecretString,
    item_id: CartItemId,
    quantity: u32,
) -> Result<(), ApiError> {
    api.put(&format!("/cart/{item_id}"))
        .bearer(token)
        .json(&Quantity { quantity })
        .send_empty()
        .await
}

/// `DELETE /cart/{item_id}`
///
/// # Errors
///
/// Returns error if the backend call fails.
#[instrument(skip(api, token))]
pub async fn remove(api: &ApiClient, token: &SecretString, item_id: CartItemId) -> Result<(), ApiError> {
    api.delete(&format!("/cart/{item_id}"))
        .bearer(token)
        .send_empty()
        .await
}
