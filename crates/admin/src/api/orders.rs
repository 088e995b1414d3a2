//! Read-only order browsing.

use emporium_core::api::{ApiClient, ApiError};
use emporium_core::{Order, OrderId, Page};
use secrecy::SecretString;
use serde::Serialize;
use tracing::instrument;

#[derive(Serialize)]
struct PageQuery {
    page: u32,
}

/// `GET /orders?page=N`
///
/// # Errors
///
/// Returns error if the backend call fails.
#[instrument(skip(api, token))]
pub async fn list(api: &ApiClient, token: &SecretString, page: u32) -> Result<Page<Order>, ApiError> {
    api.get("/orders")
        .bearer(token)
        .query(&PageQuery { page })
        .send_json()
        .await
}

/// `GET /orders/{id}`
///
/// # Errors
///
/// Returns error if the backend call fails.
#[instrument(skip(api, token))]
pub async fn get(api: &ApiClient, token: &SecretString, id: OrderId) -> Result<Order, ApiError> {
    api.get(&format!("/orders/{id}"))
        .bearer(token)
        .send_json()
        .await
}
