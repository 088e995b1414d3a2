//! Product reviews.

use emporium_core::api::{ApiClient, ApiError};
use emporium_core::{ProductId, Review, ReviewId};
use secrecy::SecretString;
use tracing::instrument;

use crate::forms::ReviewForm;

/// `GET /products/{id}/reviews`
///
/// The token, when present, lets the backend fill in `is_helpful`.
///
/// # Errors
///
/// Returns error if the backend call fails.
#[instrument(skip(api, token))]
pub async fn list(
    api: &ApiClient,
    product_id: ProductId,
    token: Option<&SecretString>,
) -> Result<Vec<Review>, ApiError> {
    api.get(&format!("/products/{product_id}/reviews"))
        .maybe_bearer(token)
        .send_json()
        .await
}

/// `POST /products/{id}/reviews`
///
/// # Errors
///
/// Returns error if the backend rejects the review.
#[instrument(skip(api, token, form))]
pub async fn create(
    api: &ApiClient,
    token: &SecretString,
    product_id: ProductId,
    form: &ReviewForm,
) -> Result<(), ApiError> {
    api.post(&format!("/products/{product_id}/reviews"))
        .bearer(token)
        .json(form)
        .send_empty()
        .await
}

/// `PUT /reviews/{id}`
///
/// # Errors
///
/// Returns error if the backend rejects the change.
#[instrument(skip(api, token, form))]
pub async fn update(
    api: &ApiClient,
    token: &SecretString,
    review_id: ReviewId,
    form: &ReviewForm,
) -> Result<(), ApiError> {
    api.put(&format!("/reviews/{review_id}"))
        .bearer(token)
        .json(form)
        .send_empty()
        .await
}

/// `DELETE /reviews/{id}`
///
/// # Errors
///
/// Returns error if the backend call fails.
#[instrument(skip(api, token))]
pub async fn delete(api: &ApiClient, token: &SecretString, review_id: ReviewId) -> Result<(), ApiError> {
    api.delete(&format!("/reviews/{review_id}"))
        .bearer(token)
        .send_empty()
        .await
}

/// `POST /reviews/{id}/helpful` toggles the customer's helpful mark.
///
/// # Errors
///
/// Returns error if the backend call fails.
#[instrument(skip(api, token))]
pub async fn toggle_helpful(
    api: &ApiClient,
    token: &SecretString,
    review_id: ReviewId,
) -> Result<(), ApiError> {
    api.post(&format!("/reviews/{review_id}/helpful"))
        .bearer(token)
        .send_empty()
        .await
}
