//! Attributes and their values.

use emporium_core::api::{ApiClient, ApiError};
use emporium_core::{Attribute, AttributeId, AttributeValue, AttributeValueId};
use secrecy::SecretString;
use tracing::instrument;

use crate::forms::{AttributePayload, AttributeValuePayload};

/// `GET /attributes`
///
/// # Errors
///
/// Returns error if the backend call fails.
#[instrument(skip_all)]
pub async fn list(api: &ApiClient, token: &SecretString) -> Result<Vec<Attribute>, ApiError> {
    api.get("/attributes").bearer(token).send_json().await
}

/// `GET /attributes/{id}`
///
/// # Errors
///
/// Returns error if the backend call fails.
#[instrument(skip(api, token))]
pub async fn get(api: &ApiClient, token: &SecretString, id: AttributeId) -> Result<Attribute, ApiError> {
    api.get(&format!("/attributes/{id}"))
        .bearer(token)
        .send_json()
        .await
}

/// `POST /attributes`
///
/// # Errors
///
/// Returns the backend's rejection.
#[instrument(skip(api, token))]
pub async fn create(
    api: &ApiClient,
    token: &SecretString,
    payload: &AttributePayload<'_>,
) -> Result<(), ApiError> {
    api.post("/attributes")
        .bearer(token)
        .json(payload)
        .send_empty()
        .await
}

/// `PUT /attributes/{id}`
///
/// # Errors
///
/// Returns the backend's rejection.
#[instrument(skip(api, token))]
pub async fn update(
    api: &ApiClient,
    token: &SecretString,
    id: AttributeId,
    payload: &AttributePayload<'_>,
) -> Result<(), ApiError> {
    api.put(&format!("/attributes/{id}"))
        .bearer(token)
        .json(payload)
        .send_empty()
        .await
}

/// `DELETE /attributes/{id}`
///
/// # Errors
///
/// Returns the backend's rejection, e.g. when the attribute is in use.
#[instrument(skip(api, token))]
pub async fn delete(api: &ApiClient, token: &SecretString, id: AttributeId) -> Result<(), ApiError> {
    api.delete(&format!("/attributes/{id}"))
        .bearer(token)
        .send_empty()
        .await
}

/// `GET /attributes/{id}/values`
///
/// # Errors
///
/// Returns error if the backend call fails.
#[instrument(skip(api, token))]
pub async fn values(
    api: &ApiClient,
    token: &SecretString,
    attribute: AttributeId,
) -> Result<Vec<AttributeValue>, ApiError> {
    api.get(&format!("/attributes/{attribute}/values"))
        .bearer(token)
        .send_json()
        .await
}

/// `POST /attributes/{id}/values`
///
/// # Errors
///
/// Returns the backend's rejection.
#[instrument(skip(api, token))]
pub async fn create_value(
    api: &ApiClient,
    token: &SecretString,
    attribute: AttributeId,
    payload: &AttributeValuePayload<'_>,
) -> Result<(), ApiError> {
    api.post(&format!("/attributes/{attribute}/values"))
        .bearer(token)
        .json(payload)
        .send_empty()
        .await
}

/// `PUT /attribute-values/{id}`
///
/// # Errors
///
/// Returns the backend's rejection.
#[instrument(skip(api, token))]
pub async fn update_value(
    api: &ApiClient,
    token: &SecretString,
    id: AttributeValueId,
    payload: &AttributeValuePayload<'_>,
) -> Result<(), ApiError> {
    api.put(&format!("/attribute-values/{id}"))
        .bearer(token)
        .json(payload)
        .send_empty()
        .await
}

/// `DELETE /attribute-values/{id}`
///
/// # Errors
///
/// Returns the backend's rejection.
#[instrument(skip(api, token))]
pub async fn delete_value(
    api: &ApiClient,
    token: &SecretString,
    id: AttributeValueId,
) -> Result<(), ApiError> {
    api.delete(&format!("/attribute-values/{id}"))
        .bearer(token)
        .send_empty()
        .await
}
