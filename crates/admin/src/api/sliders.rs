//! Home-page sliders and their order.

use emporium_core::api::{ApiClient, ApiError};
use emporium_core::{Slider, SliderId};
use reqwest::multipart::Form;
use secrecy::SecretString;
use serde::Serialize;
use tracing::instrument;

/// `GET /sliders`, sorted by position.
///
/// # Errors
///
/// Returns error if the backend call fails.
#[instrument(skip_all)]
pub async fn list(api: &ApiClient, token: &SecretString) -> Result<Vec<Slider>, ApiError> {
    let mut sliders: Vec<Slider> = api.get("/sliders").bearer(token).send_json().await?;
    sliders.sort_by_key(|s| s.position);
    Ok(sliders)
}

/// `GET /sliders/{id}`
///
/// # Errors
///
/// Returns error if the backend call fails.
#[instrument(skip(api, token))]
pub async fn get(api: &ApiClient, token: &SecretString, id: SliderId) -> Result<Slider, ApiError> {
    api.get(&format!("/sliders/{id}"))
        .bearer(token)
        .send_json()
        .await
}

/// `POST /sliders` (create) or `PUT /sliders/{id}` (update).
///
/// # Errors
///
/// Returns the backend's rejection.
#[instrument(skip(api, token, form))]
pub async fn save(
    api: &ApiClient,
    token: &SecretString,
    id: Option<SliderId>,
    form: Form,
) -> Result<(), ApiError> {
    let request = match id {
        Some(id) => api.put(&format!("/sliders/{id}")),
        None => api.post("/sliders"),
    };
    request.bearer(token).multipart(form).send_empty().await
}

/// `DELETE /sliders/{id}`
///
/// # Errors
///
/// Returns the backend's rejection.
#[instrument(skip(api, token))]
pub async fn delete(api: &ApiClient, token: &SecretString, id: SliderId) -> Result<(), ApiError> {
    api.delete(&format!("/sliders/{id}"))
        .bearer(token)
        .send_empty()
        .await
}

#[derive(Serialize)]
struct Reorder<'a> {
    ids: &'a [SliderId],
}

/// `PUT /sliders/reorder` with the complete new order.
///
/// # Errors
///
/// Returns the backend's rejection.
#[instrument(skip(api, token))]
pub async fn reorder(api: &ApiClient, token: &SecretString, ids: &[SliderId]) -> Result<(), ApiError> {
    api.put("/sliders/reorder")
        .bearer(token)
        .json(&Reorder { ids })
        .send_empty()
        .await
}
