//! Categories and subcategories. Both are written as multipart so an image
//! can ride along.

use emporium_core::api::{ApiClient, ApiError};
use emporium_core::{Category, CategoryId, Subcategory, SubcategoryId};
use reqwest::multipart::Form;
use secrecy::SecretString;
use tracing::instrument;

/// `GET /categories`
///
/// # Errors
///
/// Returns error if the backend call fails.
#[instrument(skip_all)]
pub async fn categories(api: &ApiClient, token: &SecretString) -> Result<Vec<Category>, ApiError> {
    api.get("/categories").bearer(token).send_json().await
}

/// `GET /categories/{id}`
///
/// # Errors
///
/// Returns error if the backend call fails.
#[instrument(skip(api, token))]
pub async fn category(api: &ApiClient, token: &SecretString, id: CategoryId) -> Result<Category, ApiError> {
    api.get(&format!("/categories/{id}"))
        .bearer(token)
        .send_json()
        .await
}

/// `POST /categories` (create) or `PUT /categories/{id}` (update).
///
/// # Errors
///
/// Returns the backend's rejection.
#[instrument(skip(api, token, form))]
pub async fn save_category(
    api: &ApiClient,
    token: &SecretString,
    id: Option<CategoryId>,
    form: Form,
) -> Result<(), ApiError> {
    let request = match id {
        Some(id) => api.put(&format!("/categories/{id}")),
        None => api.post("/categories"),
    };
    request.bearer(token).multipart(form).send_empty().await
}

/// `DELETE /categories/{id}`
///
/// # Errors
///
/// Returns the backend's rejection, e.g. when subcategories still use it.
#[instrument(skip(api, token))]
pub async fn delete_category(api: &ApiClient, token: &SecretString, id: CategoryId) -> Result<(), ApiError> {
    api.delete(&format!("/categories/{id}"))
        .bearer(token)
        .send_empty()
        .await
}

/// `GET /subcategories`
///
/// # Errors
///
/// Returns error if the backend call fails.
#[instrument(skip_all)]
pub async fn subcategories(api: &ApiClient, token: &SecretString) -> Result<Vec<Subcategory>, ApiError> {
    api.get("/subcategories").bearer(token).send_json().await
}

/// `GET /subcategories/{id}`
///
/// # Errors
///
/// Returns error if the backend call fails.
#[instrument(skip(api, token))]
pub async fn subcategory(
    api: &ApiClient,
    token: &SecretString,
    id: SubcategoryId,
) -> Result<Subcategory, ApiError> {
    api.get(&format!("/subcategories/{id}"))
        .bearer(token)
        .send_json()
        .await
}

/// `POST /subcategories` (create) or `PUT /subcategories/{id}` (update).
///
/// # Errors
///
/// Returns the backend's rejection.
#[instrument(skip(api, token, form))]
pub async fn save_subcategory(
    api: &ApiClient,
    token: &SecretString,
    id: Option<SubcategoryId>,
    form: Form,
) -> Result<(), ApiError> {
    let request = match id {
        Some(id) => api.put(&format!("/subcategories/{id}")),
        None => api.post("/subcategories"),
    };
    request.bearer(token).multipart(form).send_empty().await
}

/// `DELETE /subcategories/{id}`
///
/// # Errors
///
/// Returns the backend's rejection.
#[instrument(skip(api, token))]
pub async fn delete_subcategory(
    api: &ApiClient,
    token: &SecretString,
    id: SubcategoryId,
) -> Result<(), ApiError> {
    api.delete(&format!("/subcategories/{id}"))
        .bearer(token)
        .send_empty()
        .await
}
