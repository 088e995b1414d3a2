//! Products, categories, search and home-page sliders.

use emporium_core::api::{ApiClient, ApiError};
use emporium_core::sort::SortKey;
use emporium_core::{Category, CategoryId, Page, Product, ProductId, Slider};
use secrecy::SecretString;
use serde::Serialize;
use tracing::instrument;

/// Query for the product listing.
#[derive(Debug, Default, Serialize)]
pub struct ProductQuery {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<CategoryId>,
    pub page: u32,
}

/// `GET /sliders`
///
/// # Errors
///
/// Returns error if the backend call fails.
#[instrument(skip(api))]
pub async fn sliders(api: &ApiClient) -> Result<Vec<Slider>, ApiError> {
    api.get("/sliders").send_json().await
}

/// `GET /categories`
///
/// # Errors
///
/// Returns error if the backend call fails.
#[instrument(skip(api))]
pub async fn categories(api: &ApiClient) -> Result<Vec<Category>, ApiError> {
    api.get("/categories").send_json().await
}

/// `GET /products?category=&page=`
///
/// The token, when present, lets the backend fill in `is_liked`.
///
/// # Errors
///
/// Returns error if the backend call fails.
#[instrument(skip(api, token))]
pub async fn products(
    api: &ApiClient,
    query: &ProductQuery,
    token: Option<&SecretString>,
) -> Result<Page<Product>, ApiError> {
    api.get("/products")
        .query(query)
        .maybe_bearer(token)
        .send_json()
        .await
}

/// `GET /products/{id}`
///
/// # Errors
///
/// Returns error if the backend call fails.
#[instrument(skip(api, token))]
pub async fn product(
    api: &ApiClient,
    id: ProductId,
    token: Option<&SecretString>,
) -> Result<Product, ApiError> {
    api.get(&format!("/products/{id}"))
        .maybe_bearer(token)
        .send_json()
        .await
}

#[derive(Serialize)]
struct SearchQuery<'a> {
    q: &'a str,
    page: u32,
    sort: SortKey,
}

/// `GET /products/search?q=&page=&sort=`
///
/// # Errors
///
/// Returns error if the backend call fails.
#[instrument(skip(api, token))]
pub async fn search(
    api: &ApiClient,
    q: &str,
    page: u32,
    sort: SortKey,
    token: Option<&SecretString>,
) -> Result<Page<Product>, ApiError> {
    api.get("/products/search")
        .query(&SearchQuery { q, page, sort })
        .maybe_bearer(token)
        .send_json()
        .await
}
