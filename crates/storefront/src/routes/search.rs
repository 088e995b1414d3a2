//! Product search route handler.
//!
//! The search input issues a request on every change, and each request
//! goes to the backend. Results are sorted locally.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    extract::{Query, State},
    http::HeaderMap,
    response::{IntoResponse, Response},
};
use emporium_core::sort::{SortKey, sort_products};
use serde::Deserialize;
use tracing::instrument;

use crate::api;
use crate::filters;
use crate::htmx;
use crate::middleware::OptionalAuth;
use crate::models::CurrentUser;
use crate::state::AppState;
use crate::views::{Pager, ProductCard, query_prefix};

/// Search query parameters.
#[derive(Debug, Default, Deserialize)]
pub struct SearchParams {
    #[serde(default)]
    pub q: String,
    pub page: Option<u32>,
    pub sort: Option<String>,
}

/// Full search page.
#[derive(Template, WebTemplate)]
#[template(path = "search.html")]
pub struct SearchTemplate {
    pub current_user: Option<CurrentUser>,
    pub query: String,
    pub sort: SortKey,
    pub sort_options: [SortKey; 6],
    pub products: Vec<ProductCard>,
    pub total: u64,
    pub pager: Pager,
    pub pager_query: String,
    pub error: Option<String>,
}

/// Results fragment swapped in by HTMX.
#[derive(Template, WebTemplate)]
#[template(path = "partials/search_results.html")]
pub struct SearchResultsTemplate {
    pub signed_in: bool,
    pub query: String,
    pub sort: SortKey,
    pub products: Vec<ProductCard>,
    pub total: u64,
    pub pager: Pager,
    pub pager_query: String,
    pub error: Option<String>,
}

/// Search products.
///
/// An empty query renders the bare form without calling the backend.
#[instrument(skip(state, auth, headers), fields(q = %params.q))]
pub async fn index(
    State(state): State<AppState>,
    auth: OptionalAuth,
    headers: HeaderMap,
    Query(params): Query<SearchParams>,
) -> Response {
    let query = params.q.trim().to_string();
    let sort = SortKey::from_query(params.sort.as_deref());
    let page = params.page.unwrap_or(1).max(1);

    let (products, total, pager, error) = if query.is_empty() {
        (Vec::new(), 0, Pager::default(), None)
    } else {
        match api::catalog::search(state.api(), &query, page, sort, auth.token()).await {
            Ok(mut results) => {
                sort_products(&mut results.items, sort);
                (
                    ProductCard::list(&state, &results.items),
                    results.total,
                    Pager::from(&results),
                    None,
                )
            }
            Err(e) => {
                tracing::warn!(error = %e, "Search failed");
                (Vec::new(), 0, Pager::default(), Some(e.user_message()))
            }
        }
    };

    let pager_query = query_prefix(&[("q", &query), ("sort", sort.as_str())]);

    if htmx::is_htmx(&headers) {
        return SearchResultsTemplate {
            signed_in: auth.0.is_some(),
            query,
            sort,
            products,
            total,
            pager,
            pager_query,
            error,
        }
        .into_response();
    }

    SearchTemplate {
        current_user: auth.user(),
        query,
        sort,
        sort_options: SortKey::ALL,
        products,
        total,
        pager,
        pager_query,
        error,
    }
    .into_response()
}
