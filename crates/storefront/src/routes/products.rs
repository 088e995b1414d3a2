//! Product listing and detail route handlers.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    extract::{Path, Query, State},
    response::IntoResponse,
};
use emporium_core::sort::{SortKey, sort_products};
use emporium_core::{Category, CategoryId, ProductId};
use serde::Deserialize;
use tracing::instrument;

use crate::api::{self, catalog::ProductQuery};
use crate::error::Result;
use crate::filters;
use crate::middleware::OptionalAuth;
use crate::models::CurrentUser;
use crate::state::AppState;
use crate::views::{Pager, ProductCard, ProductDetail, ReviewView, query_prefix};

/// Query string of the listing.
///
/// Values arrive from `<select>` elements, so blank strings mean "not set".
#[derive(Debug, Default, Deserialize)]
pub struct ListParams {
    pub category: Option<String>,
    pub page: Option<u32>,
    pub sort: Option<String>,
}

impl ListParams {
    fn category(&self) -> Option<CategoryId> {
        self.category.as_deref().and_then(|c| c.parse().ok())
    }
}

/// Product listing template.
#[derive(Template, WebTemplate)]
#[template(path = "products/index.html")]
pub struct ProductsIndexTemplate {
    pub current_user: Option<CurrentUser>,
    pub products: Vec<ProductCard>,
    pub categories: Vec<Category>,
    pub selected_category: Option<CategoryId>,
    pub sort: SortKey,
    pub sort_options: [SortKey; 6],
    pub pager: Pager,
    pub pager_query: String,
    pub error: Option<String>,
}

/// Product detail template.
#[derive(Template, WebTemplate)]
#[template(path = "products/show.html")]
pub struct ProductShowTemplate {
    pub current_user: Option<CurrentUser>,
    pub product: ProductDetail,
    pub product_id: ProductId,
    pub is_liked: bool,
    pub reviews: Vec<ReviewView>,
    pub can_review: bool,
    pub review_error: Option<String>,
}

/// Display the product listing.
///
/// The backend filters and paginates; sorting is applied locally to the page
/// it returns. A failed fetch renders an empty grid with a message.
#[instrument(skip(state, auth))]
pub async fn index(
    State(state): State<AppState>,
    auth: OptionalAuth,
    Query(params): Query<ListParams>,
) -> impl IntoResponse {
    let selected_category = params.category();
    let sort = SortKey::from_query(params.sort.as_deref());
    let query = ProductQuery {
        category: selected_category,
        page: params.page.unwrap_or(1).max(1),
    };

    let (categories, page) = tokio::join!(
        api::catalog::categories(state.api()),
        api::catalog::products(state.api(), &query, auth.token()),
    );

    let categories = categories.unwrap_or_else(|e| {
        tracing::warn!(error = %e, "Failed to load categories");
        Vec::new()
    });

    let (products, pager, error) = match page {
        Ok(mut page) => {
            sort_products(&mut page.items, sort);
            (
                ProductCard::list(&state, &page.items),
                Pager::from(&page),
                None,
            )
        }
        Err(e) => {
            tracing::warn!(error = %e, "Failed to load products");
            (Vec::new(), Pager::default(), Some(e.user_message()))
        }
    };

    let category = selected_category.map(|c| c.to_string()).unwrap_or_default();
    let pager_query = query_prefix(&[("category", &category), ("sort", sort.as_str())]);

    ProductsIndexTemplate {
        current_user: auth.user(),
        products,
        categories,
        selected_category,
        sort,
        sort_options: SortKey::ALL,
        pager,
        pager_query,
        error,
    }
}

/// Display a product with its variants and reviews.
///
/// # Errors
///
/// Returns 404 if the backend does not know the product.
#[instrument(skip(state, auth))]
pub async fn show(
    State(state): State<AppState>,
    auth: OptionalAuth,
    Path(id): Path<ProductId>,
) -> Result<impl IntoResponse> {
    let (product, reviews) = tokio::join!(
        api::catalog::product(state.api(), id, auth.token()),
        api::reviews::list(state.api(), id, auth.token()),
    );
    let product = product?;

    let current_user = auth.user();
    let viewer = current_user.as_ref().map(|u| u.id);
    let (reviews, review_error) = match reviews {
        Ok(reviews) => (
            reviews
                .iter()
                .map(|r| ReviewView::new(&state, r, viewer))
                .collect(),
            None,
        ),
        Err(e) => {
            tracing::warn!(error = %e, product_id = %id, "Failed to load reviews");
            (Vec::new(), Some(e.user_message()))
        }
    };

    Ok(ProductShowTemplate {
        can_review: current_user.is_some(),
        current_user,
        is_liked: product.is_liked,
        product_id: product.id,
        product: ProductDetail::new(&state, &product),
        reviews,
        review_error,
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_listing_marks_selected_category() {
        let template = ProductsIndexTemplate {
            current_user: None,
            products: Vec::new(),
            categories: serde_json::from_str(
                r#"[{"id": 1, "name": "Lighting"}, {"id": 2, "name": "Seating"}]"#,
            )
            .unwrap(),
            selected_category: Some(CategoryId::new(2)),
            sort: SortKey::default(),
            sort_options: SortKey::ALL,
            pager: Pager::default(),
            pager_query: String::new(),
            error: None,
        };

        let html = template.render().unwrap();

        assert!(html.contains(r#"<option value="2" selected>Seating"#));
        assert!(html.contains(r#"<option value="1">Lighting"#));
    }

    #[test]
    fn test_blank_category_is_unset() {
        let params = ListParams {
            category: Some(String::new()),
            ..ListParams::default()
        };
        assert_eq!(params.category(), None);

        let params = ListParams {
            category: Some("4".to_string()),
            ..ListParams::default()
        };
        assert_eq!(params.category(), Some(CategoryId::new(4)));
    }
}
