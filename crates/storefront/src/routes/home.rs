//! Home page route handler.

use askama::Template;
use askama_web::WebTemplate;
use axum::{extract::State, response::IntoResponse};
use emporium_core::Slider;
use tracing::instrument;

use crate::api::catalog::{self, ProductQuery};
use crate::filters;
use crate::middleware::OptionalAuth;
use crate::models::CurrentUser;
use crate::state::AppState;
use crate::views::{ProductCard, SlideView};

/// Number of products in the featured grid.
const FEATURED_COUNT: usize = 8;

/// Home page template.
#[derive(Template, WebTemplate)]
#[template(path = "index.html")]
pub struct HomeTemplate {
    pub current_user: Option<CurrentUser>,
    pub slides: Vec<SlideView>,
    pub featured: Vec<ProductCard>,
}

/// Display the home page.
///
/// Sliders and featured products are fetched concurrently. Either failing
/// leaves its section empty; the page itself always renders.
#[instrument(skip(state, auth))]
pub async fn home(State(state): State<AppState>, auth: OptionalAuth) -> impl IntoResponse {
    let query = ProductQuery::default();
    let (sliders, products) = tokio::join!(
        catalog::sliders(state.api()),
        catalog::products(state.api(), &query, auth.token()),
    );

    let slides = match sliders {
        Ok(sliders) => Slider::active_in_order(sliders)
            .iter()
            .map(|s| SlideView::new(&state, s))
            .collect(),
        Err(e) => {
            tracing::warn!(error = %e, "Failed to load sliders, rendering empty hero");
            Vec::new()
        }
    };

    let featured = match products {
        Ok(page) => {
            let mut cards = ProductCard::list(&state, &page.items);
            cards.truncate(FEATURED_COUNT);
            cards
        }
        Err(e) => {
            tracing::warn!(error = %e, "Failed to load featured products");
            Vec::new()
        }
    };

    HomeTemplate {
        current_user: auth.user(),
        slides,
        featured,
    }
}
