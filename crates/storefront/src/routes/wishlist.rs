//! Wishlist route handlers.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::State,
    response::{IntoResponse, Response},
};
use emporium_core::ProductId;
use emporium_core::toast::Toast;
use serde::Deserialize;
use tracing::instrument;

use crate::api;
use crate::error::Result;
use crate::filters;
use crate::htmx::{self, HxResponse};
use crate::middleware::RequireAuth;
use crate::models::CurrentUser;
use crate::state::AppState;
use crate::views::ProductCard;

/// Wishlist page template.
#[derive(Template, WebTemplate)]
#[template(path = "wishlist.html")]
pub struct WishlistTemplate {
    pub current_user: Option<CurrentUser>,
    pub products: Vec<ProductCard>,
}

/// Heart button fragment.
#[derive(Template, WebTemplate)]
#[template(path = "partials/like_button.html")]
pub struct LikeButtonTemplate {
    pub product_id: ProductId,
    pub is_liked: bool,
}

/// Toggle form data.
#[derive(Debug, Deserialize)]
pub struct ToggleForm {
    pub product_id: ProductId,
}

/// Display the liked products.
///
/// # Errors
///
/// Returns error if the wishlist cannot be loaded.
#[instrument(skip(state, auth))]
pub async fn index(
    State(state): State<AppState>,
    RequireAuth(auth): RequireAuth,
) -> Result<impl IntoResponse> {
    let items = api::wishlist::list(state.api(), &auth.token).await?;
    let products = items
        .iter()
        .map(|item| {
            let mut card = ProductCard::new(&state, &item.product);
            card.is_liked = true;
            card
        })
        .collect();

    Ok(WishlistTemplate {
        current_user: Some(auth.user),
        products,
    })
}

/// Like or unlike a product (HTMX).
///
/// The wishlist is read first so the toggle acts on the backend's state, not
/// on whatever the page showed when it was rendered.
///
/// # Errors
///
/// Returns error only when the backend rejects the session.
#[instrument(skip(state, auth))]
pub async fn toggle(
    State(state): State<AppState>,
    RequireAuth(auth): RequireAuth,
    Form(form): Form<ToggleForm>,
) -> Result<Response> {
    let items = match api::wishlist::list(state.api(), &auth.token).await {
        Ok(items) => items,
        Err(e) => return htmx::rejected(e),
    };
    let liked = items.iter().any(|item| item.product.id == form.product_id);

    let (result, now_liked, message) = if liked {
        (
            api::wishlist::remove(state.api(), &auth.token, form.product_id).await,
            false,
            "Removed from your wishlist",
        )
    } else {
        (
            api::wishlist::add(state.api(), &auth.token, form.product_id).await,
            true,
            "Added to your wishlist",
        )
    };
    if let Err(e) = result {
        return htmx::rejected(e);
    }

    Ok(HxResponse::new(LikeButtonTemplate {
        product_id: form.product_id,
        is_liked: now_liked,
    })
    .toast(&Toast::success(message))
    .into_response())
}
