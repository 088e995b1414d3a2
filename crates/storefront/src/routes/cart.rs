//! Cart route handlers.
//!
//! Cart operations use HTMX for dynamic updates without full page reloads.
//! The backend owns the cart: every mutation is followed by a fresh read and
//! nothing is kept in the session.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::State,
    response::{IntoResponse, Response},
};
use emporium_core::toast::Toast;
use emporium_core::{CartItemId, ProductId, VariantId};
use serde::Deserialize;
use tracing::instrument;

use crate::api::{self, cart::NewCartItem};
use crate::error::Result;
use crate::filters;
use crate::htmx::{self, HxResponse};
use crate::middleware::RequireAuth;
use crate::models::CurrentUser;
use crate::state::AppState;
use crate::views::CartView;

/// Client event fired after any cart change; the header badge listens for it.
pub const CART_UPDATED: &str = "cart-updated";

/// Cart page template.
#[derive(Template, WebTemplate)]
#[template(path = "cart/show.html")]
pub struct CartShowTemplate {
    pub current_user: Option<CurrentUser>,
    pub cart: CartView,
}

/// Cart lines fragment for HTMX swaps.
#[derive(Template, WebTemplate)]
#[template(path = "partials/cart_items.html")]
pub struct CartItemsTemplate {
    pub cart: CartView,
}

/// Cart count badge fragment.
#[derive(Template, WebTemplate)]
#[template(path = "partials/cart_count.html")]
pub struct CartCountTemplate {
    pub count: u32,
}

/// Add to cart form data.
#[derive(Debug, Deserialize)]
pub struct AddToCartForm {
    pub product_id: ProductId,
    /// Blank when the product has no variants.
    #[serde(default)]
    pub variant_id: Option<String>,
    #[serde(default = "default_quantity")]
    pub quantity: u32,
}

const fn default_quantity() -> u32 {
    1
}

impl AddToCartForm {
    fn item(&self) -> NewCartItem {
        NewCartItem {
            product_id: self.product_id,
            variant_id: self
                .variant_id
                .as_deref()
                .and_then(|v| v.parse::<VariantId>().ok()),
            quantity: self.quantity.max(1),
        }
    }
}

/// Update quantity form data.
#[derive(Debug, Deserialize)]
pub struct UpdateCartForm {
    pub item_id: CartItemId,
    pub quantity: u32,
}

/// Remove line form data.
#[derive(Debug, Deserialize)]
pub struct RemoveFromCartForm {
    pub item_id: CartItemId,
}

/// Display the cart page.
///
/// # Errors
///
/// Returns error if the cart cannot be loaded.
#[instrument(skip(state, auth))]
pub async fn show(
    State(state): State<AppState>,
    RequireAuth(auth): RequireAuth,
) -> Result<impl IntoResponse> {
    let cart = api::cart::get(state.api(), &auth.token).await?;

    Ok(CartShowTemplate {
        cart: CartView::new(&state, &cart),
        current_user: Some(auth.user),
    })
}

/// Add an item to the cart (HTMX).
///
/// Returns the updated count badge and fires `cart-updated`.
///
/// # Errors
///
/// Returns error only when the backend rejects the session.
#[instrument(skip(state, auth))]
pub async fn add(
    State(state): State<AppState>,
    RequireAuth(auth): RequireAuth,
    Form(form): Form<AddToCartForm>,
) -> Result<Response> {
    if let Err(e) = api::cart::add(state.api(), &auth.token, &form.item()).await {
        return htmx::rejected(e);
    }

    match api::cart::get(state.api(), &auth.token).await {
        Ok(cart) => Ok(HxResponse::new(CartCountTemplate {
            count: cart.item_count(),
        })
        .trigger(CART_UPDATED)
        .toast(&Toast::success("Added to cart"))
        .into_response()),
        Err(e) => htmx::rejected(e),
    }
}

/// Change a line's quantity (HTMX). A quantity of zero removes the line.
///
/// # Errors
///
/// Returns error only when the backend rejects the session.
#[instrument(skip(state, auth))]
pub async fn update(
    State(state): State<AppState>,
    RequireAuth(auth): RequireAuth,
    Form(form): Form<UpdateCartForm>,
) -> Result<Response> {
    let result = if form.quantity == 0 {
        api::cart::remove(state.api(), &auth.token, form.item_id).await
    } else {
        api::cart::update(state.api(), &auth.token, form.item_id, form.quantity).await
    };
    if let Err(e) = result {
        return htmx::rejected(e);
    }

    render_items(&state, &auth.token, None).await
}

/// Remove a line from the cart (HTMX).
///
/// # Errors
///
/// Returns error only when the backend rejects the session.
#[instrument(skip(state, auth))]
pub async fn remove(
    State(state): State<AppState>,
    RequireAuth(auth): RequireAuth,
    Form(form): Form<RemoveFromCartForm>,
) -> Result<Response> {
    if let Err(e) = api::cart::remove(state.api(), &auth.token, form.item_id).await {
        return htmx::rejected(e);
    }

    render_items(&state, &auth.token, Some(Toast::info("Removed from cart"))).await
}

/// Cart count badge (HTMX), refreshed on `cart-updated`.
///
/// Falls back to zero when the cart cannot be read.
#[instrument(skip(state, auth))]
pub async fn count(State(state): State<AppState>, RequireAuth(auth): RequireAuth) -> Response {
    let count = match api::cart::get(state.api(), &auth.token).await {
        Ok(cart) => cart.item_count(),
        Err(e) => {
            tracing::warn!(error = %e, "Failed to load cart count");
            0
        }
    };

    CartCountTemplate { count }.into_response()
}

async fn render_items(
    state: &AppState,
    token: &secrecy::SecretString,
    toast: Option<Toast>,
) -> Result<Response> {
    match api::cart::get(state.api(), token).await {
        Ok(cart) => {
            let mut response = HxResponse::new(CartItemsTemplate {
                cart: CartView::new(state, &cart),
            })
            .trigger(CART_UPDATED);
            if let Some(toast) = toast {
                response = response.toast(&toast);
            }
            Ok(response.into_response())
        }
        Err(e) => htmx::rejected(e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_form_defaults() {
        let form = AddToCartForm {
            product_id: ProductId::new(3),
            variant_id: Some(String::new()),
            quantity: 0,
        };
        let item = form.item();
        assert_eq!(item.variant_id, None);
        assert_eq!(item.quantity, 1);

        let form = AddToCartForm {
            variant_id: Some("12".to_string()),
            ..form
        };
        assert_eq!(form.item().variant_id, Some(VariantId::new(12)));
    }
}
