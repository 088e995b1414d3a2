//! Review route handlers (HTMX).
//!
//! Every mutation re-reads the product's reviews and swaps the whole list, so
//! counts and helpful marks always come from the backend.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::{Path, State},
    response::{IntoResponse, Response},
};
use emporium_core::toast::Toast;
use emporium_core::{ProductId, ReviewId};
use serde::Deserialize;
use tracing::instrument;
use validator::Validate;

use crate::api;
use crate::error::Result;
use crate::forms::{FormErrors, ReviewForm};
use crate::htmx::{self, HxResponse};
use crate::middleware::{AuthContext, RequireAuth};
use crate::state::AppState;
use crate::views::ReviewView;

/// Review list fragment, also included by the product page.
#[derive(Template, WebTemplate)]
#[template(path = "partials/reviews.html")]
pub struct ReviewsTemplate {
    pub product_id: ProductId,
    pub reviews: Vec<ReviewView>,
    pub can_review: bool,
    pub review_error: Option<String>,
}

/// Edit form posted from an existing review.
#[derive(Debug, Deserialize)]
pub struct ReviewUpdateForm {
    pub product_id: ProductId,
    pub rating: u8,
    #[serde(default)]
    pub comment: String,
}

impl ReviewUpdateForm {
    fn review(&self) -> ReviewForm {
        ReviewForm {
            rating: self.rating,
            comment: self.comment.trim().to_string(),
        }
    }
}

/// Hidden product reference on delete and helpful buttons.
#[derive(Debug, Deserialize)]
pub struct ProductRef {
    pub product_id: ProductId,
}

/// Post a review.
///
/// # Errors
///
/// Returns error only when the backend rejects the session.
#[instrument(skip(state, auth, form))]
pub async fn create(
    State(state): State<AppState>,
    RequireAuth(auth): RequireAuth,
    Path(product_id): Path<ProductId>,
    Form(form): Form<ReviewForm>,
) -> Result<Response> {
    let form = ReviewForm {
        comment: form.comment.trim().to_string(),
        ..form
    };
    if let Err(e) = form.validate() {
        return Ok(invalid(&FormErrors::from_validation(&e)));
    }
    if let Err(e) = api::reviews::create(state.api(), &auth.token, product_id, &form).await {
        return htmx::rejected(e);
    }

    render(&state, &auth, product_id, "Thanks for your review").await
}

/// Edit the customer's own review.
///
/// # Errors
///
/// Returns error only when the backend rejects the session.
#[instrument(skip(state, auth, form))]
pub async fn update(
    State(state): State<AppState>,
    RequireAuth(auth): RequireAuth,
    Path(review_id): Path<ReviewId>,
    Form(form): Form<ReviewUpdateForm>,
) -> Result<Response> {
    let review = form.review();
    if let Err(e) = review.validate() {
        return Ok(invalid(&FormErrors::from_validation(&e)));
    }
    if let Err(e) = api::reviews::update(state.api(), &auth.token, review_id, &review).await {
        return htmx::rejected(e);
    }

    render(&state, &auth, form.product_id, "Review updated").await
}

/// Delete the customer's own review.
///
/// # Errors
///
/// Returns error only when the backend rejects the session.
#[instrument(skip(state, auth))]
pub async fn delete(
    State(state): State<AppState>,
    RequireAuth(auth): RequireAuth,
    Path(review_id): Path<ReviewId>,
    Form(form): Form<ProductRef>,
) -> Result<Response> {
    if let Err(e) = api::reviews::delete(state.api(), &auth.token, review_id).await {
        return htmx::rejected(e);
    }

    render(&state, &auth, form.product_id, "Review deleted").await
}

/// Toggle the customer's helpful mark on a review.
///
/// # Errors
///
/// Returns error only when the backend rejects the session.
#[instrument(skip(state, auth))]
pub async fn helpful(
    State(state): State<AppState>,
    RequireAuth(auth): RequireAuth,
    Path(review_id): Path<ReviewId>,
    Form(form): Form<ProductRef>,
) -> Result<Response> {
    if let Err(e) = api::reviews::toggle_helpful(state.api(), &auth.token, review_id).await {
        return htmx::rejected(e);
    }

    render(&state, &auth, form.product_id, "Thanks for your feedback").await
}

/// Local validation failure: keep the form as typed and explain in a toast.
fn invalid(errors: &FormErrors) -> Response {
    let message = errors
        .get("rating")
        .or_else(|| errors.get("comment"))
        .unwrap_or("Please check your review");
    HxResponse::new("")
        .reswap("none")
        .toast(&Toast::error(message))
        .into_response()
}

async fn render(
    state: &AppState,
    auth: &AuthContext,
    product_id: ProductId,
    message: &str,
) -> Result<Response> {
    match api::reviews::list(state.api(), product_id, Some(&auth.token)).await {
        Ok(reviews) => Ok(HxResponse::new(ReviewsTemplate {
            product_id,
            reviews: reviews
                .iter()
                .map(|r| ReviewView::new(state, r, Some(auth.user.id)))
                .collect(),
            can_review: true,
            review_error: None,
        })
        .toast(&Toast::success(message))
        .into_response()),
        Err(e) => htmx::rejected(e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_update_form_trims_comment() {
        let form = ReviewUpdateForm {
            product_id: ProductId::new(1),
            rating: 4,
            comment: "  Fits well \n".to_string(),
        };
        let review = form.review();
        assert_eq!(review.comment, "Fits well");
        assert!(review.validate().is_ok());
    }
}
