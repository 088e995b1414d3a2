//! Static page route handlers.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    http::{HeaderMap, HeaderValue},
    response::{IntoResponse, Response},
};
use tower_sessions::Session;
use tracing::instrument;

use crate::error::{Result, clear_sentry_user};
use crate::filters;
use crate::htmx;
use crate::middleware::{OptionalAuth, sign_out};
use crate::models::CurrentUser;

/// About page template.
#[derive(Template, WebTemplate)]
#[template(path = "pages/about.html")]
pub struct AboutTemplate {
    pub current_user: Option<CurrentUser>,
}

/// Terms page template.
#[derive(Template, WebTemplate)]
#[template(path = "pages/terms.html")]
pub struct TermsTemplate {
    pub current_user: Option<CurrentUser>,
}

/// Shown after the backend rejected the customer's token.
#[derive(Template, WebTemplate)]
#[template(path = "pages/unauthorized.html")]
pub struct UnauthorizedTemplate {
    pub current_user: Option<CurrentUser>,
}

/// Display the About page.
#[instrument(skip(auth))]
pub async fn about(auth: OptionalAuth) -> impl IntoResponse {
    AboutTemplate {
        current_user: auth.user(),
    }
}

/// Display the Terms page.
#[instrument(skip(auth))]
pub async fn terms(auth: OptionalAuth) -> impl IntoResponse {
    TermsTemplate {
        current_user: auth.user(),
    }
}

/// Clear the session and explain that the customer must log in again.
///
/// HTMX requests are told to navigate here instead of swapping the page into
/// a fragment.
///
/// # Errors
///
/// Returns error if the session cannot be flushed.
#[instrument(skip(session, headers))]
pub async fn unauthorized(session: Session, headers: HeaderMap) -> Result<Response> {
    sign_out(&session).await?;
    clear_sentry_user();

    if htmx::is_htmx(&headers) {
        return Ok((
            [(htmx::HX_REDIRECT, HeaderValue::from_static("/unauthorized"))],
            "",
        )
            .into_response());
    }

    Ok(UnauthorizedTemplate { current_user: None }.into_response())
}
