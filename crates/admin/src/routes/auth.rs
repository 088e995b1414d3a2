//! Authentication route handlers for admin.
//!
//! Credentials are checked by the backend; only accounts whose role is admin
//! get a session here.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form, Router,
    extract::{Query, State},
    http::{HeaderMap, HeaderValue, StatusCode},
    response::{IntoResponse, Redirect, Response},
    routing::{get, post},
};
use serde::Deserialize;
use tower_sessions::Session;
use tracing::instrument;
use validator::Validate;

use crate::api;
use crate::components::htmx::{self, HX_REDIRECT};
use crate::error::{Result, clear_sentry_user, set_sentry_user};
use crate::filters;
use crate::forms::{FormErrors, LoginForm};
use crate::middleware::{OptionalAdminAuth, SignInError, sign_in, sign_out};
use crate::state::AppState;

/// Where an expired session lands.
const EXPIRED_LOGIN: &str = "/auth/login?expired=true";

/// Login page template.
#[derive(Template, WebTemplate)]
#[template(path = "auth/login.html")]
pub struct LoginTemplate {
    pub email: String,
    pub errors: FormErrors,
    pub error: Option<String>,
    pub notice: Option<String>,
}

/// Query flags on the login page.
#[derive(Debug, Default, Deserialize)]
pub struct LoginQuery {
    #[serde(default)]
    pub expired: bool,
}

/// Build the auth router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/auth/login", get(login_page).post(login))
        .route("/auth/logout", post(logout))
        .route("/auth/expired", get(expired))
}

/// Render the login page.
///
/// GET /auth/login
#[instrument(skip(auth))]
async fn login_page(auth: OptionalAdminAuth, Query(query): Query<LoginQuery>) -> Response {
    if auth.0.is_some() {
        return Redirect::to("/").into_response();
    }

    LoginTemplate {
        email: String::new(),
        errors: FormErrors::default(),
        error: None,
        notice: query
            .expired
            .then(|| "Your session has expired. Please sign in again.".to_string()),
    }
    .into_response()
}

/// Handle login form submission.
///
/// POST /auth/login
#[instrument(skip(state, session, form), fields(email = %form.email))]
async fn login(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<LoginForm>,
) -> Result<Response> {
    let page = |errors, error: &str| {
        (
            StatusCode::UNPROCESSABLE_ENTITY,
            LoginTemplate {
                email: form.email.clone(),
                errors,
                error: (!error.is_empty()).then(|| error.to_string()),
                notice: None,
            },
        )
            .into_response()
    };

    if let Err(e) = form.validate() {
        return Ok(page(FormErrors::from_validation(&e), ""));
    }

    let login = match api::auth::login(state.api(), form.email.trim(), &form.password).await {
        Ok(login) => login,
        Err(e) => {
            tracing::warn!(error = %e, "Admin login failed");
            let message = if e.is_unauthorized() {
                "Invalid email or password.".to_string()
            } else {
                e.user_message()
            };
            return Ok(page(FormErrors::from_api(&e), &message));
        }
    };

    match sign_in(&session, &login).await {
        Ok(()) => {
            set_sentry_user(&login.user.id, Some(&login.user.email));
            tracing::info!(user_id = %login.user.id, "Admin logged in");
            Ok(Redirect::to("/").into_response())
        }
        Err(SignInError::NotAdmin) => {
            tracing::warn!(user_id = %login.user.id, "Non-admin account refused");
            Ok(page(
                FormErrors::default(),
                "This account does not have admin access.",
            ))
        }
        Err(SignInError::Session(e)) => Err(e.into()),
    }
}

/// Logout and clear session.
///
/// POST /auth/logout
#[instrument(skip(session))]
async fn logout(session: Session) -> Result<Redirect> {
    sign_out(&session).await?;
    clear_sentry_user();
    Ok(Redirect::to("/auth/login"))
}

/// The backend stopped accepting the token: forget it and ask for a new login.
///
/// GET /auth/expired
#[instrument(skip(session, headers))]
async fn expired(session: Session, headers: HeaderMap) -> Result<Response> {
    sign_out(&session).await?;
    clear_sentry_user();

    if htmx::is_htmx(&headers) {
        let mut response = StatusCode::OK.into_response();
        response
            .headers_mut()
            .insert(HX_REDIRECT, HeaderValue::from_static(EXPIRED_LOGIN));
        return Ok(response);
    }
    Ok(Redirect::to(EXPIRED_LOGIN).into_response())
}
