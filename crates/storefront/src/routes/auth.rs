//! Authentication route handlers.
//!
//! Login and registration are delegated to the backend, which answers with a
//! bearer token that is kept in the session.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
};
use serde::Deserialize;
use tower_sessions::Session;
use tracing::instrument;
use validator::Validate;

use crate::api;
use crate::error::{Result, clear_sentry_user, set_sentry_user};
use crate::filters;
use crate::forms::{FormErrors, LoginForm, RegisterForm};
use crate::middleware::{OptionalAuth, sign_in, sign_out};
use crate::models::CurrentUser;
use crate::state::AppState;

/// Query parameters for success display.
#[derive(Debug, Deserialize)]
pub struct MessageQuery {
    pub success: Option<String>,
}

/// Login page template.
#[derive(Template, WebTemplate)]
#[template(path = "auth/login.html")]
pub struct LoginTemplate {
    pub current_user: Option<CurrentUser>,
    pub email: String,
    pub errors: FormErrors,
    pub error: Option<String>,
    pub success: Option<String>,
}

/// Register page template.
#[derive(Template, WebTemplate)]
#[template(path = "auth/register.html")]
pub struct RegisterTemplate {
    pub current_user: Option<CurrentUser>,
    pub name: String,
    pub email: String,
    pub errors: FormErrors,
    pub error: Option<String>,
}

/// Display the login page.
#[instrument(skip(auth))]
pub async fn login_page(auth: OptionalAuth, Query(query): Query<MessageQuery>) -> Response {
    if auth.0.is_some() {
        return Redirect::to("/account").into_response();
    }

    LoginTemplate {
        current_user: None,
        email: String::new(),
        errors: FormErrors::default(),
        error: None,
        success: query.success,
    }
    .into_response()
}

/// Handle login form submission.
///
/// # Errors
///
/// Returns error if the session cannot be written.
#[instrument(skip(state, session, form), fields(email = %form.email))]
pub async fn login(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<LoginForm>,
) -> Result<Response> {
    let page = |errors, error| LoginTemplate {
        current_user: None,
        email: form.email.clone(),
        errors,
        error,
        success: None,
    };

    if let Err(e) = form.validate() {
        return Ok((
            StatusCode::UNPROCESSABLE_ENTITY,
            page(FormErrors::from_validation(&e), None),
        )
            .into_response());
    }

    match api::auth::login(state.api(), form.email.trim(), &form.password).await {
        Ok(login) => {
            sign_in(&session, &state, &login).await?;
            set_sentry_user(&login.user.id, Some(&login.user.email));
            tracing::info!(user_id = %login.user.id, "Customer logged in");
            Ok(Redirect::to("/").into_response())
        }
        Err(e) => {
            tracing::warn!(error = %e, "Login failed");
            let message = if e.is_unauthorized() {
                "Invalid email or password.".to_string()
            } else {
                e.user_message()
            };
            Ok((
                StatusCode::UNPROCESSABLE_ENTITY,
                page(FormErrors::from_api(&e), Some(message)),
            )
                .into_response())
        }
    }
}

/// Display the registration page.
#[instrument(skip(auth))]
pub async fn register_page(auth: OptionalAuth) -> Response {
    if auth.0.is_some() {
        return Redirect::to("/account").into_response();
    }

    RegisterTemplate {
        current_user: None,
        name: String::new(),
        email: String::new(),
        errors: FormErrors::default(),
        error: None,
    }
    .into_response()
}

/// Handle registration form submission. A successful registration logs the
/// customer in.
///
/// # Errors
///
/// Returns error if the session cannot be written.
#[instrument(skip(state, session, form), fields(email = %form.email))]
pub async fn register(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<RegisterForm>,
) -> Result<Response> {
    let page = |errors, error| RegisterTemplate {
        current_user: None,
        name: form.name.clone(),
        email: form.email.clone(),
        errors,
        error,
    };

    if let Err(e) = form.validate() {
        return Ok((
            StatusCode::UNPROCESSABLE_ENTITY,
            page(FormErrors::from_validation(&e), None),
        )
            .into_response());
    }

    match api::auth::register(state.api(), &form.payload()).await {
        Ok(login) => {
            sign_in(&session, &state, &login).await?;
            set_sentry_user(&login.user.id, Some(&login.user.email));
            tracing::info!(user_id = %login.user.id, "Customer registered");
            Ok(Redirect::to("/").into_response())
        }
        Err(e) => {
            tracing::warn!(error = %e, "Registration failed");
            Ok((
                StatusCode::UNPROCESSABLE_ENTITY,
                page(FormErrors::from_api(&e), Some(e.user_message())),
            )
                .into_response())
        }
    }
}

/// Handle logout.
///
/// # Errors
///
/// Returns error if the session cannot be flushed.
#[instrument(skip(session))]
pub async fn logout(session: Session) -> Result<Redirect> {
    sign_out(&session).await?;
    clear_sentry_user();
    Ok(Redirect::to("/"))
}
