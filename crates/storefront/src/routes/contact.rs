//! Contact form route handlers.

use askama::Template;
use askama_web::WebTemplate;
use axum::{Form, extract::State, http::StatusCode, response::IntoResponse};
use tracing::instrument;
use validator::Validate;

use crate::api;
use crate::filters;
use crate::forms::{ContactForm, FormErrors};
use crate::middleware::OptionalAuth;
use crate::models::CurrentUser;
use crate::state::AppState;

const SENT_MESSAGE: &str = "Thanks for getting in touch. We'll reply within two business days.";

/// Contact page template.
#[derive(Template, WebTemplate)]
#[template(path = "contact.html")]
pub struct ContactTemplate {
    pub current_user: Option<CurrentUser>,
    pub form: ContactForm,
    pub errors: FormErrors,
    pub success: Option<String>,
    pub error: Option<String>,
}

/// Display the contact form, prefilled for logged-in customers.
#[instrument(skip(auth))]
pub async fn show(auth: OptionalAuth) -> impl IntoResponse {
    let current_user = auth.user();
    let form = current_user
        .as_ref()
        .map(|u| ContactForm {
            name: u.name.clone(),
            email: u.email.clone(),
            ..ContactForm::default()
        })
        .unwrap_or_default();

    ContactTemplate {
        current_user,
        form,
        errors: FormErrors::default(),
        success: None,
        error: None,
    }
}

/// Validate and forward a contact message.
///
/// The form is re-rendered with field messages on local or backend
/// validation failure and keeps its input; on success it is cleared.
#[instrument(skip(state, auth, form), fields(email = %form.email))]
pub async fn submit(
    State(state): State<AppState>,
    auth: OptionalAuth,
    Form(form): Form<ContactForm>,
) -> impl IntoResponse {
    let current_user = auth.user();

    if let Err(e) = form.validate() {
        return (
            StatusCode::UNPROCESSABLE_ENTITY,
            ContactTemplate {
                current_user,
                form,
                errors: FormErrors::from_validation(&e),
                success: None,
                error: None,
            },
        );
    }

    match api::contact::submit(state.api(), &form.cleaned()).await {
        Ok(()) => {
            tracing::info!("Contact message sent");
            (
                StatusCode::OK,
                ContactTemplate {
                    current_user,
                    form: ContactForm::default(),
                    errors: FormErrors::default(),
                    success: Some(SENT_MESSAGE.to_string()),
                    error: None,
                },
            )
        }
        Err(e) => {
            tracing::warn!(error = %e, "Contact message rejected");
            (
                StatusCode::UNPROCESSABLE_ENTITY,
                ContactTemplate {
                    current_user,
                    errors: FormErrors::from_api(&e),
                    error: Some(e.user_message()),
                    form,
                    success: None,
                },
            )
        }
    }
}
