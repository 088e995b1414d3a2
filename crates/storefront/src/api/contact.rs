//! Contact form submission.

use emporium_core::api::{ApiClient, ApiError};
use tracing::instrument;

use crate::forms::ContactForm;

/// `POST /contact-messages`
///
/// # Errors
///
/// Returns error if the backend rejects the message.
#[instrument(skip_all, fields(subject = %form.subject))]
pub async fn submit(api: &ApiClient, form: &ContactForm) -> Result<(), ApiError> {
    api.post("/contact-messages").json(form).send_empty().await
}
