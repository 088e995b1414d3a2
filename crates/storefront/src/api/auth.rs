//! Login and registration.

use emporium_core::AuthSession;
use emporium_core::api::{ApiClient, ApiError};
use serde::Serialize;
use tracing::instrument;

use crate::forms::RegisterPayload;

#[derive(Serialize)]
struct Credentials<'a> {
    email: &'a str,
    password: &'a str,
}

/// `POST /auth/login`
///
/// # Errors
///
/// Backend rejection of the credentials surfaces as `Unauthorized` or `Validation`.
#[instrument(skip(api, password))]
pub async fn login(api: &ApiClient, email: &str, password: &str) -> Result<AuthSession, ApiError> {
    api.post("/auth/login")
        .json(&Credentials { email, password })
        .send_json()
        .await
}

/// `POST /auth/register`
///
/// # Errors
///
/// Returns the backend's validation failure when the email is taken.
#[instrument(skip_all, fields(email = %payload.email))]
pub async fn register(api: &ApiClient, payload: &RegisterPayload<'_>) -> Result<AuthSession, ApiError> {
    api.post("/auth/register").json(payload).send_json().await
}
