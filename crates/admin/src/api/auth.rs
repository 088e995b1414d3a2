//! Backend login.

use emporium_core::AuthSession;
use emporium_core::api::{ApiClient, ApiError};
use serde::Serialize;
use tracing::instrument;

#[derive(Serialize)]
struct Credentials<'a> {
    email: &'a str,
    password: &'a str,
}

/// `POST /auth/login`
///
/// The role check happens after this call; the backend logs in any account.
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
