//! Profile details, password and picture.

use emporium_core::User;
use emporium_core::api::{ApiClient, ApiError};
use reqwest::multipart::Form;
use secrecy::SecretString;
use serde::Serialize;
use tracing::instrument;

use crate::forms::{PasswordForm, ProfileForm};

/// `GET /profile`
///
/// # Errors
///
/// Returns error if the backend call fails.
#[instrument(skip_all)]
pub async fn get(api: &ApiClient, token: &SecretString) -> Result<User, ApiError> {
    api.get("/profile").bearer(token).send_json().await
}

/// `PUT /profile`, returning the updated account.
///
/// # Errors
///
/// Returns error if the backend rejects the change.
#[instrument(skip_all)]
pub async fn update(api: &ApiClient, token: &SecretString, form: &ProfileForm) -> Result<User, ApiError> {
    api.put("/profile").bearer(token).json(form).send_json().await
}

#[derive(Serialize)]
struct PasswordChange<'a> {
    current_password: &'a str,
    password: &'a str,
    password_confirmation: &'a str,
}

/// `PUT /profile/password`
///
/// # Errors
///
/// Returns a validation error when the current password is wrong.
#[instrument(skip_all)]
pub async fn change_password(
    api: &ApiClient,
    token: &SecretString,
    form: &PasswordForm,
) -> Result<(), ApiError> {
    api.put("/profile/password")
        .bearer(token)
        .json(&PasswordChange {
            current_password: &form.current_password,
            password: &form.password,
            password_confirmation: &form.password_confirmation,
        })
        .send_empty()
        .await
}

/// `POST /profile/picture` (multipart passthrough), returning the updated account.
///
/// # Errors
///
/// Returns error if the backend rejects the file.
#[instrument(skip_all)]
pub async fn upload_picture(api: &ApiClient, token: &SecretString, form: Form) -> Result<User, ApiError> {
    api.post("/profile/picture")
        .bearer(token)
        .multipart(form)
        .send_json()
        .await
}

/// `DELETE /profile/picture`
///
/// # Errors
///
/// Returns error if the backend call fails.
#[instrument(skip_all)]
pub async fn delete_picture(api: &ApiClient, token: &SecretString) -> Result<(), ApiError> {
    api.delete("/profile/picture").bearer(token).send_empty().await
}
