//! Account route handlers: profile, password and profile picture.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::{Multipart, State},
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
};
use emporium_core::User;
use emporium_core::api::{ApiError, Upload};
use tower_sessions::Session;
use tracing::instrument;
use validator::Validate;

use crate::api;
use crate::error::{AppError, Result};
use crate::filters;
use crate::forms::{FormErrors, PasswordForm, ProfileForm};
use crate::middleware::{AuthContext, RequireAuth, update_current_user};
use crate::models::CurrentUser;
use crate::state::AppState;

/// Multipart field carrying the picture.
const PICTURE_FIELD: &str = "picture";

/// Account page template.
#[derive(Template, WebTemplate)]
#[template(path = "account/index.html")]
pub struct AccountTemplate {
    pub current_user: Option<CurrentUser>,
    pub profile: ProfileForm,
    pub avatar: Option<String>,
    pub initials: String,
    pub profile_errors: FormErrors,
    pub password_errors: FormErrors,
    pub success: Option<String>,
    pub error: Option<String>,
}

impl AccountTemplate {
    fn new(state: &AppState, user: &User) -> Self {
        Self {
            current_user: Some(CurrentUser::from(user).resolve_avatar(|p| state.media(p))),
            profile: ProfileForm {
                name: user.name.clone(),
                email: user.email.clone(),
                phone: user.phone.clone(),
            },
            avatar: user.avatar.as_deref().map(|p| state.media(p)),
            initials: user.initials(),
            profile_errors: FormErrors::default(),
            password_errors: FormErrors::default(),
            success: None,
            error: None,
        }
    }

    fn success(mut self, message: &str) -> Self {
        self.success = Some(message.to_string());
        self
    }

    fn failure(mut self, error: &ApiError) -> Self {
        self.error = Some(error.user_message());
        self
    }
}

/// Reload the profile, falling back to the session's display data when the
/// read fails for any reason other than a rejected token.
async fn load_profile(state: &AppState, auth: &AuthContext) -> Result<User> {
    match api::profile::get(state.api(), &auth.token).await {
        Ok(user) => Ok(user),
        Err(e) if e.is_unauthorized() => Err(e.into()),
        Err(e) => {
            tracing::warn!(error = %e, "Failed to reload profile");
            Ok(User::from(auth.user.clone()))
        }
    }
}

/// Display the account page.
///
/// # Errors
///
/// Returns error if the profile cannot be loaded.
#[instrument(skip(state, auth))]
pub async fn index(
    State(state): State<AppState>,
    RequireAuth(auth): RequireAuth,
) -> Result<impl IntoResponse> {
    let user = api::profile::get(state.api(), &auth.token).await?;
    Ok(AccountTemplate::new(&state, &user))
}

/// Update name, email and phone.
///
/// # Errors
///
/// Returns error if the session cannot be updated or the token is rejected.
#[instrument(skip(state, auth, session, form))]
pub async fn update_profile(
    State(state): State<AppState>,
    RequireAuth(auth): RequireAuth,
    session: Session,
    Form(form): Form<ProfileForm>,
) -> Result<Response> {
    if let Err(e) = form.validate() {
        let user = load_profile(&state, &auth).await?;
        let mut page = AccountTemplate::new(&state, &user);
        page.profile = form;
        page.profile_errors = FormErrors::from_validation(&e);
        return Ok((StatusCode::UNPROCESSABLE_ENTITY, page).into_response());
    }

    match api::profile::update(state.api(), &auth.token, &form.cleaned()).await {
        Ok(user) => {
            update_current_user(&session, &state, &user).await?;
            tracing::info!(user_id = %user.id, "Profile updated");
            Ok(AccountTemplate::new(&state, &user)
                .success("Your profile has been updated.")
                .into_response())
        }
        Err(e) if e.is_unauthorized() => Err(e.into()),
        Err(e) => {
            let user = load_profile(&state, &auth).await?;
            let mut page = AccountTemplate::new(&state, &user).failure(&e);
            page.profile = form;
            page.profile_errors = FormErrors::from_api(&e);
            Ok((StatusCode::UNPROCESSABLE_ENTITY, page).into_response())
        }
    }
}

/// Change the password.
///
/// # Errors
///
/// Returns error if the token is rejected.
#[instrument(skip(state, auth, form))]
pub async fn change_password(
    State(state): State<AppState>,
    RequireAuth(auth): RequireAuth,
    Form(form): Form<PasswordForm>,
) -> Result<Response> {
    // Rejected locally without touching the backend.
    if let Err(e) = form.validate() {
        let mut page = AccountTemplate::new(&state, &User::from(auth.user.clone()));
        page.password_errors = FormErrors::from_validation(&e);
        return Ok((StatusCode::UNPROCESSABLE_ENTITY, page).into_response());
    }

    let result = api::profile::change_password(state.api(), &auth.token, &form).await;
    let user = load_profile(&state, &auth).await?;

    match result {
        Ok(()) => Ok(AccountTemplate::new(&state, &user)
            .success("Your password has been changed.")
            .into_response()),
        Err(e) if e.is_unauthorized() => Err(e.into()),
        Err(e) => {
            let mut page = AccountTemplate::new(&state, &user).failure(&e);
            page.password_errors = FormErrors::from_api(&e);
            Ok((StatusCode::UNPROCESSABLE_ENTITY, page).into_response())
        }
    }
}

/// Read the picture out of the browser's multipart body.
async fn read_picture(mut multipart: Multipart) -> Result<Option<Upload>> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::BadRequest(e.body_text()))?
    {
        if field.name() != Some(PICTURE_FIELD) {
            continue;
        }
        let upload = Upload {
            field: PICTURE_FIELD.to_string(),
            file_name: field.file_name().unwrap_or_default().to_string(),
            content_type: field.content_type().map(ToString::to_string),
            bytes: field
                .bytes()
                .await
                .map_err(|e| AppError::BadRequest(e.body_text()))?
                .to_vec(),
        };
        return Ok(Some(upload).filter(|u| !u.is_empty()));
    }
    Ok(None)
}

/// Upload a new profile picture, passed through to the backend as multipart.
///
/// # Errors
///
/// Returns error if the body is malformed or the token is rejected.
#[instrument(skip(state, auth, session, multipart))]
pub async fn upload_picture(
    State(state): State<AppState>,
    RequireAuth(auth): RequireAuth,
    session: Session,
    multipart: Multipart,
) -> Result<Response> {
    let Some(picture) = read_picture(multipart).await? else {
        let user = load_profile(&state, &auth).await?;
        let mut page = AccountTemplate::new(&state, &user);
        page.error = Some("Please choose an image to upload.".to_string());
        return Ok((StatusCode::UNPROCESSABLE_ENTITY, page).into_response());
    };

    let result = match picture.attach(reqwest::multipart::Form::new()) {
        Ok(form) => api::profile::upload_picture(state.api(), &auth.token, form).await,
        Err(e) => Err(e),
    };

    match result {
        Ok(user) => {
            update_current_user(&session, &state, &user).await?;
            Ok(Redirect::to("/account").into_response())
        }
        Err(e) if e.is_unauthorized() => Err(e.into()),
        Err(e) => {
            let user = load_profile(&state, &auth).await?;
            Ok((
                StatusCode::UNPROCESSABLE_ENTITY,
                AccountTemplate::new(&state, &user).failure(&e),
            )
                .into_response())
        }
    }
}

/// Remove the profile picture.
///
/// # Errors
///
/// Returns error if the session cannot be updated or the token is rejected.
#[instrument(skip(state, auth, session))]
pub async fn delete_picture(
    State(state): State<AppState>,
    RequireAuth(auth): RequireAuth,
    session: Session,
) -> Result<Response> {
    match api::profile::delete_picture(state.api(), &auth.token).await {
        Ok(()) => {
            let user = load_profile(&state, &auth).await?;
            update_current_user(&session, &state, &user).await?;
            Ok(AccountTemplate::new(&state, &user)
                .success("Your profile picture has been removed.")
                .into_response())
        }
        Err(e) if e.is_unauthorized() => Err(e.into()),
        Err(e) => {
            let user = load_profile(&state, &auth).await?;
            Ok((
                StatusCode::UNPROCESSABLE_ENTITY,
                AccountTemplate::new(&state, &user).failure(&e),
            )
                .into_response())
        }
    }
}
