//! Authentication extractors.
//!
//! The backend issues a bearer token at login; the storefront keeps it in the
//! session next to a little display data and attaches it to every customer
//! call. Handlers ask for [`RequireAuth`] or [`OptionalAuth`].

use axum::{
    extract::FromRequestParts,
    http::{HeaderValue, StatusCode, request::Parts},
    response::{IntoResponse, Redirect, Response},
};
use emporium_core::{AuthSession, User};
use secrecy::SecretString;
use tower_sessions::Session;

use crate::htmx;
use crate::models::{CurrentUser, session_keys};
use crate::state::AppState;

/// A logged-in customer and the token to act on their behalf.
#[derive(Debug, Clone)]
pub struct AuthContext {
    pub user: CurrentUser,
    pub token: SecretString,
}

async fn load(session: &Session) -> Option<AuthContext> {
    let user: CurrentUser = session
        .get(session_keys::CURRENT_USER)
        .await
        .ok()
        .flatten()?;
    let token: String = session.get(session_keys::API_TOKEN).await.ok().flatten()?;
    Some(AuthContext {
        user,
        token: SecretString::from(token),
    })
}

/// Extractor that requires a logged-in customer.
///
/// Full page loads are redirected to the login page; HTMX requests get an
/// `HX-Redirect` so the whole page navigates instead of swapping a login form
/// into a fragment.
pub struct RequireAuth(pub AuthContext);

/// Error returned when authentication is required but the customer is not logged in.
pub enum AuthRejection {
    /// Redirect to login page (for HTML requests).
    RedirectToLogin { htmx: bool },
    /// No session layer is installed.
    Unauthorized,
}

impl IntoResponse for AuthRejection {
    fn into_response(self) -> Response {
        match self {
            Self::RedirectToLogin { htmx: true } => {
                let mut response = StatusCode::OK.into_response();
                response
                    .headers_mut()
                    .insert(htmx::HX_REDIRECT, HeaderValue::from_static("/auth/login"));
                response
            }
            Self::RedirectToLogin { htmx: false } => Redirect::to("/auth/login").into_response(),
            Self::Unauthorized => StatusCode::UNAUTHORIZED.into_response(),
        }
    }
}

impl<S> FromRequestParts<S> for RequireAuth
where
    S: Send + Sync,
{
    type Rejection = AuthRejection;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let session = parts
            .extensions
            .get::<Session>()
            .ok_or(AuthRejection::Unauthorized)?;

        load(session)
            .await
            .map(Self)
            .ok_or_else(|| AuthRejection::RedirectToLogin {
                htmx: htmx::is_htmx(&parts.headers),
            })
    }
}

/// Extractor that optionally gets the current customer.
pub struct OptionalAuth(pub Option<AuthContext>);

impl OptionalAuth {
    /// Display data for the header, if logged in.
    #[must_use]
    pub fn user(&self) -> Option<CurrentUser> {
        self.0.as_ref().map(|auth| auth.user.clone())
    }

    /// Bearer token, if logged in.
    #[must_use]
    pub fn token(&self) -> Option<&SecretString> {
        self.0.as_ref().map(|auth| &auth.token)
    }
}

impl<S> FromRequestParts<S> for OptionalAuth
where
    S: Send + Sync,
{
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let auth = match parts.extensions.get::<Session>() {
            Some(session) => load(session).await,
            None => None,
        };

        Ok(Self(auth))
    }
}

/// Store a fresh login in the session.
///
/// The session ID is cycled first so a pre-login cookie cannot be replayed.
///
/// # Errors
///
/// Returns an error if the session cannot be modified.
pub async fn sign_in(
    session: &Session,
    state: &AppState,
    login: &AuthSession,
) -> Result<(), tower_sessions::session::Error> {
    session.cycle_id().await?;
    update_current_user(session, state, &login.user).await?;
    session.insert(session_keys::API_TOKEN, &login.token).await
}

/// Refresh the display data after a profile change.
///
/// # Errors
///
/// Returns an error if the session cannot be modified.
pub async fn update_current_user(
    session: &Session,
    state: &AppState,
    user: &User,
) -> Result<(), tower_sessions::session::Error> {
    let current = CurrentUser::from(user).resolve_avatar(|path| state.media(path));
    session.insert(session_keys::CURRENT_USER, current).await
}

/// Forget the customer entirely (logout or rejected token).
///
/// # Errors
///
/// Returns an error if the session cannot be modified.
pub async fn sign_out(session: &Session) -> Result<(), tower_sessions::session::Error> {
    session.flush().await
}
