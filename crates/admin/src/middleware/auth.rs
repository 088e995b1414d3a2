//! Authentication middleware and extractors for admin.
//!
//! Provides extractors for requiring admin authentication in route handlers.
//! The backend issues the bearer token; only users with the admin role are
//! let in, and the token is re-checked by the backend on every call.

use axum::{
    extract::FromRequestParts,
    http::{HeaderValue, StatusCode, request::Parts},
    response::{IntoResponse, Redirect, Response},
};
use emporium_core::AuthSession;
use secrecy::SecretString;
use tower_sessions::Session;

use crate::components::htmx;
use crate::models::{CurrentAdmin, session_keys};

/// Login page path.
pub const LOGIN_PATH: &str = "/auth/login";

/// A logged-in admin and the token to act on their behalf.
#[derive(Debug, Clone)]
pub struct AdminContext {
    pub admin: CurrentAdmin,
    pub token: SecretString,
}

/// Extractor that requires admin authentication.
///
/// If the admin is not logged in, full page loads are redirected to the
/// login page and HTMX requests receive an `HX-Redirect`.
///
/// # Example
///
/// ```rust,ignore
/// async fn protected_handler(
///     RequireAdminAuth(ctx): RequireAdminAuth,
/// ) -> impl IntoResponse {
///     format!("Hello, {}!", ctx.admin.name)
/// }
/// ```
pub struct RequireAdminAuth(pub AdminContext);

/// Error returned when admin authentication is required but the user is not logged in.
pub enum AdminAuthRejection {
    /// Redirect to login page.
    RedirectToLogin { htmx: bool },
    /// No session layer is installed.
    Unauthorized,
}

impl IntoResponse for AdminAuthRejection {
    fn into_response(self) -> Response {
        match self {
            Self::RedirectToLogin { htmx: true } => {
                let mut response = StatusCode::OK.into_response();
                response
                    .headers_mut()
                    .insert(htmx::HX_REDIRECT, HeaderValue::from_static(LOGIN_PATH));
                response
            }
            Self::RedirectToLogin { htmx: false } => Redirect::to(LOGIN_PATH).into_response(),
            Self::Unauthorized => StatusCode::UNAUTHORIZED.into_response(),
        }
    }
}

impl<S> FromRequestParts<S> for RequireAdminAuth
where
    S: Send + Sync,
{
    type Rejection = AdminAuthRejection;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        // Get the session from extensions (set by SessionManagerLayer)
        let session = parts
            .extensions
            .get::<Session>()
            .ok_or(AdminAuthRejection::Unauthorized)?;

        let admin: Option<CurrentAdmin> = session
            .get(session_keys::CURRENT_ADMIN)
            .await
            .ok()
            .flatten();
        let token: Option<String> = session.get(session_keys::API_TOKEN).await.ok().flatten();

        match (admin, token) {
            (Some(admin), Some(token)) => Ok(Self(AdminContext {
                admin,
                token: SecretString::from(token),
            })),
            _ => Err(AdminAuthRejection::RedirectToLogin {
                htmx: htmx::is_htmx(&parts.headers),
            }),
        }
    }
}

/// Extractor that optionally gets the current admin.
///
/// Unlike `RequireAdminAuth`, this does not reject the request if the admin is not logged in.
pub struct OptionalAdminAuth(pub Option<CurrentAdmin>);

impl<S> FromRequestParts<S> for OptionalAdminAuth
where
    S: Send + Sync,
{
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let admin = match parts.extensions.get::<Session>() {
            Some(session) => session
                .get::<CurrentAdmin>(session_keys::CURRENT_ADMIN)
                .await
                .ok()
                .flatten(),
            None => None,
        };

        Ok(Self(admin))
    }
}

/// Why a backend login was not accepted into the admin panel.
#[derive(Debug, thiserror::Error)]
pub enum SignInError {
    /// Valid credentials, but the account is not an administrator.
    #[error("account is not an administrator")]
    NotAdmin,
    #[error(transparent)]
    Session(#[from] tower_sessions::session::Error),
}

/// Store an admin login in the session after checking the role.
///
/// The session ID is cycled first so a pre-login cookie cannot be replayed.
///
/// # Errors
///
/// Returns [`SignInError::NotAdmin`] for non-admin accounts, or a session
/// error if the session cannot be modified.
pub async fn sign_in(session: &Session, login: &AuthSession) -> Result<(), SignInError> {
    if !login.user.role.is_admin() {
        return Err(SignInError::NotAdmin);
    }
    session.cycle_id().await?;
    session
        .insert(session_keys::CURRENT_ADMIN, CurrentAdmin::from(&login.user))
        .await?;
    session.insert(session_keys::API_TOKEN, &login.token).await?;
    Ok(())
}

/// Forget the admin entirely (logout or rejected token).
///
/// # Errors
///
/// Returns an error if the session cannot be flushed.
pub async fn sign_out(session: &Session) -> Result<(), tower_sessions::session::Error> {
    session.flush().await
}
