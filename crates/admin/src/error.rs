//! Unified error handling for admin.
//!
//! Backend failures on mutations are answered in place (modal message and
//! toast). What reaches `AppError` is a page that cannot render without its
//! data, a malformed request, or a token the backend no longer accepts.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
};
use emporium_core::api::ApiError;
use thiserror::Error;

/// Where a rejected token is sent; the handler there clears the session.
pub const EXPIRED_PATH: &str = "/auth/expired";

/// Application-level error type for the admin panel.
#[derive(Debug, Error)]
pub enum AppError {
    /// Backend call failed.
    #[error("Backend error: {0}")]
    Api(#[from] ApiError),

    /// Session store failed.
    #[error("Session error: {0}")]
    Session(#[from] tower_sessions::session::Error),

    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Bad request from client.
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// Internal server error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    const fn status(&self) -> StatusCode {
        match self {
            Self::Api(ApiError::Backend { status: 404, .. }) | Self::NotFound(_) => {
                StatusCode::NOT_FOUND
            }
            Self::BadRequest(_)
            | Self::Api(ApiError::Validation { .. } | ApiError::Backend { status: 400..=499, .. }) => {
                StatusCode::BAD_REQUEST
            }
            Self::Api(ApiError::Unauthorized) => StatusCode::UNAUTHORIZED,
            Self::Api(_) => StatusCode::BAD_GATEWAY,
            Self::Session(_) | Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        if matches!(self, Self::Api(ApiError::Unauthorized)) {
            tracing::info!("Backend rejected admin token");
            return Redirect::to(EXPIRED_PATH).into_response();
        }

        let status = self.status();

        // Log server errors with Sentry
        if status.is_server_error() {
            let event_id = sentry::capture_error(&self);
            tracing::error!(
                error = %self,
                sentry_event_id = %event_id,
                "Admin request error"
            );
        }

        // Don't expose internal error details to clients
        let message = match &self {
            Self::Api(err) => err.user_message(),
            Self::BadRequest(msg) => msg.clone(),
            Self::NotFound(what) => format!("Not found: {what}"),
            Self::Session(_) | Self::Internal(_) => "Internal server error".to_string(),
        };

        (status, message).into_response()
    }
}

/// Result type alias for `AppError`.
pub type Result<T, E = AppError> = std::result::Result<T, E>;

/// Set the Sentry user context after login.
pub fn set_sentry_user(user_id: &impl ToString, email: Option<&str>) {
    sentry::configure_scope(|scope| {
        scope.set_user(Some(sentry::User {
            id: Some(user_id.to_string()),
            email: email.map(String::from),
            ..Default::default()
        }));
    });
}

/// Clear the Sentry user context on logout.
pub fn clear_sentry_user() {
    sentry::configure_scope(|scope| {
        scope.set_user(None);
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_app_error_display() {
        let err = AppError::NotFound("order 42".to_string());
        assert_eq!(err.to_string(), "Not found: order 42");

        let err = AppError::BadRequest("missing boundary".to_string());
        assert_eq!(err.to_string(), "Bad request: missing boundary");
    }

    #[test]
    fn test_unauthorized_goes_to_expired() {
        let response = AppError::Api(ApiError::Unauthorized).into_response();
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(response.headers()["location"], EXPIRED_PATH);
    }

    #[test]
    fn test_status_mapping() {
        let backend = |status| {
            AppError::Api(ApiError::Backend {
                status,
                message: String::new(),
            })
        };
        assert_eq!(backend(404).into_response().status(), StatusCode::NOT_FOUND);
        assert_eq!(backend(500).into_response().status(), StatusCode::BAD_GATEWAY);
        assert_eq!(
            AppError::Internal("x".to_string()).into_response().status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
