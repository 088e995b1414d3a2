//! Backend error taxonomy.

use std::collections::BTreeMap;

use reqwest::StatusCode;
use serde::Deserialize;
use thiserror::Error;

/// Message shown when the backend gives nothing better.
pub const GENERIC_MESSAGE: &str = "Something went wrong. Please try again.";

/// Field name to the messages the backend attached to it.
pub type FieldErrors = BTreeMap<String, Vec<String>>;

/// Errors that can occur when talking to the REST backend.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The request never completed (connect, timeout, TLS).
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The response body did not decode into the expected shape.
    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// An endpoint path could not be joined onto the base URL.
    #[error("invalid endpoint URL: {0}")]
    Url(#[from] url::ParseError),

    /// The backend rejected the input (HTTP 422).
    #[error("validation failed: {message}")]
    Validation { message: String, fields: FieldErrors },

    /// Any other non-success status.
    #[error("backend returned {status}: {message}")]
    Backend { status: u16, message: String },

    /// The bearer token is missing, expired, or lacks permission (401/403).
    #[error("not authorized")]
    Unauthorized,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct ErrorBody {
    message: Option<String>,
    error: Option<String>,
    errors: FieldErrors,
}

impl ApiError {
    /// Classify a non-success response.
    #[must_use]
    pub fn from_response(status: StatusCode, body: &str) -> Self {
        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            return Self::Unauthorized;
        }

        let parsed: ErrorBody = serde_json::from_str(body).unwrap_or_default();
        let message = parsed
            .message
            .or(parsed.error)
            .filter(|m| !m.trim().is_empty())
            .unwrap_or_default();

        if status == StatusCode::UNPROCESSABLE_ENTITY {
            return Self::Validation {
                message,
                fields: parsed.errors,
            };
        }

        Self::Backend {
            status: status.as_u16(),
            message,
        }
    }

    /// Text safe to show an end user.
    ///
    /// Backend messages are passed through; transport and decoding failures
    /// collapse to [`GENERIC_MESSAGE`].
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::Validation { message, fields } => {
                if !message.is_empty() {
                    message.clone()
                } else if let Some(first) = fields.values().flatten().next() {
                    first.clone()
                } else {
                    GENERIC_MESSAGE.to_string()
                }
            }
            Self::Backend { message, .. } if !message.is_empty() => message.clone(),
            Self::Unauthorized => "Your session has expired. Please sign in again.".to_string(),
            _ => GENERIC_MESSAGE.to_string(),
        }
    }

    /// Per-field messages from a validation failure.
    #[must_use]
    pub const fn field_errors(&self) -> Option<&FieldErrors> {
        match self {
            Self::Validation { fields, .. } => Some(fields),
            _ => None,
        }
    }

    /// First message attached to `field`, if any.
    #[must_use]
    pub fn field_error(&self, field: &str) -> Option<&str> {
        self.field_errors()?
            .get(field)?
            .first()
            .map(String::as_str)
    }

    #[must_use]
    pub const fn is_unauthorized(&self) -> bool {
        matches!(self, Self::Unauthorized)
    }

    /// Whether the failure is the backend saying no, as opposed to not answering.
    #[must_use]
    pub const fn is_rejection(&self) -> bool {
        matches!(self, Self::Validation { .. } | Self::Backend { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unauthorized_statuses() {
        assert!(ApiError::from_response(StatusCode::UNAUTHORIZED, "").is_unauthorized());
        assert!(ApiError::from_response(StatusCode::FORBIDDEN, "{}").is_unauthorized());
    }

    #[test]
    fn test_validation_with_fields() {
        let body = r#"{"message": "The name field is required.", "errors": {"name": ["The name field is required."]}}"#;
        let err = ApiError::from_response(StatusCode::UNPROCESSABLE_ENTITY, body);
        assert_eq!(err.user_message(), "The name field is required.");
        assert_eq!(err.field_error("name"), Some("The name field is required."));
        assert_eq!(err.field_error("status"), None);
    }

    #[test]
    fn test_validation_without_message_uses_first_field() {
        let body = r#"{"errors": {"value": ["Already taken"]}}"#;
        let err = ApiError::from_response(StatusCode::UNPROCESSABLE_ENTITY, body);
        assert_eq!(err.user_message(), "Already taken");
    }

    #[test]
    fn test_backend_message_or_generic() {
        let err = ApiError::from_response(StatusCode::CONFLICT, r#"{"message": "Duplicate"}"#);
        assert_eq!(err.user_message(), "Duplicate");
        assert!(err.is_rejection());

        let err = ApiError::from_response(StatusCode::INTERNAL_SERVER_ERROR, "<html>oops</html>");
        assert!(matches!(err, ApiError::Backend { status: 500, .. }));
        assert_eq!(err.user_message(), GENERIC_MESSAGE);

        let err = ApiError::from_response(StatusCode::BAD_REQUEST, r#"{"error": "Bad id"}"#);
        assert_eq!(err.user_message(), "Bad id");
    }
}
