//! HTMX request detection and response headers.

use axum::{
    http::{HeaderMap, HeaderName, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
};
use emporium_core::api::ApiError;
use emporium_core::toast::{TOAST_EVENT, Toast};
use serde_json::{Map, Value};

use crate::error::AppError;

pub const HX_REQUEST: HeaderName = HeaderName::from_static("hx-request");
pub const HX_TRIGGER: HeaderName = HeaderName::from_static("hx-trigger");
pub const HX_REDIRECT: HeaderName = HeaderName::from_static("hx-redirect");
pub const HX_RESWAP: HeaderName = HeaderName::from_static("hx-reswap");

/// Whether the request was issued by HTMX rather than a full navigation.
#[must_use]
pub fn is_htmx(headers: &HeaderMap) -> bool {
    headers
        .get(HX_REQUEST)
        .is_some_and(|v| v.as_bytes().eq_ignore_ascii_case(b"true"))
}

/// A fragment plus the client events it should fire.
#[must_use]
pub struct HxResponse<T> {
    body: T,
    status: StatusCode,
    events: Map<String, Value>,
    reswap: Option<&'static str>,
}

impl<T: IntoResponse> HxResponse<T> {
    pub fn new(body: T) -> Self {
        Self {
            body,
            status: StatusCode::OK,
            events: Map::new(),
            reswap: None,
        }
    }

    pub const fn status(mut self, status: StatusCode) -> Self {
        self.status = status;
        self
    }

    /// Show a toast once the fragment is swapped.
    pub fn toast(mut self, toast: &Toast) -> Self {
        self.events.insert(
            TOAST_EVENT.to_string(),
            serde_json::to_value(toast).unwrap_or(Value::Null),
        );
        self
    }

    /// Fire a bare client event, e.g. `cart-updated`.
    pub fn trigger(mut self, event: &str) -> Self {
        self.events.insert(event.to_string(), Value::Null);
        self
    }

    /// Override the swap strategy (`none` keeps the current DOM).
    pub const fn reswap(mut self, strategy: &'static str) -> Self {
        self.reswap = Some(strategy);
        self
    }
}

impl<T: IntoResponse> IntoResponse for HxResponse<T> {
    fn into_response(self) -> Response {
        let mut response = (self.status, self.body).into_response();
        let headers = response.headers_mut();

        if !self.events.is_empty()
            && let Ok(value) = HeaderValue::from_str(&Value::Object(self.events).to_string())
        {
            headers.insert(HX_TRIGGER, value);
        }
        if let Some(strategy) = self.reswap {
            headers.insert(HX_RESWAP, HeaderValue::from_static(strategy));
        }

        response
    }
}

/// Answer a failed fragment mutation: keep the current DOM and explain in a
/// toast. A rejected token still goes through [`AppError`] so the session is
/// cleared.
///
/// # Errors
///
/// Returns the error itself when the backend rejected the token.
pub fn rejected(error: ApiError) -> Result<Response, AppError> {
    if error.is_unauthorized() {
        return Err(error.into());
    }
    tracing::warn!(error = %error, "Backend rejected fragment mutation");
    Ok(HxResponse::new("")
        .reswap("none")
        .toast(&Toast::error(error.user_message()))
        .into_response())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_is_htmx() {
        let mut headers = HeaderMap::new();
        assert!(!is_htmx(&headers));
        headers.insert(HX_REQUEST, HeaderValue::from_static("true"));
        assert!(is_htmx(&headers));
    }

    #[test]
    fn test_events_merge_into_one_header() {
        let response = HxResponse::new("ok")
            .toast(&Toast::success("Added to cart"))
            .trigger("cart-updated")
            .into_response();

        let trigger: Value =
            serde_json::from_str(response.headers()[HX_TRIGGER].to_str().unwrap()).unwrap();
        assert_eq!(trigger["showToast"]["message"], "Added to cart");
        assert!(trigger.get("cart-updated").is_some());
    }

    #[test]
    fn test_plain_response_has_no_trigger() {
        let response = HxResponse::new("ok").reswap("none").into_response();
        assert!(response.headers().get(HX_TRIGGER).is_none());
        assert_eq!(response.headers()[HX_RESWAP], "none");
    }

    #[test]
    fn test_rejected_keeps_dom_and_toasts() {
        let response = rejected(ApiError::Backend {
            status: 409,
            message: "Out of stock".to_string(),
        })
        .unwrap();
        assert_eq!(response.headers()[HX_RESWAP], "none");
        assert!(
            response.headers()[HX_TRIGGER]
                .to_str()
                .unwrap()
                .contains("Out of stock")
        );

        assert!(rejected(ApiError::Unauthorized).is_err());
    }
}
