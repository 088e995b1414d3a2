//! HTMX request detection and response headers.
//!
//! Every admin mutation answers with a fragment plus instructions in
//! response headers: where to put it (`HX-Retarget`, `HX-Reswap`) and which
//! client events to fire (`HX-Trigger`).

use axum::{
    http::{HeaderMap, HeaderName, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
};
use emporium_core::toast::{TOAST_EVENT, Toast};
use serde_json::{Map, Value};

pub const HX_REQUEST: HeaderName = HeaderName::from_static("hx-request");
pub const HX_TRIGGER: HeaderName = HeaderName::from_static("hx-trigger");
pub const HX_REDIRECT: HeaderName = HeaderName::from_static("hx-redirect");
pub const HX_RESWAP: HeaderName = HeaderName::from_static("hx-reswap");
pub const HX_RETARGET: HeaderName = HeaderName::from_static("hx-retarget");
pub const HX_REFRESH: HeaderName = HeaderName::from_static("hx-refresh");

/// Client event that empties the modal container.
pub const CLOSE_MODAL_EVENT: &str = "closeModal";

/// Whether the request was issued by HTMX rather than a full navigation.
#[must_use]
pub fn is_htmx(headers: &HeaderMap) -> bool {
    headers
        .get(HX_REQUEST)
        .is_some_and(|v| v.as_bytes().eq_ignore_ascii_case(b"true"))
}

/// A fragment plus the client events and swap overrides that go with it.
#[must_use]
pub struct HxResponse<T> {
    body: T,
    status: StatusCode,
    events: Map<String, Value>,
    reswap: Option<&'static str>,
    retarget: Option<&'static str>,
    refresh: bool,
}

impl<T: IntoResponse> HxResponse<T> {
    pub fn new(body: T) -> Self {
        Self {
            body,
            status: StatusCode::OK,
            events: Map::new(),
            reswap: None,
            retarget: None,
            refresh: false,
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

    /// Fire a bare client event.
    pub fn trigger(mut self, event: &str) -> Self {
        self.events.insert(event.to_string(), Value::Null);
        self
    }

    pub fn close_modal(self) -> Self {
        self.trigger(CLOSE_MODAL_EVENT)
    }

    /// Override the swap strategy (`none` keeps the current DOM).
    pub const fn reswap(mut self, strategy: &'static str) -> Self {
        self.reswap = Some(strategy);
        self
    }

    /// Swap into a different element than the one that issued the request.
    pub const fn retarget(mut self, selector: &'static str) -> Self {
        self.retarget = Some(selector);
        self
    }

    /// Have the browser reload the whole page instead of swapping.
    pub const fn refresh(mut self) -> Self {
        self.refresh = true;
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
        if let Some(selector) = self.retarget {
            headers.insert(HX_RETARGET, HeaderValue::from_static(selector));
        }
        if self.refresh {
            headers.insert(HX_REFRESH, HeaderValue::from_static("true"));
        }

        response
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn trigger_of(response: &Response) -> Value {
        serde_json::from_str(response.headers()[HX_TRIGGER].to_str().unwrap()).unwrap()
    }

    #[test]
    fn test_is_htmx() {
        let mut headers = HeaderMap::new();
        assert!(!is_htmx(&headers));
        headers.insert(HX_REQUEST, HeaderValue::from_static("true"));
        assert!(is_htmx(&headers));
    }

    #[test]
    fn test_close_modal_and_toast_share_one_header() {
        let response = HxResponse::new("<tbody></tbody>")
            .retarget("#slider-list")
            .reswap("outerHTML")
            .close_modal()
            .toast(&Toast::success("Slider saved"))
            .into_response();

        let trigger = trigger_of(&response);
        assert!(trigger.get(CLOSE_MODAL_EVENT).is_some());
        assert_eq!(trigger["showToast"]["kind"], "success");
        assert_eq!(trigger["showToast"]["timeoutMs"], 3000);
        assert_eq!(response.headers()[HX_RETARGET], "#slider-list");
        assert_eq!(response.headers()[HX_RESWAP], "outerHTML");
    }

    #[test]
    fn test_refresh_header() {
        let response = HxResponse::new("").refresh().into_response();
        assert_eq!(response.headers()[HX_REFRESH], "true");
        assert!(response.headers().get(HX_RESWAP).is_none());
    }

    #[test]
    fn test_bare_fragment_has_no_headers() {
        let response = HxResponse::new("ok").into_response();
        assert_eq!(response.status(), StatusCode::OK);
        assert!(response.headers().get(HX_TRIGGER).is_none());
        assert!(response.headers().get(HX_RETARGET).is_none());
    }
}
