//! Transient notifications delivered through the `HX-Trigger` header.

use serde::Serialize;

/// Delay before a toast dismisses itself.
pub const TOAST_DISMISS_MS: u64 = 3000;

/// Name of the client-side event carrying a toast.
pub const TOAST_EVENT: &str = "showToast";

/// Visual style of a toast.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ToastKind {
    Success,
    Error,
    Info,
}

/// A short message shown to the user after an action.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Toast {
    pub kind: ToastKind,
    pub message: String,
    #[serde(rename = "timeoutMs")]
    pub timeout_ms: u64,
}

impl Toast {
    fn new(kind: ToastKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            timeout_ms: TOAST_DISMISS_MS,
        }
    }

    #[must_use]
    pub fn success(message: impl Into<String>) -> Self {
        Self::new(ToastKind::Success, message)
    }

    #[must_use]
    pub fn error(message: impl Into<String>) -> Self {
        Self::new(ToastKind::Error, message)
    }

    #[must_use]
    pub fn info(message: impl Into<String>) -> Self {
        Self::new(ToastKind::Info, message)
    }

    /// Event payload, e.g. `{"showToast": {...}}`.
    #[must_use]
    pub fn event(&self) -> serde_json::Value {
        serde_json::json!({ TOAST_EVENT: self })
    }

    /// `HX-Trigger` header value for this toast alone.
    #[must_use]
    pub fn hx_trigger(&self) -> String {
        self.event().to_string()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_hx_trigger_shape() {
        let value: serde_json::Value =
            serde_json::from_str(&Toast::success("Saved").hx_trigger()).unwrap();
        assert_eq!(value["showToast"]["kind"], "success");
        assert_eq!(value["showToast"]["message"], "Saved");
        assert_eq!(value["showToast"]["timeoutMs"], 3000);
    }

    #[test]
    fn test_error_kind() {
        assert_eq!(Toast::error("nope").kind, ToastKind::Error);
        assert_eq!(Toast::info("fyi").timeout_ms, TOAST_DISMISS_MS);
    }
}
