//! REST backend transport shared by the storefront and admin binaries.
//!
//! Endpoint wrappers live in each binary; this module only knows how to send
//! a request, attach a bearer token, unwrap `{"data": ...}` envelopes and
//! classify failures into [`ApiError`].

mod client;
mod error;
mod upload;

pub use client::{ApiClient, ApiRequest, decode_body};
pub use error::{ApiError, FieldErrors, GENERIC_MESSAGE};
pub use upload::{Upload, multipart_form};

use url::Url;

/// Resolve a media path returned by the backend against the upload host.
///
/// Absolute URLs pass through untouched.
#[must_use]
pub fn media_url(upload_base: &Url, path: &str) -> String {
    if path.starts_with("http://") || path.starts_with("https://") || path.starts_with("//") {
        return path.to_string();
    }
    let mut base = upload_base.clone();
    if !base.path().ends_with('/') {
        let with_slash = format!("{}/", base.path());
        base.set_path(&with_slash);
    }
    base.join(path.trim_start_matches('/'))
        .map_or_else(|_| path.to_string(), String::from)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_media_url() {
        let base: Url = "https://cdn.example.com/storage".parse().unwrap();
        assert_eq!(
            media_url(&base, "sliders/a.jpg"),
            "https://cdn.example.com/storage/sliders/a.jpg"
        );
        assert_eq!(
            media_url(&base, "/sliders/a.jpg"),
            "https://cdn.example.com/storage/sliders/a.jpg"
        );
        assert_eq!(
            media_url(&base, "https://other.example.com/x.png"),
            "https://other.example.com/x.png"
        );
    }
}
