//! A cookie-keeping client for the storefront and admin routers.

use std::net::{IpAddr, Ipv4Addr};
use std::time::Duration;

use axum::{
    Router,
    body::Body,
    http::{HeaderMap, Request, StatusCode, header},
};
use http_body_util::BodyExt;
use secrecy::SecretString;
use serde_json::Value;
use tower::ServiceExt;
use url::form_urlencoded;

use crate::backend::{MockBackend, PASSWORD};

const SESSION_SECRET: &str =
    "integration-session-secret-7f3a9c1e5b2d8046-Qm4vXz0pLk7sTn2wRy6uHb9jGd3fCa5e";
const BOUNDARY: &str = "EMPORIUMBOUNDARY";

/// A response with its body read.
#[derive(Debug)]
pub struct TestResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: String,
}

impl TestResponse {
    /// Header value as text.
    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }

    /// Decoded `HX-Trigger` events, or `null` when there are none.
    #[must_use]
    pub fn triggers(&self) -> Value {
        self.header("hx-trigger")
            .and_then(|raw| serde_json::from_str(raw).ok())
            .unwrap_or(Value::Null)
    }

    /// Kind of the toast announced in `HX-Trigger`, if any.
    #[must_use]
    pub fn toast_kind(&self) -> Option<String> {
        self.triggers()["showToast"]["kind"]
            .as_str()
            .map(str::to_string)
    }

    /// Text of the toast announced in `HX-Trigger`, if any.
    #[must_use]
    pub fn toast_message(&self) -> Option<String> {
        self.triggers()["showToast"]["message"]
            .as_str()
            .map(str::to_string)
    }

    /// Whether the response asks the page to close its modal.
    #[must_use]
    pub fn closes_modal(&self) -> bool {
        self.triggers().get("closeModal").is_some()
    }

    /// Byte offset of `needle` in the body.
    ///
    /// # Panics
    ///
    /// Panics when the body does not contain `needle`.
    #[must_use]
    pub fn position(&self, needle: &str) -> usize {
        self.body
            .find(needle)
            .unwrap_or_else(|| panic!("{needle:?} not found in body:\n{}", self.body))
    }
}

/// Drives one router, carrying its session cookie between requests.
pub struct TestClient {
    router: Router,
    cookie: Option<String>,
}

impl TestClient {
    /// Admin router pointed at `backend`.
    #[must_use]
    pub fn admin(backend: &MockBackend) -> Self {
        let config = emporium_admin::config::AdminConfig {
            host: IpAddr::V4(Ipv4Addr::LOCALHOST),
            port: 0,
            base_url: "http://localhost:3001".to_string(),
            session_secret: SecretString::from(SESSION_SECRET.to_string()),
            api_url: backend.url(),
            upload_base: backend.url(),
            api_timeout: Duration::from_secs(5),
            sentry_dsn: None,
            sentry_environment: None,
        };
        let state = emporium_admin::state::AppState::new(config).expect("admin state");
        Self {
            router: emporium_admin::app(state),
            cookie: None,
        }
    }

    /// Storefront router pointed at `backend`.
    #[must_use]
    pub fn storefront(backend: &MockBackend) -> Self {
        let config = emporium_storefront::config::StorefrontConfig {
            host: IpAddr::V4(Ipv4Addr::LOCALHOST),
            port: 0,
            base_url: "http://localhost:3000".to_string(),
            session_secret: SecretString::from(SESSION_SECRET.to_string()),
            api_url: backend.url(),
            upload_base: backend.url(),
            api_timeout: Duration::from_secs(5),
            sentry_dsn: None,
            sentry_environment: None,
        };
        let state =
            emporium_storefront::state::AppState::new(config).expect("storefront state");
        Self {
            router: emporium_storefront::app(state),
            cookie: None,
        }
    }

    /// Log in through the router's own login form.
    pub async fn sign_in(&mut self, email: &str) -> TestResponse {
        self.post_form("/auth/login", &[("email", email), ("password", PASSWORD)], false)
            .await
    }

    /// Full-page GET.
    pub async fn get(&mut self, path: &str) -> TestResponse {
        self.send(Request::get(path), Body::empty(), false).await
    }

    /// GET as issued by HTMX.
    pub async fn htmx_get(&mut self, path: &str) -> TestResponse {
        self.send(Request::get(path), Body::empty(), true).await
    }

    /// URL-encoded POST.
    pub async fn post_form(
        &mut self,
        path: &str,
        fields: &[(&str, &str)],
        htmx: bool,
    ) -> TestResponse {
        let body = form_urlencoded::Serializer::new(String::new())
            .extend_pairs(fields)
            .finish();
        let request = Request::post(path).header(
            header::CONTENT_TYPE,
            "application/x-www-form-urlencoded",
        );
        self.send(request, Body::from(body), htmx).await
    }

    /// Multipart POST from HTMX, text fields only.
    pub async fn post_multipart(&mut self, path: &str, fields: &[(&str, &str)]) -> TestResponse {
        let mut body = String::new();
        for (name, value) in fields {
            body.push_str(&format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{name}\"\r\n\r\n{value}\r\n"
            ));
        }
        body.push_str(&format!("--{BOUNDARY}--\r\n"));

        let request = Request::post(path).header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={BOUNDARY}"),
        );
        self.send(request, Body::from(body), true).await
    }

    /// Plain multipart form POST carrying one file.
    pub async fn post_file(
        &mut self,
        path: &str,
        field: &str,
        file_name: &str,
        contents: &[u8],
    ) -> TestResponse {
        let mut body = format!(
            "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{field}\"; \
             filename=\"{file_name}\"\r\nContent-Type: image/png\r\n\r\n"
        )
        .into_bytes();
        body.extend_from_slice(contents);
        body.extend_from_slice(format!("\r\n--{BOUNDARY}--\r\n").as_bytes());

        let request = Request::post(path).header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={BOUNDARY}"),
        );
        self.send(request, Body::from(body), false).await
    }

    async fn send(
        &mut self,
        mut request: axum::http::request::Builder,
        body: Body,
        htmx: bool,
    ) -> TestResponse {
        if let Some(cookie) = &self.cookie {
            request = request.header(header::COOKIE, cookie);
        }
        if htmx {
            request = request.header("HX-Request", "true");
        }

        let response = self
            .router
            .clone()
            .oneshot(request.body(body).expect("request"))
            .await
            .expect("router is infallible");

        if let Some(set) = response
            .headers()
            .get(header::SET_COOKIE)
            .and_then(|v| v.to_str().ok())
        {
            self.cookie = set.split(';').next().map(str::to_string);
        }

        let status = response.status();
        let headers = response.headers().clone();
        let bytes = response
            .into_body()
            .collect()
            .await
            .expect("response body")
            .to_bytes();

        TestResponse {
            status,
            headers,
            body: String::from_utf8_lossy(&bytes).into_owned(),
        }
    }
}
