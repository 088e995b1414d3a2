//! HTTP transport for the REST backend.
//!
//! One request per call: no retries, no caching, no batching.

use std::sync::Arc;
use std::time::Duration;

use reqwest::{Method, RequestBuilder};
use secrecy::{ExposeSecret, SecretString};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{debug, error};
use url::Url;

use super::error::ApiError;

/// Client for the REST backend.
///
/// Cheap to clone; all clones share one connection pool.
#[derive(Clone)]
pub struct ApiClient {
    inner: Arc<ApiClientInner>,
}

struct ApiClientInner {
    http: reqwest::Client,
    base_url: Url,
}

impl std::fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiClient")
            .field("base_url", &self.inner.base_url.as_str())
            .finish_non_exhaustive()
    }
}

impl ApiClient {
    /// Create a client rooted at `base_url` (e.g. `https://api.example.com/api`).
    ///
    /// # Errors
    ///
    /// Returns error if the underlying HTTP client cannot be built.
    pub fn new(base_url: Url, timeout: Duration) -> Result<Self, ApiError> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(concat!("emporium/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            inner: Arc::new(ApiClientInner {
                http,
                base_url: with_trailing_slash(base_url),
            }),
        })
    }

    /// Base URL every endpoint path is resolved against.
    #[must_use]
    pub fn base_url(&self) -> &Url {
        &self.inner.base_url
    }

    /// Resolve an endpoint path such as `/attributes/7/values`.
    ///
    /// # Errors
    ///
    /// Returns error if the path does not form a valid URL.
    pub fn endpoint(&self, path: &str) -> Result<Url, ApiError> {
        Ok(self.inner.base_url.join(path.trim_start_matches('/'))?)
    }

    fn request(&self, method: Method, path: &str) -> ApiRequest {
        let builder = self
            .endpoint(path)
            .map(|url| self.inner.http.request(method.clone(), url));
        ApiRequest {
            builder,
            method,
            path: path.to_string(),
        }
    }

    #[must_use]
    pub fn get(&self, path: &str) -> ApiRequest {
        self.request(Method::GET, path)
    }

    #[must_use]
    pub fn post(&self, path: &str) -> ApiRequest {
        self.request(Method::POST, path)
    }

    #[must_use]
    pub fn put(&self, path: &str) -> ApiRequest {
        self.request(Method::PUT, path)
    }

    #[must_use]
    pub fn patch(&self, path: &str) -> ApiRequest {
        self.request(Method::PATCH, path)
    }

    #[must_use]
    pub fn delete(&self, path: &str) -> ApiRequest {
        self.request(Method::DELETE, path)
    }
}

fn with_trailing_slash(mut url: Url) -> Url {
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    url
}

/// A request under construction.
///
/// URL errors are deferred until the request is sent so call sites can chain
/// builders without intermediate `?`.
#[must_use = "requests do nothing until sent"]
pub struct ApiRequest {
    builder: Result<RequestBuilder, ApiError>,
    method: Method,
    path: String,
}

impl ApiRequest {
    fn map(mut self, f: impl FnOnce(RequestBuilder) -> RequestBuilder) -> Self {
        self.builder = self.builder.map(f);
        self
    }

    /// Attach `Authorization: Bearer <token>`.
    pub fn bearer(self, token: &SecretString) -> Self {
        self.map(|b| b.bearer_auth(token.expose_secret()))
    }

    /// Attach a bearer token when one is present.
    pub fn maybe_bearer(self, token: Option<&SecretString>) -> Self {
        match token {
            Some(token) => self.bearer(token),
            None => self,
        }
    }

    /// Append query parameters.
    pub fn query<Q: Serialize + ?Sized>(self, query: &Q) -> Self {
        self.map(|b| b.query(query))
    }

    /// Send `body` as JSON.
    pub fn json<B: Serialize + ?Sized>(self, body: &B) -> Self {
        self.map(|b| b.json(body))
    }

    /// Send a multipart form.
    pub fn multipart(self, form: reqwest::multipart::Form) -> Self {
        self.map(|b| b.multipart(form))
    }

    async fn execute(self) -> Result<String, ApiError> {
        let response = self
            .builder?
            .header(reqwest::header::ACCEPT, "application/json")
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            let err = ApiError::from_response(status, &body);
            if status.is_server_error() {
                error!(
                    method = %self.method,
                    path = %self.path,
                    status = %status,
                    body = %body.chars().take(500).collect::<String>(),
                    "Backend returned server error"
                );
            } else {
                debug!(
                    method = %self.method,
                    path = %self.path,
                    status = %status,
                    "Backend rejected request"
                );
            }
            return Err(err);
        }

        debug!(method = %self.method, path = %self.path, status = %status, "Backend request ok");
        Ok(body)
    }

    /// Send and decode the response body as `T`.
    ///
    /// # Errors
    ///
    /// Returns error on transport failure, non-success status, or an
    /// undecodable body.
    pub async fn send_json<T: DeserializeOwned>(self) -> Result<T, ApiError> {
        let method = self.method.clone();
        let path = self.path.clone();
        let body = self.execute().await?;
        decode_body(&body).inspect_err(|e| {
            error!(
                method = %method,
                path = %path,
                error = %e,
                body = %body.chars().take(500).collect::<String>(),
                "Failed to decode backend response"
            );
        })
    }

    /// Send and discard the response body.
    ///
    /// # Errors
    ///
    /// Returns error on transport failure or non-success status.
    pub async fn send_empty(self) -> Result<(), ApiError> {
        self.execute().await.map(|_| ())
    }
}

#[derive(serde::Deserialize)]
struct Envelope<T> {
    data: T,
}

/// Decode a bare payload or one wrapped as `{"data": ...}`.
///
/// # Errors
///
/// Returns the bare-payload decode error when neither shape matches.
pub fn decode_body<T: DeserializeOwned>(body: &str) -> Result<T, ApiError> {
    match serde_json::from_str::<T>(body) {
        Ok(value) => Ok(value),
        Err(bare) => serde_json::from_str::<Envelope<T>>(body)
            .map(|envelope| envelope.data)
            .map_err(|_| ApiError::Parse(bare)),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::models::{Attribute, Page};

    fn client(base: &str) -> ApiClient {
        ApiClient::new(base.parse().unwrap(), Duration::from_secs(5)).unwrap()
    }

    #[test]
    fn test_endpoint_keeps_base_path() {
        let api = client("http://localhost:8000/api");
        assert_eq!(
            api.endpoint("/attributes/7/values").unwrap().as_str(),
            "http://localhost:8000/api/attributes/7/values"
        );
        assert_eq!(
            client("http://localhost:8000/api/")
                .endpoint("sliders/reorder")
                .unwrap()
                .as_str(),
            "http://localhost:8000/api/sliders/reorder"
        );
    }

    #[test]
    fn test_decode_bare_and_enveloped() {
        let bare: Vec<Attribute> =
            decode_body(r#"[{"id": 7, "name": "Color", "status": true}]"#).unwrap();
        let wrapped: Vec<Attribute> =
            decode_body(r#"{"data": [{"id": 7, "name": "Color", "status": true}]}"#).unwrap();
        assert_eq!(bare, wrapped);
        assert_eq!(bare[0].name, "Color");
    }

    #[test]
    fn test_decode_page_prefers_bare_shape() {
        let page: Page<u32> =
            decode_body(r#"{"data": [1, 2], "current_page": 1, "last_page": 2}"#).unwrap();
        assert_eq!(page.items, vec![1, 2]);
        assert!(page.has_next());
    }

    #[test]
    fn test_decode_failure_is_parse_error() {
        let err = decode_body::<Vec<Attribute>>(r#"{"oops": true}"#).unwrap_err();
        assert!(matches!(err, ApiError::Parse(_)));
    }
}
