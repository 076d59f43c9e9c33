//! Thin JSON client over `reqwest`.
//!
//! One connection pool is shared by every clone of an [`ApiClient`]; the
//! credential is a per-value field. `with_credential` hands out a new value
//! carrying a token, while `set_auth_token` / `clear_auth_token` change the
//! value in place and therefore need `&mut self`.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use reqwest::header::{ACCEPT, HeaderMap, HeaderValue};
use reqwest::{Method, StatusCode};
use serde::Serialize;
use serde::de::DeserializeOwned;
use storeprobe_core::Credential;
use tracing::{debug, error, instrument};
use url::Url;

use crate::config::{CartItemShape, HarnessConfig};
use crate::endpoints::Endpoints;
use crate::error::{ApiError, ErrorBody, snippet};

/// Per-call adjustments.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RequestOptions {
    /// Appended to the URL's query string.
    pub query: Vec<(String, String)>,
    /// Overrides the client-wide timeout for this call.
    pub timeout: Option<Duration>,
}

impl RequestOptions {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn query(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.push((key.into(), value.into()));
        self
    }

    #[must_use]
    pub fn query_pairs(mut self, pairs: impl IntoIterator<Item = (String, String)>) -> Self {
        self.query.extend(pairs);
        self
    }

    #[must_use]
    pub const fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }
}

/// REST client for the platform under test.
#[derive(Clone)]
pub struct ApiClient {
    inner: Arc<ApiClientInner>,
    credential: Option<Credential>,
}

struct ApiClientInner {
    http: reqwest::Client,
    endpoints: Endpoints,
    cart_item_shape: CartItemShape,
}

impl ApiClient {
    /// Create an anonymous client for the configured platform.
    ///
    /// # Errors
    ///
    /// Returns error if the base URL is unusable or the HTTP client fails to build.
    pub fn new(config: &HarnessConfig) -> Result<Self, ApiError> {
        let endpoints = Endpoints::from_config(&config.platform)?;

        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        let http = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(config.run.request_timeout)
            .build()?;

        Ok(Self {
            inner: Arc::new(ApiClientInner {
                http,
                endpoints,
                cart_item_shape: config.run.cart_item_shape,
            }),
            credential: None,
        })
    }

    #[must_use]
    pub fn endpoints(&self) -> &Endpoints {
        &self.inner.endpoints
    }

    #[must_use]
    pub fn cart_item_shape(&self) -> CartItemShape {
        self.inner.cart_item_shape
    }

    /// The credential sent with each request, if any.
    #[must_use]
    pub const fn credential(&self) -> Option<&Credential> {
        self.credential.as_ref()
    }

    /// A client sharing this one's pool but speaking as `credential`.
    #[must_use]
    pub fn with_credential(&self, credential: Credential) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
            credential: Some(credential),
        }
    }

    /// A client sharing this one's pool with no credential.
    #[must_use]
    pub fn anonymous(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
            credential: None,
        }
    }

    /// Send `credential` with every subsequent call on this value.
    pub fn set_auth_token(&mut self, credential: Credential) {
        self.credential = Some(credential);
    }

    /// Stop sending a bearer token.
    pub fn clear_auth_token(&mut self) {
        self.credential = None;
    }

    /// # Errors
    ///
    /// See [`ApiClient::request`].
    pub async fn get<T: DeserializeOwned>(&self, url: Url) -> Result<T, ApiError> {
        self.request::<T, ()>(Method::GET, url, None, &RequestOptions::default())
            .await
    }

    /// # Errors
    ///
    /// See [`ApiClient::request`].
    pub async fn get_with<T: DeserializeOwned>(
        &self,
        url: Url,
        options: &RequestOptions,
    ) -> Result<T, ApiError> {
        self.request::<T, ()>(Method::GET, url, None, options).await
    }

    /// # Errors
    ///
    /// See [`ApiClient::request`].
    pub async fn post<T, B>(&self, url: Url, body: &B) -> Result<T, ApiError>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized + Sync,
    {
        self.post_with(url, body, &RequestOptions::default()).await
    }

    /// # Errors
    ///
    /// See [`ApiClient::request`].
    pub async fn post_with<T, B>(
        &self,
        url: Url,
        body: &B,
        options: &RequestOptions,
    ) -> Result<T, ApiError>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized + Sync,
    {
        self.request(Method::POST, url, Some(body), options).await
    }

    /// POST without a body.
    ///
    /// # Errors
    ///
    /// See [`ApiClient::request`].
    pub async fn post_empty<T: DeserializeOwned>(&self, url: Url) -> Result<T, ApiError> {
        self.request::<T, ()>(Method::POST, url, None, &RequestOptions::default())
            .await
    }

    /// # Errors
    ///
    /// See [`ApiClient::request`].
    pub async fn put<T, B>(&self, url: Url, body: &B) -> Result<T, ApiError>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized + Sync,
    {
        self.put_with(url, body, &RequestOptions::default()).await
    }

    /// # Errors
    ///
    /// See [`ApiClient::request`].
    pub async fn put_with<T, B>(
        &self,
        url: Url,
        body: &B,
        options: &RequestOptions,
    ) -> Result<T, ApiError>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized + Sync,
    {
        self.request(Method::PUT, url, Some(body), options).await
    }

    /// # Errors
    ///
    /// See [`ApiClient::request`].
    pub async fn patch<T, B>(&self, url: Url, body: &B) -> Result<T, ApiError>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized + Sync,
    {
        self.patch_with(url, body, &RequestOptions::default()).await
    }

    /// # Errors
    ///
    /// See [`ApiClient::request`].
    pub async fn patch_with<T, B>(
        &self,
        url: Url,
        body: &B,
        options: &RequestOptions,
    ) -> Result<T, ApiError>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized + Sync,
    {
        self.request(Method::PATCH, url, Some(body), options).await
    }

    /// # Errors
    ///
    /// See [`ApiClient::request`].
    pub async fn delete<T: DeserializeOwned>(&self, url: Url) -> Result<T, ApiError> {
        self.delete_with(url, &RequestOptions::default()).await
    }

    /// # Errors
    ///
    /// See [`ApiClient::request`].
    pub async fn delete_with<T: DeserializeOwned>(
        &self,
        url: Url,
        options: &RequestOptions,
    ) -> Result<T, ApiError> {
        self.request::<T, ()>(Method::DELETE, url, None, options)
            .await
    }

    /// Send a request and decode the JSON answer.
    ///
    /// An empty 2xx body decodes as JSON `null`, so `()` and `Option<T>`
    /// work for endpoints that answer with nothing.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Status`] for any non-2xx answer, with the
    /// platform's error body attached, and [`ApiError::Transport`] for
    /// connection failures and timeouts. No call is ever retried.
    #[instrument(skip_all, fields(method = %method, url = %url))]
    pub async fn request<T, B>(
        &self,
        method: Method,
        mut url: Url,
        body: Option<&B>,
        options: &RequestOptions,
    ) -> Result<T, ApiError>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized + Sync,
    {
        if !options.query.is_empty() {
            url.query_pairs_mut().extend_pairs(
                options
                    .query
                    .iter()
                    .map(|(k, v)| (k.as_str(), v.as_str())),
            );
        }

        let mut builder = self.inner.http.request(method.clone(), url.clone());
        if let Some(credential) = &self.credential {
            let mut value =
                HeaderValue::from_str(&format!("Bearer {}", credential.token().expose()))?;
            value.set_sensitive(true);
            builder = builder.header(reqwest::header::AUTHORIZATION, value);
        }
        if let Some(timeout) = options.timeout {
            builder = builder.timeout(timeout);
        }
        if let Some(body) = body {
            let json = serde_json::to_value(body).map_err(ApiError::Encode)?;
            debug!(%method, %url, body = %json, "sending request");
            builder = builder.json(&json);
        }

        let response = builder.send().await.inspect_err(|e| {
            error!(%method, %url, error = %e, "request failed before a response");
        })?;
        let status = response.status();
        let bytes = response.bytes().await?;

        if !status.is_success() {
            let body = ErrorBody::from_bytes(&bytes);
            log_failure(&method, &url, status, &body);
            return Err(ApiError::Status {
                method,
                url: url.to_string(),
                status,
                body,
            });
        }

        decode(status, &bytes)
    }
}

fn decode<T: DeserializeOwned>(status: StatusCode, bytes: &[u8]) -> Result<T, ApiError> {
    let payload: &[u8] = if bytes.iter().all(u8::is_ascii_whitespace) {
        b"null"
    } else {
        bytes
    };
    serde_json::from_slice(payload).map_err(|source| ApiError::Decode {
        status,
        source,
        body: snippet(bytes),
    })
}

fn log_failure(method: &Method, url: &Url, status: StatusCode, body: &ErrorBody) {
    error!(
        %method,
        %url,
        status = status.as_u16(),
        message = %body.rendered_message(),
        "request failed"
    );
    for detail in &body.errors {
        error!(message = %detail.rendered_message(), "sub-error");
    }
}

impl fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ApiClient")
            .field("endpoints", &self.inner.endpoints)
            .field("cart_item_shape", &self.inner.cart_item_shape)
            .field("credential", &self.credential.as_ref().map(Credential::scope))
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use storeprobe_core::{AuthToken, TokenScope};

    use super::*;

    fn client() -> ApiClient {
        let config = HarnessConfig::for_base_url(Url::parse("http://127.0.0.1:9").unwrap());
        ApiClient::new(&config).unwrap()
    }

    #[test]
    fn test_with_credential_leaves_original_anonymous() {
        let anonymous = client();
        let admin = anonymous.with_credential(Credential::admin(AuthToken::new("t")));
        assert!(anonymous.credential().is_none());
        assert_eq!(admin.credential().map(Credential::scope), Some(TokenScope::Admin));
        assert!(admin.anonymous().credential().is_none());
    }

    #[test]
    fn test_set_and_clear_auth_token() {
        let mut client = client();
        client.set_auth_token(Credential::customer(AuthToken::new("t")));
        assert_eq!(client.credential().map(Credential::scope), Some(TokenScope::Customer));
        client.clear_auth_token();
        assert!(client.credential().is_none());
    }

    #[test]
    fn test_debug_hides_token() {
        let client = client().with_credential(Credential::admin(AuthToken::new("s3cr3t-token")));
        let debug = format!("{client:?}");
        assert!(!debug.contains("s3cr3t-token"));
        assert!(debug.contains("Admin"));
    }

    #[test]
    fn test_empty_body_decodes_as_null() {
        decode::<()>(StatusCode::OK, b"").unwrap();
        let none: Option<bool> = decode(StatusCode::NO_CONTENT, b"  \n").unwrap();
        assert_eq!(none, None);
        let yes: bool = decode(StatusCode::OK, b"true").unwrap();
        assert!(yes);
    }

    #[test]
    fn test_decode_error_keeps_body() {
        let err = decode::<u64>(StatusCode::OK, b"<html>").unwrap_err();
        assert!(matches!(err, ApiError::Decode { ref body, .. } if body == "<html>"));
    }

    #[test]
    fn test_request_options_builder() {
        let options = RequestOptions::new()
            .query("a", "1")
            .timeout(Duration::from_millis(50));
        assert_eq!(options.query, vec![("a".to_string(), "1".to_string())]);
        assert_eq!(options.timeout, Some(Duration::from_millis(50)));
    }
}
