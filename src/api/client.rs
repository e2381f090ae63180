use reqwest::Method;
use secrecy::{ExposeSecret, SecretString};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::sync::{Arc, PoisonError, RwLock};
use std::time::Duration;
use thiserror::Error;
use url::Url;

/// Backend address used when neither config nor flags provide one.
pub const DEFAULT_BASE_URL: &str = "http://localhost:8888/api";

/// Per-request budget covering connect, send and body read.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(15);

const MAX_RESPONSE_SIZE: usize = 20 * 1024 * 1024; // 20MB

/// Everything that can go wrong talking to the backend.
///
/// Callers treat every variant the same way (show the message, leave state
/// alone); the variants exist for logging and tests.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Request timed out after {}ms", .0.as_millis())]
    Timeout(Duration),
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),
    /// Non-2xx response. `message` is the server's body, unchanged.
    #[error("{message}")]
    Http { status: u16, message: String },
    #[error("Unexpected response body: {0}")]
    Decode(#[from] serde_json::Error),
    #[error("Response too large (exceeds {0} bytes)")]
    ResponseTooLarge(usize),
    #[error("Invalid base URL: {0}")]
    InvalidBaseUrl(String),
    #[error("Insecure base URL: HTTPS required (except localhost)")]
    InsecureBaseUrl,
}

impl ApiError {
    /// HTTP status for server-side failures.
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Http { status, .. } => Some(*status),
            _ => None,
        }
    }

    pub fn is_unauthorized(&self) -> bool {
        matches!(self.status(), Some(401) | Some(403))
    }
}

/// Thin REST client: one base address, one timeout, optional bearer token.
///
/// Cloning is cheap and clones share the token, so a login performed through
/// one handle authenticates every container built from the same client.
/// No retries and no caching happen here.
#[derive(Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base: Url,
    timeout: Duration,
    token: Arc<RwLock<Option<SecretString>>>,
}

impl std::fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiClient")
            .field("base", &self.base.as_str())
            .field("timeout", &self.timeout)
            .field("token", &self.has_token().then_some("[REDACTED]"))
            .finish()
    }
}

impl ApiClient {
    /// Build a client for `base_url` with its own connection pool.
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, ApiError> {
        let http = reqwest::Client::builder()
            .user_agent(concat!("newsdesk/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Self::with_http(http, base_url, timeout)
    }

    /// Build a client around an existing `reqwest::Client`.
    ///
    /// Plain HTTP is only accepted for loopback hosts so a bearer token never
    /// crosses the network unencrypted.
    pub fn with_http(
        http: reqwest::Client,
        base_url: &str,
        timeout: Duration,
    ) -> Result<Self, ApiError> {
        let base = Url::parse(base_url.trim_end_matches('/'))
            .map_err(|e| ApiError::InvalidBaseUrl(e.to_string()))?;

        match base.scheme() {
            "https" => {}
            "http" => {
                let loopback = matches!(
                    base.host_str(),
                    Some("localhost") | Some("127.0.0.1") | Some("[::1]")
                );
                if !loopback {
                    tracing::error!(base_url = %base, "Rejecting non-HTTPS base URL");
                    return Err(ApiError::InsecureBaseUrl);
                }
                tracing::debug!(base_url = %base, "Using plain HTTP for loopback backend");
            }
            other => return Err(ApiError::InvalidBaseUrl(format!("unsupported scheme {other}"))),
        }

        Ok(Self {
            http,
            base,
            timeout,
            token: Arc::new(RwLock::new(None)),
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base
    }

    /// Replace (or clear) the bearer token used for every subsequent request.
    pub fn set_token(&self, token: Option<SecretString>) {
        let mut guard = self.token.write().unwrap_or_else(PoisonError::into_inner);
        *guard = token;
    }

    pub fn has_token(&self) -> bool {
        self.token
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .is_some()
    }

    fn url_for(&self, path: &str, query: &[(&str, String)]) -> Result<Url, ApiError> {
        let joined = format!(
            "{}/{}",
            self.base.as_str().trim_end_matches('/'),
            path.trim_start_matches('/')
        );
        let mut url = Url::parse(&joined).map_err(|e| ApiError::InvalidBaseUrl(e.to_string()))?;
        if !query.is_empty() {
            let mut pairs = url.query_pairs_mut();
            for (key, value) in query {
                pairs.append_pair(key, value);
            }
        }
        Ok(url)
    }

    /// Issue one request and decode the JSON response.
    ///
    /// An empty 2xx body decodes as JSON `null`, so `T = ()` and `Option<_>`
    /// work for endpoints that return nothing.
    pub async fn request<T, B>(
        &self,
        method: Method,
        path: &str,
        body: Option<&B>,
        query: &[(&str, String)],
    ) -> Result<T, ApiError>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        let url = self.url_for(path, query)?;
        let mut request = self
            .http
            .request(method.clone(), url.clone())
            .header(reqwest::header::ACCEPT, "application/json");

        if let Some(body) = body {
            let bytes = serde_json::to_vec(body)?;
            request = request
                .header(reqwest::header::CONTENT_TYPE, "application/json")
                .body(bytes);
        }

        let token = self
            .token
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .as_ref()
            .map(|t| format!("Bearer {}", t.expose_secret()));
        if let Some(header) = token {
            request = request.header(reqwest::header::AUTHORIZATION, header);
        }

        tracing::debug!(method = %method, path = %url.path(), "Sending request");

        let text = tokio::time::timeout(self.timeout, async {
            let response = request.send().await?;
            let status = response.status();
            let text = read_limited_text(response, MAX_RESPONSE_SIZE).await?;
            if !status.is_success() {
                let message = if text.trim().is_empty() {
                    format!("HTTP error: status {}", status.as_u16())
                } else {
                    text
                };
                return Err(ApiError::Http {
                    status: status.as_u16(),
                    message,
                });
            }
            Ok(text)
        })
        .await
        .map_err(|_| ApiError::Timeout(self.timeout))?
        .inspect_err(|e| {
            tracing::warn!(method = %method, path = %url.path(), error = %e, "Request failed");
        })?;

        let payload = if text.trim().is_empty() { "null" } else { &text };
        Ok(serde_json::from_str(payload)?)
    }

    pub async fn get<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<T, ApiError> {
        self.request::<T, ()>(Method::GET, path, None, query).await
    }

    pub async fn post<T, B>(&self, path: &str, body: Option<&B>) -> Result<T, ApiError>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        self.request(Method::POST, path, body, &[]).await
    }

    pub async fn put<T, B>(&self, path: &str, body: Option<&B>) -> Result<T, ApiError>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        self.request(Method::PUT, path, body, &[]).await
    }

    pub async fn delete(&self, path: &str) -> Result<(), ApiError> {
        self.request::<(), ()>(Method::DELETE, path, None, &[])
            .await
    }
}

async fn read_limited_text(
    mut response: reqwest::Response,
    limit: usize,
) -> Result<String, ApiError> {
    if let Some(len) = response.content_length() {
        if len as usize > limit {
            return Err(ApiError::ResponseTooLarge(limit));
        }
    }

    let mut bytes = Vec::new();
    while let Some(chunk) = response.chunk().await? {
        if bytes.len().saturating_add(chunk.len()) > limit {
            return Err(ApiError::ResponseTooLarge(limit));
        }
        bytes.extend_from_slice(&chunk);
    }

    Ok(String::from_utf8_lossy(&bytes).into_owned())
}
