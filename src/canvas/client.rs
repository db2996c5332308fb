//! Authenticated Canvas REST client.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use reqwest::header::{
    ACCEPT, AUTHORIZATION, CONTENT_TYPE, HeaderMap, HeaderValue, LINK, RETRY_AFTER,
};
use reqwest::{Method, RequestBuilder, Response, Url};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, error, warn};

use super::error::{CanvasError, ClientBuildError, Result};
use super::links::{PageLinks, parse_link_header};
use super::query::Query;
use super::retry::{RetryDecision, RetryPolicy, Sleeper, TokioSleeper};

pub const DEFAULT_API_VERSION: &str = "v1";
pub const DEFAULT_TIMEOUT_MS: u64 = 30_000;
pub const DEFAULT_MAX_RETRIES: u32 = 3;

/// Timeout applied to binary downloads instead of the client default.
pub const DOWNLOAD_TIMEOUT: Duration = Duration::from_secs(300);

/// Largest body [`CanvasClient::download_binary`] will buffer (5 GiB).
pub const MAX_DOWNLOAD_BYTES: u64 = 5 * 1024 * 1024 * 1024;

// Upper bound for the initial download buffer, whatever Content-Length says.
const MAX_PREALLOC_BYTES: u64 = 16 * 1024 * 1024;

/// Connection settings for a [`CanvasClient`].
#[derive(Clone, Serialize, Deserialize)]
pub struct ClientConfig {
    /// Canvas instance root, e.g. `https://school.instructure.com`.
    pub base_url: String,
    /// Bearer access token.
    pub token: String,
    #[serde(default = "default_api_version")]
    pub api_version: String,
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,
}

fn default_api_version() -> String {
    DEFAULT_API_VERSION.to_string()
}

fn default_timeout_ms() -> u64 {
    DEFAULT_TIMEOUT_MS
}

fn default_max_retries() -> u32 {
    DEFAULT_MAX_RETRIES
}

impl ClientConfig {
    pub fn new(base_url: impl Into<String>, token: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            token: token.into(),
            api_version: default_api_version(),
            timeout_ms: DEFAULT_TIMEOUT_MS,
            max_retries: DEFAULT_MAX_RETRIES,
        }
    }

    /// `{base_url}/api/{api_version}` without a trailing slash.
    pub fn api_base(&self) -> String {
        format!(
            "{}/api/{}",
            self.base_url.trim_end_matches('/'),
            self.api_version.trim_matches('/')
        )
    }
}

impl fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientConfig")
            .field("base_url", &self.base_url)
            .field("token", &"[REDACTED]")
            .field("api_version", &self.api_version)
            .field("timeout_ms", &self.timeout_ms)
            .field("max_retries", &self.max_retries)
            .finish()
    }
}

/// Per-request overrides for write operations.
#[derive(Debug, Clone, Default)]
pub struct RequestOptions {
    pub query: Query,
    pub timeout: Option<Duration>,
}

/// A decoded Canvas response.
#[derive(Debug, Clone)]
pub struct CanvasResponse<T> {
    pub data: T,
    pub headers: HeaderMap,
    pub links: PageLinks,
}

/// Canvas REST client.
///
/// Every request carries the bearer token and JSON headers. A response with
/// status 429 or 5xx is retried according to the configured
/// [`RetryPolicy`]; anything else non-2xx becomes [`CanvasError::Api`], and a
/// request that never gets an answer becomes [`CanvasError::Transport`].
///
/// Cloning is cheap; clones share the connection pool.
#[derive(Clone)]
pub struct CanvasClient {
    http: reqwest::Client,
    api_base: String,
    origin: Url,
    retry: RetryPolicy,
    sleeper: Arc<dyn Sleeper>,
}

impl fmt::Debug for CanvasClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CanvasClient")
            .field("api_base", &self.api_base)
            .field("retry", &self.retry)
            .finish_non_exhaustive()
    }
}

impl CanvasClient {
    pub fn new(config: &ClientConfig) -> std::result::Result<Self, ClientBuildError> {
        Self::with_sleeper(config, Arc::new(TokioSleeper))
    }

    /// Build a client that waits between retries through `sleeper`.
    pub fn with_sleeper(
        config: &ClientConfig,
        sleeper: Arc<dyn Sleeper>,
    ) -> std::result::Result<Self, ClientBuildError> {
        let api_base = config.api_base();
        let mut origin =
            Url::parse(&api_base).map_err(|err| ClientBuildError::InvalidBaseUrl {
                url: config.base_url.clone(),
                reason: err.to_string(),
            })?;
        if origin.cannot_be_a_base() || !matches!(origin.scheme(), "http" | "https") {
            return Err(ClientBuildError::InvalidBaseUrl {
                url: config.base_url.clone(),
                reason: "expected an http(s) URL".to_string(),
            });
        }
        origin.set_path("/");
        origin.set_query(None);

        let mut auth = HeaderValue::from_str(&format!("Bearer {}", config.token))
            .map_err(|_| ClientBuildError::InvalidToken)?;
        auth.set_sensitive(true);

        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, auth);
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        let http = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(Duration::from_millis(config.timeout_ms))
            .build()?;

        debug!(
            api_base = %api_base,
            timeout_ms = config.timeout_ms,
            max_retries = config.max_retries,
            "Canvas client created"
        );

        Ok(Self {
            http,
            api_base,
            origin,
            retry: RetryPolicy::new(config.max_retries),
            sleeper,
        })
    }

    /// `{base_url}/api/{version}`.
    pub fn api_base(&self) -> &str {
        &self.api_base
    }

    /// GET a JSON resource.
    ///
    /// `path` is joined to the API base; an absolute `http(s)://` URL is used
    /// verbatim.
    pub async fn get<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &Query,
    ) -> Result<CanvasResponse<T>> {
        let url = self.resolve(path)?;
        let response = self
            .send(&Method::GET, &url, || {
                with_query(self.http.get(url.clone()), query)
            })
            .await?;
        Self::into_canvas_response(response).await
    }

    pub async fn post<T, B>(
        &self,
        path: &str,
        body: &B,
        options: RequestOptions,
    ) -> Result<CanvasResponse<T>>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        self.write(Method::POST, path, Some(body), options).await
    }

    pub async fn put<T, B>(
        &self,
        path: &str,
        body: &B,
        options: RequestOptions,
    ) -> Result<CanvasResponse<T>>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        self.write(Method::PUT, path, Some(body), options).await
    }

    pub async fn delete<T: DeserializeOwned>(
        &self,
        path: &str,
        options: RequestOptions,
    ) -> Result<CanvasResponse<T>> {
        self.write::<T, Value>(Method::DELETE, path, None, options)
            .await
    }

    /// Fetch raw bytes, with a 5 minute timeout and a 5 GiB ceiling.
    pub async fn download_binary(&self, url: &str) -> Result<Vec<u8>> {
        let url = self.resolve(url)?;
        let mut response = self
            .send(&Method::GET, &url, || {
                self.http.get(url.clone()).timeout(DOWNLOAD_TIMEOUT)
            })
            .await?;

        let status = response.status().as_u16();
        let declared = response.content_length();
        if let Some(len) = declared.filter(|len| *len > MAX_DOWNLOAD_BYTES) {
            return Err(download_too_large(status, len));
        }

        let capacity = declared.unwrap_or(0).min(MAX_PREALLOC_BYTES) as usize;
        let mut bytes = Vec::with_capacity(capacity);
        while let Some(chunk) = response.chunk().await.map_err(CanvasError::transport)? {
            let received = (bytes.len() + chunk.len()) as u64;
            if received > MAX_DOWNLOAD_BYTES {
                return Err(download_too_large(status, received));
            }
            bytes.extend_from_slice(&chunk);
        }

        debug!(url = %url, bytes = bytes.len(), "Download complete");
        Ok(bytes)
    }

    /// Turn a pagination link into a request URL on the configured host.
    ///
    /// Only the path and query of `link` are kept, so the token is never sent
    /// to a host other than the configured Canvas instance.
    pub(crate) fn rebase_link(&self, link: &str) -> Result<Url> {
        let parsed = self
            .origin
            .join(link)
            .map_err(|err| CanvasError::unsendable(format!("Invalid pagination link '{link}': {err}")))?;

        let mut url = self.origin.clone();
        url.set_path(parsed.path());
        url.set_query(parsed.query());
        Ok(url)
    }

    fn resolve(&self, target: &str) -> Result<Url> {
        let raw = if target.starts_with("http://") || target.starts_with("https://") {
            target.to_string()
        } else {
            format!("{}/{}", self.api_base, target.trim_start_matches('/'))
        };
        Url::parse(&raw)
            .map_err(|err| CanvasError::unsendable(format!("Invalid request URL '{raw}': {err}")))
    }

    async fn write<T, B>(
        &self,
        method: Method,
        path: &str,
        body: Option<&B>,
        options: RequestOptions,
    ) -> Result<CanvasResponse<T>>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        let url = self.resolve(path)?;
        let response = self
            .send(&method, &url, || {
                let mut request =
                    with_query(self.http.request(method.clone(), url.clone()), &options.query);
                if let Some(body) = body {
                    request = request.json(body);
                }
                if let Some(timeout) = options.timeout {
                    request = request.timeout(timeout);
                }
                request
            })
            .await?;
        Self::into_canvas_response(response).await
    }

    /// Issue the request built by `build`, retrying per the policy.
    ///
    /// `build` is invoked once per attempt so every retry sends an identical
    /// request.
    async fn send<F>(&self, method: &Method, url: &Url, build: F) -> Result<Response>
    where
        F: Fn() -> RequestBuilder,
    {
        let mut attempt = 0u32;

        loop {
            debug!(%method, %url, attempt, "Sending Canvas request");

            let response = match build().send().await {
                Ok(response) => response,
                Err(err) => {
                    error!(%method, %url, error = %err, "No response received from Canvas API");
                    return Err(CanvasError::transport(err));
                }
            };

            let status = response.status();
            if status.is_success() {
                return Ok(response);
            }

            let decision = {
                let retry_after = response
                    .headers()
                    .get(RETRY_AFTER)
                    .and_then(|value| value.to_str().ok());
                self.retry.decide(status, retry_after, attempt)
            };

            match decision {
                RetryDecision::Retry { delay } => {
                    attempt += 1;
                    warn!(
                        %method,
                        %url,
                        status = status.as_u16(),
                        retry = attempt,
                        max_retries = self.retry.max_retries(),
                        delay_secs = delay.as_secs(),
                        "Retrying Canvas request"
                    );
                    drop(response);
                    self.sleeper.sleep(delay).await;
                }
                RetryDecision::Stop => return Err(api_error(response).await),
            }
        }
    }

    async fn into_canvas_response<T: DeserializeOwned>(
        response: Response,
    ) -> Result<CanvasResponse<T>> {
        let status = response.status().as_u16();
        let headers = response.headers().clone();
        let links = parse_link_header(headers.get(LINK).and_then(|value| value.to_str().ok()));

        let body = response.text().await.map_err(CanvasError::transport)?;
        let text = if body.trim().is_empty() { "null" } else { body.as_str() };
        let decoded = serde_json::from_str::<T>(text);

        match decoded {
            Ok(data) => Ok(CanvasResponse {
                data,
                headers,
                links,
            }),
            Err(err) => {
                warn!(status, error = %err, "Canvas response body could not be decoded");
                Err(CanvasError::Api {
                    status,
                    message: format!("Invalid response body: {err}"),
                    body,
                })
            }
        }
    }
}

fn with_query(request: RequestBuilder, query: &Query) -> RequestBuilder {
    if query.is_empty() {
        request
    } else {
        request.query(query.pairs())
    }
}

async fn api_error(response: Response) -> CanvasError {
    let status = response.status().as_u16();
    let body = match response.text().await {
        Ok(body) => body,
        Err(err) => {
            warn!(status, error = %err, "Failed to read Canvas error body");
            String::new()
        }
    };
    let message = error_message(&body)
        .unwrap_or_else(|| format!("Request failed with status code {status}"));

    warn!(status, message = %message, "Canvas API request failed");
    CanvasError::Api {
        status,
        message,
        body,
    }
}

/// Message from a Canvas error body: `{"message": ..}` or
/// `{"errors": [{"message": ..}]}`.
fn error_message(body: &str) -> Option<String> {
    let value: Value = serde_json::from_str(body).ok()?;

    if let Some(message) = value.get("message").and_then(Value::as_str) {
        return Some(message.to_string());
    }

    value
        .get("errors")?
        .as_array()?
        .iter()
        .find_map(|entry| entry.get("message")?.as_str())
        .map(str::to_string)
}

fn download_too_large(status: u16, bytes: u64) -> CanvasError {
    CanvasError::Api {
        status,
        message: format!(
            "Download of {bytes} bytes exceeds the {MAX_DOWNLOAD_BYTES} byte limit"
        ),
        body: String::new(),
    }
}
