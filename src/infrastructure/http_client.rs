//! HTTP client for the catalog REST API with rate limiting and error mapping
//!
//! Wraps a `reqwest::Client` configured once from `ApiConfig`: base URL, timeout,
//! user agent, optional bearer token. Every request waits on a shared governor
//! limiter and every non-2xx answer becomes `CatalogError::Api` with the
//! server's message extracted from the body.

use governor::{
    clock::DefaultClock,
    state::{direct::NotKeyed, InMemoryState},
    Quota, RateLimiter,
};
use reqwest::{
    header::{HeaderMap, HeaderValue, ACCEPT, AUTHORIZATION, CONTENT_TYPE},
    Client, Method, RequestBuilder, StatusCode,
};
use serde::Serialize;
use serde_json::Value;
use std::num::NonZeroU32;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};
use url::{Host, Url};

use crate::domain::errors::{CatalogError, CatalogResult};
use crate::infrastructure::config::ApiConfig;

/// HTTP client configuration
#[derive(Debug, Clone, serde::Serialize)]
pub struct HttpClientConfig {
    pub base_url: String,
    pub user_agent: String,
    pub timeout_seconds: u64,
    /// 0 disables client-side rate limiting
    pub max_requests_per_second: u32,
    #[serde(skip_serializing)]
    pub bearer_token: Option<String>,
}

impl HttpClientConfig {
    /// Build from API settings, falling back to a stored session token when
    /// the configuration carries none
    pub fn from_api_config(api: &ApiConfig, session_token: Option<String>) -> Self {
        Self {
            base_url: api.base_url.clone(),
            user_agent: api.user_agent.clone(),
            timeout_seconds: api.timeout_seconds,
            max_requests_per_second: api.max_requests_per_second,
            bearer_token: api.auth_token.clone().or(session_token),
        }
    }
}

impl Default for HttpClientConfig {
    fn default() -> Self {
        Self::from_api_config(&ApiConfig::default(), None)
    }
}

type DirectRateLimiter = RateLimiter<NotKeyed, InMemoryState, DefaultClock>;

/// Raw HTTP answer: status plus parsed JSON body (`Value::Null` when empty,
/// `Value::String` when the server answered with plain text)
#[derive(Debug, Clone)]
pub struct HttpResponse {
    pub status: u16,
    pub body: Value,
}

/// Catalog HTTP client. Cheap to clone; clones share the connection pool and limiter.
#[derive(Clone)]
pub struct HttpClient {
    client: Client,
    base_url: Url,
    rate_limiter: Option<Arc<DirectRateLimiter>>,
}

impl HttpClient {
    /// Create a new HTTP client with the given configuration
    pub fn new(config: HttpClientConfig) -> CatalogResult<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        if let Some(token) = config.bearer_token.as_deref().filter(|t| !t.is_empty()) {
            let mut value = HeaderValue::from_str(&format!("Bearer {token}"))
                .map_err(|e| CatalogError::validation("auth_token", format!("Invalid bearer token: {e}")))?;
            value.set_sensitive(true);
            headers.insert(AUTHORIZATION, value);
        }

        let base_url = parse_base_url(&config.base_url)?;

        let mut builder = Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .user_agent(config.user_agent.clone())
            .default_headers(headers)
            .gzip(true);
        // A catalog on this machine is never reached through a system proxy.
        if is_loopback(&base_url) {
            builder = builder.no_proxy();
        }
        let client = builder
            .build()
            .map_err(|e| CatalogError::network(format!("Failed to create HTTP client: {e}")))?;

        let rate_limiter = NonZeroU32::new(config.max_requests_per_second)
            .map(|rps| Arc::new(RateLimiter::direct(Quota::per_second(rps))));

        info!(
            base_url = %base_url,
            timeout_seconds = config.timeout_seconds,
            max_requests_per_second = config.max_requests_per_second,
            authenticated = config.bearer_token.is_some(),
            "HTTP client initialized"
        );

        Ok(Self {
            client,
            base_url,
            rate_limiter,
        })
    }

    /// Resolve path segments against the base URL, percent-encoding each one
    pub fn endpoint(&self, segments: &[&str]) -> CatalogResult<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|()| CatalogError::validation("base_url", "API base URL cannot be a base"))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    pub async fn get(&self, segments: &[&str]) -> CatalogResult<HttpResponse> {
        self.send(Method::GET, segments, None::<&()>).await
    }

    pub async fn post<B: Serialize + Sync>(&self, segments: &[&str], body: &B) -> CatalogResult<HttpResponse> {
        self.send(Method::POST, segments, Some(body)).await
    }

    pub async fn put<B: Serialize + Sync>(&self, segments: &[&str], body: &B) -> CatalogResult<HttpResponse> {
        self.send(Method::PUT, segments, Some(body)).await
    }

    pub async fn delete(&self, segments: &[&str]) -> CatalogResult<HttpResponse> {
        self.send(Method::DELETE, segments, None::<&()>).await
    }

    async fn send<B: Serialize + Sync>(
        &self,
        method: Method,
        segments: &[&str],
        body: Option<&B>,
    ) -> CatalogResult<HttpResponse> {
        let url = self.endpoint(segments)?;

        if let Some(limiter) = &self.rate_limiter {
            limiter.until_ready().await;
        }

        debug!(%method, %url, "Sending request");

        let mut request: RequestBuilder = self.client.request(method.clone(), url.clone());
        if let Some(body) = body {
            request = request.header(CONTENT_TYPE, "application/json").json(body);
        }

        let response = request.send().await.map_err(|e| {
            warn!(%method, %url, error = %e, "Request failed before a response");
            CatalogError::from(e)
        })?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| CatalogError::network(format!("Failed to read response body from {url}: {e}")))?;

        if !status.is_success() {
            let message = error_message(status, &text);
            warn!(%method, %url, status = status.as_u16(), %message, "Request rejected by server");
            return Err(CatalogError::api(status.as_u16(), message));
        }

        debug!(%method, %url, status = status.as_u16(), bytes = text.len(), "Request succeeded");
        Ok(HttpResponse {
            status: status.as_u16(),
            body: parse_body(&text),
        })
    }
}

fn parse_base_url(raw: &str) -> CatalogResult<Url> {
    let url = Url::parse(raw)
        .map_err(|e| CatalogError::validation("base_url", format!("Invalid API base URL {raw}: {e}")))?;
    if url.cannot_be_a_base() {
        return Err(CatalogError::validation("base_url", format!("API base URL cannot be a base: {raw}")));
    }
    Ok(url)
}

fn is_loopback(url: &Url) -> bool {
    match url.host() {
        Some(Host::Ipv4(ip)) => ip.is_loopback(),
        Some(Host::Ipv6(ip)) => ip.is_loopback(),
        Some(Host::Domain(domain)) => domain.eq_ignore_ascii_case("localhost"),
        None => false,
    }
}

/// Empty body is `Null`; non-JSON text is kept as a JSON string
fn parse_body(text: &str) -> Value {
    if text.trim().is_empty() {
        return Value::Null;
    }
    serde_json::from_str(text).unwrap_or_else(|_| Value::String(text.to_string()))
}

/// Extract the server's message from an error body.
///
/// The catalog API answers errors with plain text; other gateways use a bare
/// JSON string or a JSON object with `message` or `error`. An empty body
/// falls back to the status line.
fn error_message(status: StatusCode, text: &str) -> String {
    let trimmed = text.trim();
    match serde_json::from_str::<Value>(trimmed) {
        Ok(Value::Object(map)) => {
            for key in ["message", "error", "detail"] {
                if let Some(Value::String(message)) = map.get(key) {
                    if !message.trim().is_empty() {
                        return message.trim().to_string();
                    }
                }
            }
        }
        Ok(Value::String(message)) if !message.trim().is_empty() => return message.trim().to_string(),
        _ => {}
    }
    if !trimmed.is_empty() && !trimmed.starts_with('{') {
        return trimmed.to_string();
    }
    status
        .canonical_reason()
        .map_or_else(|| format!("Request failed with status code {}", status.as_u16()), str::to_string)
}
