//! # HTTP Transport
//!
//! The send pipeline hands its final headers and body to a [`Transport`].
//! [`HttpTransport`] is the production implementation on `reqwest`.
//!
//! ## Blocking Contract
//!
//! `Transport::post` is synchronous. `HttpTransport` drives the async
//! client through the current Tokio runtime handle with `block_on`, so it
//! must be called from a thread that has entered a runtime but is not
//! itself an async worker: a `spawn_blocking` task, or a plain thread
//! inside `Runtime::enter`.
//!
//! ## Request Shape
//!
//! One POST per call, body sent with a fixed `Content-Length` (never
//! chunked), connection kept alive, redirects followed up to 10 hops. No
//! retries.

use std::time::Duration;

use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use url::Url;

pub use reqwest::StatusCode;

use crate::config::{ProxySettings, TransportConfig};
use crate::error::TransportError;
use crate::headers::HeaderSet;

const MAX_REDIRECTS: usize = 10;

/// The HTTP collaborator.
pub trait Transport: Send + Sync {
    /// POST `body` to `url` and return the 2xx status. Non-2xx statuses
    /// are errors.
    fn post(&self, url: &Url, headers: &HeaderSet, body: &[u8]) -> Result<StatusCode, TransportError>;
}

/// `reqwest`-backed transport.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: reqwest::Client,
    timeout: Duration,
}

impl HttpTransport {
    /// Build the client from configuration.
    pub fn new(config: &TransportConfig) -> Result<Self, TransportError> {
        let mut builder = reqwest::Client::builder()
            .timeout(config.timeout)
            .user_agent(config.user_agent.as_str())
            .redirect(reqwest::redirect::Policy::limited(MAX_REDIRECTS));

        if let Some(proxy) = &config.proxy {
            builder = builder.proxy(build_proxy(proxy)?);
        }

        let client = builder
            .build()
            .map_err(|e| TransportError::ClientBuild(e.to_string()))?;
        Ok(Self {
            client,
            timeout: config.timeout,
        })
    }

    async fn post_async(&self, url: &Url, headers: HeaderMap, body: Vec<u8>) -> Result<StatusCode, TransportError> {
        let resp = self
            .client
            .post(url.clone())
            .headers(headers)
            .body(body)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    TransportError::Timeout {
                        elapsed_ms: u64::try_from(self.timeout.as_millis()).unwrap_or(u64::MAX),
                    }
                } else {
                    TransportError::Connection(e.to_string())
                }
            })?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            tracing::warn!(%url, status = status.as_u16(), "partner rejected AS2 message");
            return Err(TransportError::Status {
                status: status.as_u16(),
                body,
            });
        }
        Ok(status)
    }
}

impl Transport for HttpTransport {
    fn post(&self, url: &Url, headers: &HeaderSet, body: &[u8]) -> Result<StatusCode, TransportError> {
        let rt = tokio::runtime::Handle::try_current().map_err(|_| TransportError::NoRuntime)?;
        let headers = to_header_map(headers)?;
        tracing::debug!(%url, body_len = body.len(), "posting AS2 message");
        rt.block_on(self.post_async(url, headers, body.to_vec()))
    }
}

/// Convert to a `reqwest` header map. `Content-Length` is left to the
/// client, which derives it from the body.
fn to_header_map(headers: &HeaderSet) -> Result<HeaderMap, TransportError> {
    let mut map = HeaderMap::with_capacity(headers.len());
    for (name, value) in headers.iter() {
        if name.eq_ignore_ascii_case("content-length") {
            continue;
        }
        let invalid = || TransportError::InvalidHeader { name: name.to_string() };
        let header_name = HeaderName::from_bytes(name.as_bytes()).map_err(|_| invalid())?;
        let header_value = HeaderValue::from_str(value).map_err(|_| invalid())?;
        map.insert(header_name, header_value);
    }
    Ok(map)
}

fn build_proxy(settings: &ProxySettings) -> Result<reqwest::Proxy, TransportError> {
    let mut proxy =
        reqwest::Proxy::all(settings.name.as_str()).map_err(|e| TransportError::InvalidProxy(e.to_string()))?;
    if let Some(user) = settings.auth_username() {
        let password = settings.password.as_ref().map(|p| p.as_str()).unwrap_or_default();
        proxy = proxy.basic_auth(&user, password);
    }
    Ok(proxy)
}
