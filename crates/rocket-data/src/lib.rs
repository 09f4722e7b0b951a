//! HTTP fetch client with timeout and retry policies.
//!
//! Wraps `reqwest` with a base URL, `GET` requests, buffered responses and
//! a retry loop driven by [`RetryPolicy`].
//!
//! # Example
//!
//! ```rust,ignore
//! use rocket_data::{FetchClient, FetchPolicy};
//! use serde::Deserialize;
//!
//! #[derive(Deserialize)]
//! struct Stock {
//!     id: u64,
//!     amount: i64,
//! }
//!
//! let client = FetchClient::new(FetchPolicy::default())?
//!     .with_base_url("http://localhost:3333");
//!
//! let stock: Stock = client
//!     .get("/stock/1")
//!     .send()
//!     .await?
//!     .error_for_status()?
//!     .json()?;
//! ```

mod error;
mod request;
mod response;
mod retry;
mod timeout;

use std::collections::HashMap;

use tracing::{debug, warn};

pub use error::FetchError;
pub use request::RequestBuilder;
pub use response::{Response, StatusClass};
pub use retry::{BackoffStrategy, RetryCondition, RetryPolicy};
pub use timeout::TimeoutConfig;

/// Limits and retry behavior shared by every request of a client.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FetchPolicy {
    pub timeout: TimeoutConfig,
    pub retry: RetryPolicy,
}

impl FetchPolicy {
    pub fn new(timeout: TimeoutConfig, retry: RetryPolicy) -> Self {
        Self { timeout, retry }
    }
}

/// Client for a JSON API rooted at an optional base URL.
///
/// Cloning is cheap; clones share the connection pool.
#[derive(Debug, Clone)]
pub struct FetchClient {
    inner: reqwest::Client,
    retry: RetryPolicy,
    base_url: Option<String>,
}

impl FetchClient {
    pub fn new(policy: FetchPolicy) -> Result<Self, FetchError> {
        let inner = reqwest::Client::builder()
            .connect_timeout(policy.timeout.connect)
            .timeout(policy.timeout.total)
            .build()
            .map_err(|e| FetchError::RequestError(e.to_string()))?;

        Ok(Self {
            inner,
            retry: policy.retry,
            base_url: None,
        })
    }

    /// Resolve relative request paths against `base_url`.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    /// Start a `GET` request for `path`.
    pub fn get(&self, path: impl Into<String>) -> ClientRequestBuilder {
        ClientRequestBuilder {
            client: self.inner.clone(),
            retry: self.retry.clone(),
            builder: RequestBuilder::new(self.resolve(path.into())),
        }
    }

    /// Absolute URLs pass through; anything else joins the base URL with
    /// exactly one slash.
    fn resolve(&self, path: String) -> String {
        let absolute = path.starts_with("http://") || path.starts_with("https://");
        match &self.base_url {
            Some(base) if !absolute => format!(
                "{}/{}",
                base.trim_end_matches('/'),
                path.trim_start_matches('/')
            ),
            _ => path,
        }
    }
}

/// A request ready to be sent through its client.
pub struct ClientRequestBuilder {
    client: reqwest::Client,
    retry: RetryPolicy,
    builder: RequestBuilder,
}

impl ClientRequestBuilder {
    /// Ask for a JSON response.
    pub fn accept_json(mut self) -> Self {
        self.builder = self.builder.accept_json();
        self
    }

    pub fn bearer_auth(mut self, token: impl AsRef<str>) -> Self {
        self.builder = self.builder.bearer_auth(token);
        self
    }

    /// The request as built so far.
    pub fn request(&self) -> &RequestBuilder {
        &self.builder
    }

    /// Send the request, retrying according to the policy.
    ///
    /// A retryable status that survives every attempt is returned as a
    /// response; use [`Response::error_for_status`] to turn it into an error.
    pub async fn send(self) -> Result<Response, FetchError> {
        let mut retry = 0;
        loop {
            match self.send_once().await {
                Ok(resp) if self.retry.retries_status(resp.status, retry) => {
                    warn!(
                        url = %self.builder.url,
                        status = resp.status,
                        retry,
                        "retrying request after status"
                    );
                }
                Ok(resp) => return Ok(resp),
                Err(e) if self.retry.retries_error(&e, retry) => {
                    warn!(url = %self.builder.url, error = %e, retry, "retrying request after error");
                }
                Err(e) => return Err(e),
            }

            tokio::time::sleep(self.retry.backoff.delay(retry)).await;
            retry += 1;
        }
    }

    async fn send_once(&self) -> Result<Response, FetchError> {
        let mut request = self.client.get(&self.builder.url);
        for (key, value) in &self.builder.headers {
            request = request.header(key.as_str(), value.as_str());
        }

        let response = request.send().await?;
        let status = response.status().as_u16();
        let headers: HashMap<String, String> = response
            .headers()
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_str().unwrap_or("").to_string()))
            .collect();
        let body = response.bytes().await?.to_vec();

        debug!(
            url = %self.builder.url,
            status,
            bytes = body.len(),
            "fetch completed"
        );

        Ok(Response::new(status, headers, body))
    }
}

/// Common imports for API clients.
pub mod prelude {
    pub use crate::{FetchClient, FetchError, FetchPolicy, Response};
}
