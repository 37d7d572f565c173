//! Core HTTP client with retry and compression handling.

use std::time::Duration;
use tracing::{debug, info, instrument, warn};

use crate::config::ClientConfig;
use crate::error::{is_retryable_status, Error, ErrorKind, Result};
use crate::request::{RequestBuilder, RequestMethod};
use crate::response::{JsonResponse, Response};
use crate::retry::{RetryPolicy, RetryReason};

const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

/// HTTP client for Airtable APIs with built-in retry and compression.
///
/// Every HTTP status is handed back to the caller as a [`Response`]; only
/// faults below HTTP (timeouts, refused connections, broken bodies) become
/// errors.
#[derive(Debug, Clone)]
pub struct AtHttpClient {
    inner: reqwest::Client,
    config: ClientConfig,
}

impl AtHttpClient {
    /// Create a new HTTP client with the given configuration.
    pub fn new(config: ClientConfig) -> Result<Self> {
        let builder = reqwest::Client::builder()
            .timeout(config.timeout)
            .connect_timeout(CONNECT_TIMEOUT)
            .user_agent(crate::USER_AGENT)
            .gzip(config.compression)
            .deflate(config.compression);

        let inner = builder
            .build()
            .map_err(|e| Error::with_source(ErrorKind::Config(e.to_string()), e))?;

        Ok(Self { inner, config })
    }

    /// Create a new HTTP client with default configuration.
    pub fn default_client() -> Result<Self> {
        Self::new(ClientConfig::default())
    }

    /// Get the client configuration.
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Create a GET request builder.
    pub fn get(&self, url: impl Into<String>) -> RequestBuilder {
        RequestBuilder::new(RequestMethod::Get, url)
    }

    /// Create a POST request builder.
    pub fn post(&self, url: impl Into<String>) -> RequestBuilder {
        RequestBuilder::new(RequestMethod::Post, url)
    }

    /// Create a PATCH request builder.
    pub fn patch(&self, url: impl Into<String>) -> RequestBuilder {
        RequestBuilder::new(RequestMethod::Patch, url)
    }

    /// Execute a request, retrying rate limits, server errors and transport
    /// faults when both the client and the request allow it.
    ///
    /// Once retries run out on a retryable status, that last response is
    /// returned as-is.
    #[instrument(skip(self, request), fields(method = %request.method, url = %request.url))]
    pub async fn execute(&self, request: RequestBuilder) -> Result<Response> {
        let mut retry_policy = if request.retry {
            self.config.retry.clone().map(RetryPolicy::new)
        } else {
            None
        };

        loop {
            match self.execute_once(&request).await {
                Ok(response) if is_retryable_status(response.status()) => {
                    let Some(policy) = retry_policy.as_mut() else {
                        return Ok(response);
                    };
                    let reason = RetryReason::from_status(response.status());
                    let Some(delay) = policy.next_delay(reason, response.retry_after()) else {
                        return Ok(response);
                    };
                    warn!(
                        attempt = policy.attempt(),
                        reason = %reason,
                        delay_ms = delay.as_millis() as u64,
                        status = response.status(),
                        "Retryable status, retrying"
                    );
                    tokio::time::sleep(delay).await;
                }
                Ok(response) => return Ok(response),
                Err(err) if err.is_retryable() => {
                    let Some(policy) = retry_policy.as_mut() else {
                        return Err(err);
                    };
                    let Some(delay) = policy.next_delay(RetryReason::Transport, None) else {
                        let attempts = policy.attempt();
                        return Err(Error::with_source(
                            ErrorKind::RetriesExhausted { attempts },
                            err,
                        ));
                    };
                    warn!(
                        attempt = policy.attempt(),
                        delay_ms = delay.as_millis() as u64,
                        error = %err,
                        "Request failed, retrying"
                    );
                    tokio::time::sleep(delay).await;
                }
                Err(err) => return Err(err),
            }
        }
    }

    /// Execute a single request without retry logic.
    async fn execute_once(&self, request: &RequestBuilder) -> Result<Response> {
        let mut req = self
            .inner
            .request(request.method.to_reqwest(), &request.url);

        if let Some(ref token) = request.bearer_token {
            req = req.bearer_auth(token);
        }

        for (name, value) in &request.headers {
            req = req.header(name.as_str(), value.as_str());
        }

        if self.config.compression {
            req = req.header("Accept-Encoding", "gzip, deflate");
        }

        if let Some(timeout) = request.timeout {
            req = req.timeout(timeout);
        }

        if let Some(ref body) = request.body {
            req = req.json(body);
        }

        debug!(method = %request.method, url = %request.url, "Sending request");

        let response = req.send().await?;

        let status = response.status().as_u16();
        let content_length = response.content_length();
        if response.status().is_success() {
            debug!(status, content_length, "Response received");
        } else {
            info!(status, content_length, "Non-success response");
        }

        Ok(Response::new(response))
    }

    /// Execute a request and read its body as JSON.
    ///
    /// Never fails on an HTTP error status: the status and whatever JSON the
    /// server returned are both handed back.
    pub async fn json_request(&self, request: RequestBuilder) -> Result<JsonResponse> {
        let response = self.execute(request).await?;
        response.into_json_response().await
    }
}
