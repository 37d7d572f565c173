//! Transport configuration.

use crate::retry::RetryConfig;
use std::time::Duration;

/// Settings shared by every request an [`AtHttpClient`](crate::AtHttpClient)
/// sends.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Retry policy for reads. `None` disables retries for every request.
    pub retry: Option<RetryConfig>,
    /// Request timeout used when a request carries no override.
    pub timeout: Duration,
    /// Ask for and decode gzip/deflate bodies.
    pub compression: bool,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            retry: Some(RetryConfig::default()),
            timeout: Duration::from_secs(30),
            compression: true,
        }
    }
}

impl ClientConfig {
    pub fn builder() -> ClientConfigBuilder {
        ClientConfigBuilder::default()
    }
}

/// Builder for [`ClientConfig`].
#[derive(Debug, Default)]
pub struct ClientConfigBuilder {
    config: ClientConfig,
}

impl ClientConfigBuilder {
    pub fn with_retry(mut self, retry: RetryConfig) -> Self {
        self.config.retry = Some(retry);
        self
    }

    /// Never retry, whatever the request asks for.
    pub fn without_retry(mut self) -> Self {
        self.config.retry = None;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.config.timeout = timeout;
        self
    }

    pub fn with_compression(mut self, enabled: bool) -> Self {
        self.config.compression = enabled;
        self
    }

    pub fn build(self) -> ClientConfig {
        self.config
    }
}
