//! Retry policy for Airtable's rate limit and transient failures.
//!
//! Airtable allows five requests per second per base. Going over earns an
//! HTTP 429, and the API then expects the caller to hold off for thirty
//! seconds before trying again. Server errors and transport faults get
//! ordinary exponential backoff instead. Whether a request may be retried
//! at all is decided per request (see
//! [`RequestBuilder::retry`](crate::RequestBuilder::retry)).

use rand::Rng;
use std::time::Duration;

/// How long Airtable wants callers to wait after a 429.
pub const RATE_LIMIT_COOLDOWN: Duration = Duration::from_secs(30);

/// Configuration for retry behavior.
#[derive(Debug, Clone)]
pub struct RetryConfig {
    /// Maximum number of retries after the first attempt.
    pub max_attempts: u32,
    /// Backoff before the first retry of a server error or transport fault.
    /// Doubles on every further retry.
    pub initial_delay: Duration,
    /// Ceiling for the doubled backoff.
    pub max_delay: Duration,
    /// Add up to half the backoff again at random.
    pub jitter: bool,
    /// Wait after a 429 that carries no `Retry-After`.
    pub rate_limit_wait: Duration,
    /// Ceiling for a server-provided `Retry-After`.
    pub max_retry_after: Duration,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            initial_delay: Duration::from_millis(500),
            max_delay: Duration::from_secs(8),
            jitter: true,
            rate_limit_wait: RATE_LIMIT_COOLDOWN,
            max_retry_after: Duration::from_secs(60),
        }
    }
}

impl RetryConfig {
    pub fn with_max_attempts(mut self, attempts: u32) -> Self {
        self.max_attempts = attempts;
        self
    }

    pub fn with_initial_delay(mut self, delay: Duration) -> Self {
        self.initial_delay = delay;
        self
    }

    pub fn with_rate_limit_wait(mut self, wait: Duration) -> Self {
        self.rate_limit_wait = wait;
        self
    }

    /// Doubling backoff for retry number `attempt` (0-indexed).
    fn backoff(&self, attempt: u32) -> Duration {
        let base = self.initial_delay.as_secs_f64() * 2f64.powi(attempt.min(31) as i32);
        let jitter = if self.jitter {
            rand::rng().random::<f64>() * base / 2.0
        } else {
            0.0
        };
        let delay = Duration::from_secs_f64(base + jitter);
        std::cmp::min(delay, self.max_delay)
    }
}

/// Why a request is about to be retried.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RetryReason {
    /// HTTP 429.
    RateLimited,
    /// A retryable 5xx status.
    ServerError,
    /// No response arrived.
    Transport,
}

impl RetryReason {
    /// Classify a retryable status.
    pub fn from_status(status: u16) -> Self {
        if status == 429 {
            RetryReason::RateLimited
        } else {
            RetryReason::ServerError
        }
    }
}

impl std::fmt::Display for RetryReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            RetryReason::RateLimited => "rate_limited",
            RetryReason::ServerError => "server_error",
            RetryReason::Transport => "transport",
        })
    }
}

/// Retry state for a single request.
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    config: RetryConfig,
    attempt: u32,
}

impl RetryPolicy {
    pub fn new(config: RetryConfig) -> Self {
        Self { config, attempt: 0 }
    }

    /// Returns the number of retries taken so far.
    pub fn attempt(&self) -> u32 {
        self.attempt
    }

    /// Returns true if another retry is allowed.
    pub fn should_retry(&self) -> bool {
        self.attempt < self.config.max_attempts
    }

    /// Record a retry and return how long to wait before it.
    /// Returns None once all retries are used up.
    ///
    /// A `Retry-After` from the server wins (capped); a bare 429 waits out
    /// the rate-limit cooldown; everything else backs off.
    pub fn next_delay(
        &mut self,
        reason: RetryReason,
        retry_after: Option<Duration>,
    ) -> Option<Duration> {
        if !self.should_retry() {
            return None;
        }

        let delay = match (retry_after, reason) {
            (Some(retry_after), _) => std::cmp::min(retry_after, self.config.max_retry_after),
            (None, RetryReason::RateLimited) => self.config.rate_limit_wait,
            (None, _) => self.config.backoff(self.attempt),
        };

        self.attempt += 1;
        Some(delay)
    }
}
