//! # at-client
//!
//! Core HTTP client infrastructure for Airtable APIs.
//!
//! This crate provides the transport layer shared by the higher-level crates:
//! - Automatic retry with exponential backoff and jitter
//! - Compression support (gzip, deflate)
//! - Rate limit handling (`Retry-After`, or Airtable's 30 second cooldown)
//! - Per-request retry and timeout overrides
//! - URL construction for `<base>/<table>` endpoints
//! - Error envelope parsing into a single human-readable message
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                    Application Layer                        │
//! │  (at-rest: query + upsert engines)                          │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │                    AtHttpClient                             │
//! │  - Raw HTTP with retry, compression, rate limiting          │
//! │  - Returns every HTTP status as a response                  │
//! │  - Only transport faults surface as errors                  │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Example
//!
//! ```rust,ignore
//! use busbar_at_client::{build_url, AtHttpClient, ClientConfig};
//!
//! let http = AtHttpClient::new(ClientConfig::default())?;
//! let url = build_url("https://api.airtable.com/v0", "appXXX", "Tasks", &[])?;
//! let response = http
//!     .json_request(http.get(url).bearer_auth("pat..."))
//!     .await?;
//! println!("{} {:?}", response.status, response.json);
//! ```

mod client;
mod config;
mod error;
mod request;
mod response;
mod retry;
mod url;

pub use client::AtHttpClient;
pub use config::{ClientConfig, ClientConfigBuilder};
pub use error::{Error, ErrorKind, Result};
pub use request::{RequestBuilder, RequestMethod};
pub use response::{error_message, JsonResponse, Response};
pub use retry::{RetryConfig, RetryPolicy, RetryReason, RATE_LIMIT_COOLDOWN};
pub use url::{build_url, encode_query};

/// Default Airtable API base URL.
pub const DEFAULT_API_BASE: &str = "https://api.airtable.com/v0";

/// User-Agent string for the client
pub const USER_AGENT: &str = concat!("busbar-at-api/", env!("CARGO_PKG_VERSION"));
