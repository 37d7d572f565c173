//! # busbar-at-api
//!
//! An Airtable API client library for Rust.
//!
//! This library provides typed access to Airtable tables with credential
//! resolution, retry logic, and structured errors.
//!
//! ## Security
//!
//! - API keys are redacted in Debug output
//! - Tracing spans skip credential parameters
//! - Error messages have tokens redacted before they are surfaced
//!
//! ## Crates
//!
//! - **busbar-at-client** - HTTP transport with retry, compression, URL building and error shaping
//! - **busbar-at-auth** - API key and base URL resolution with environment fallback
//! - **busbar-at-rest** - Table operations: paginated formula queries and batched upserts
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use busbar_at_api::{AirtableCredentials, AirtableRestClient, QueryRequest};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     // Key from AIRTABLE_API_KEY, base URL defaults to the public endpoint
//!     let client = AirtableRestClient::new(AirtableCredentials::from_env())?;
//!
//!     let request = QueryRequest::new("appXXXXXXXXXXXXXX", "Tasks")
//!         .filter_by_formula("NOT({Done})")
//!         .max_records(25);
//!
//!     for record in client.query(&request).await?.records {
//!         println!("{:?} {:?}", record.id, record.field("Name"));
//!     }
//!
//!     Ok(())
//! }
//! ```

#[cfg(feature = "auth")]
pub use busbar_at_auth as auth;
#[cfg(feature = "client")]
pub use busbar_at_client as client;
#[cfg(feature = "rest")]
pub use busbar_at_rest as rest;

#[cfg(feature = "auth")]
pub use busbar_at_auth::{AirtableCredentials, Credentials, Environment};
#[cfg(feature = "client")]
pub use busbar_at_client::{AtHttpClient, ClientConfig, RetryConfig};
#[cfg(feature = "rest")]
pub use busbar_at_rest::{
    AirtableRestClient, QueryData, QueryRequest, Record, UpsertData, UpsertRecord, UpsertRequest,
};
