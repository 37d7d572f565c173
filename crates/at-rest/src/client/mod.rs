//! Airtable REST API client.
//!
//! This client wraps `AtHttpClient` from `at-client` and resolves credentials
//! through `at-auth` on every call, so a key configured after construction is
//! picked up by the next operation.

use busbar_at_auth::{AirtableCredentials, Credentials};
use busbar_at_client::{build_url, AtHttpClient, ClientConfig, RequestBuilder, RequestMethod};
use serde_json::Value;

use crate::error::Result;

mod query;
mod upsert;

/// Airtable REST API client.
///
/// Provides the two table operations:
/// - formula queries with automatic pagination
/// - batched upserts (updates and creates)
///
/// # Example
///
/// ```rust,ignore
/// use busbar_at_rest::{AirtableRestClient, QueryRequest};
///
/// let client = AirtableRestClient::from_env()?;
///
/// let request = QueryRequest::new("appXXXXXXXXXXXXXX", "Tasks")
///     .filter_by_formula("{Status} = 'Open'")
///     .max_records(50);
/// let data = client.query(&request).await?;
/// println!("{} open tasks", data.records.len());
/// ```
#[derive(Debug, Clone)]
pub struct AirtableRestClient {
    http: AtHttpClient,
    credentials: AirtableCredentials,
}

impl AirtableRestClient {
    /// Create a REST client with the given credentials and default HTTP
    /// configuration.
    pub fn new(credentials: AirtableCredentials) -> Result<Self> {
        Self::with_config(credentials, ClientConfig::default())
    }

    /// Create a REST client with custom HTTP configuration.
    pub fn with_config(credentials: AirtableCredentials, config: ClientConfig) -> Result<Self> {
        let http = AtHttpClient::new(config)?;
        Ok(Self { http, credentials })
    }

    /// Create a REST client that resolves everything from the environment.
    pub fn from_env() -> Result<Self> {
        Self::new(AirtableCredentials::from_env())
    }

    /// Create a REST client from an existing HTTP client.
    pub fn from_client(http: AtHttpClient, credentials: AirtableCredentials) -> Self {
        Self { http, credentials }
    }

    /// Get the underlying HTTP client.
    pub fn inner(&self) -> &AtHttpClient {
        &self.http
    }

    pub fn credentials(&self) -> &AirtableCredentials {
        &self.credentials
    }

    /// The API base URL requests are sent to.
    pub fn api_base(&self) -> String {
        self.credentials.api_base()
    }

    /// Merge `apiKey` and `api` from a JSON options object into the
    /// client's credentials.
    pub fn configure(&mut self, options: &Value) {
        self.credentials.configure(options);
    }

    /// Build an authenticated request for `<base>/<base_id>/<table>`.
    ///
    /// Fails before any network activity when no API key resolves.
    fn table_request(
        &self,
        method: RequestMethod,
        base_id: &str,
        table: &str,
        query: &[(String, String)],
    ) -> Result<RequestBuilder> {
        let headers = self.credentials.require_auth_headers()?;
        let url = build_url(&self.credentials.api_base(), base_id, table, query)?;
        Ok(RequestBuilder::new(method, url).headers(headers))
    }
}
