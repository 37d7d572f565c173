//! Credentials trait and implementations.
//!
//! All credential types implement custom Debug to redact sensitive data.

use serde_json::Value;
use tracing::debug;

use busbar_at_client::DEFAULT_API_BASE;

use crate::env::{Environment, API_BASE_VARS, API_KEY_VARS};
use crate::error::{Error, ErrorKind, Result};

/// Trait for Airtable credentials.
pub trait Credentials: Send + Sync {
    /// The API key (personal access token), if one resolves.
    fn token(&self) -> Option<String>;

    /// The API base URL, without a trailing slash.
    fn api_base(&self) -> String;

    /// Request headers for an authenticated JSON call.
    ///
    /// Returns `None` when no token resolves; callers must then fail
    /// without touching the network.
    fn auth_headers(&self) -> Option<Vec<(String, String)>> {
        let token = self.token()?;
        Some(vec![
            ("Authorization".to_string(), format!("Bearer {token}")),
            ("Content-Type".to_string(), "application/json".to_string()),
        ])
    }

    /// Like [`auth_headers`](Self::auth_headers), but as an error.
    fn require_auth_headers(&self) -> Result<Vec<(String, String)>> {
        self.auth_headers()
            .ok_or_else(|| Error::new(ErrorKind::MissingApiKey))
    }

    /// Returns true if a token resolves.
    fn is_valid(&self) -> bool {
        self.token().is_some()
    }
}

/// Standard Airtable credentials: an optional explicit key and base URL,
/// with the environment as fallback for whichever is unset.
///
/// Lookups happen at read time; nothing is cached from the environment.
#[derive(Clone, Default)]
pub struct AirtableCredentials {
    api_key: Option<String>,
    api_base: Option<String>,
    env: Environment,
}

impl std::fmt::Debug for AirtableCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AirtableCredentials")
            .field("api_key", &self.api_key.as_ref().map(|_| "[REDACTED]"))
            .field("api_base", &self.api_base)
            .field("env", &self.env)
            .finish()
    }
}

impl AirtableCredentials {
    /// Credentials with nothing configured; everything resolves from the
    /// process environment.
    pub fn new() -> Self {
        Self::default()
    }

    /// Credentials resolved from the process environment only.
    pub fn from_env() -> Self {
        Self::new().with_env(Environment::system())
    }

    /// Set the API key.
    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into()).filter(|k| !k.is_empty());
        self
    }

    /// Set the API base URL.
    pub fn with_api_base(mut self, api_base: impl Into<String>) -> Self {
        self.api_base = Some(api_base.into()).filter(|b| !b.is_empty());
        self
    }

    /// Replace the fallback environment.
    pub fn with_env(mut self, env: Environment) -> Self {
        self.env = env;
        self
    }

    /// Merge `apiKey` and `api` from a JSON options object.
    ///
    /// Anything that is not an object is ignored, as are members that are
    /// missing, empty, or not strings.
    pub fn configure(&mut self, options: &Value) {
        let Some(options) = options.as_object() else {
            debug!("Ignoring non-object configuration");
            return;
        };

        if let Some(api_key) = non_empty_str(options.get("apiKey")) {
            self.api_key = Some(api_key.to_string());
        }
        if let Some(api) = non_empty_str(options.get("api")) {
            self.api_base = Some(api.to_string());
        }
    }

    /// Returns true if a key was configured explicitly.
    pub(crate) fn has_explicit_key(&self) -> bool {
        self.api_key.is_some()
    }
}

fn non_empty_str(value: Option<&Value>) -> Option<&str> {
    value.and_then(Value::as_str).filter(|s| !s.is_empty())
}

impl Credentials for AirtableCredentials {
    fn token(&self) -> Option<String> {
        if self.has_explicit_key() {
            return self.api_key.clone();
        }
        let token = self.env.first_of(&API_KEY_VARS);
        if token.is_some() {
            debug!("API key resolved from environment");
        }
        token
    }

    fn api_base(&self) -> String {
        let base = self
            .api_base
            .clone()
            .or_else(|| self.env.first_of(&API_BASE_VARS))
            .unwrap_or_else(|| DEFAULT_API_BASE.to_string());
        base.trim_end_matches('/').to_string()
    }
}
