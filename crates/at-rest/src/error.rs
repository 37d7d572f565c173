//! Error types for at-rest.
//!
//! Every failure of `query` and `upsert` is reported through [`Error`]; the
//! API variants keep the HTTP status and the raw response body around for
//! diagnostics.

use serde_json::Value;

use crate::upsert::UpsertProgress;

/// Result type alias for at-rest operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error type for at-rest operations.
#[derive(Debug, thiserror::Error)]
#[error("{kind}")]
pub struct Error {
    /// The kind of error that occurred.
    pub kind: ErrorKind,
    /// Optional source error.
    #[source]
    pub source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl Error {
    /// Create a new error with the given kind.
    pub fn new(kind: ErrorKind) -> Self {
        Self { kind, source: None }
    }

    /// Create a new error with the given kind and source.
    pub fn with_source(
        kind: ErrorKind,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self {
            kind,
            source: Some(Box::new(source)),
        }
    }

    /// HTTP status of the failing response, if there was one.
    pub fn status(&self) -> Option<u16> {
        match &self.kind {
            ErrorKind::QueryFailed { status, .. } | ErrorKind::UpsertFailed { status, .. } => {
                *status
            }
            _ => None,
        }
    }

    /// Raw body of the failing response, if there was one.
    pub fn body(&self) -> Option<&Value> {
        match &self.kind {
            ErrorKind::QueryFailed { body, .. } | ErrorKind::UpsertFailed { body, .. } => {
                body.as_ref()
            }
            _ => None,
        }
    }

    /// What an upsert had applied before it failed.
    pub fn progress(&self) -> Option<&UpsertProgress> {
        match &self.kind {
            ErrorKind::UpsertFailed { progress, .. } => Some(progress),
            _ => None,
        }
    }

    /// Returns true if no API key could be resolved.
    pub fn is_missing_api_key(&self) -> bool {
        matches!(self.kind, ErrorKind::MissingApiKey)
    }

    /// Returns true if the request never produced an HTTP response.
    pub fn is_transport(&self) -> bool {
        matches!(self.kind, ErrorKind::Transport(_))
    }
}

/// The kind of error that occurred.
#[derive(Debug, thiserror::Error)]
pub enum ErrorKind {
    /// No API key configured and none found in the environment.
    #[error("airtable: missing apiKey")]
    MissingApiKey,

    /// A list page came back with an error status, no body, or
    /// undecodable records.
    #[error("airtable: query failed - {message}")]
    QueryFailed {
        status: Option<u16>,
        message: String,
        body: Option<Value>,
    },

    /// A write batch came back with an error status, no body, or a
    /// malformed `records` member.
    #[error("airtable: upsert failed - {message}")]
    UpsertFailed {
        status: Option<u16>,
        message: String,
        body: Option<Value>,
        progress: UpsertProgress,
    },

    /// The request failed below HTTP (timeout, connection, encoding).
    #[error("airtable: {0}")]
    Transport(String),
}

impl From<busbar_at_client::Error> for Error {
    fn from(err: busbar_at_client::Error) -> Self {
        Error::with_source(ErrorKind::Transport(err.to_string()), err)
    }
}

impl From<busbar_at_auth::Error> for Error {
    fn from(err: busbar_at_auth::Error) -> Self {
        match err.kind {
            busbar_at_auth::ErrorKind::MissingApiKey => Error::new(ErrorKind::MissingApiKey),
        }
    }
}
