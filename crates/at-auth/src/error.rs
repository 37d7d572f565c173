//! Error types for at-auth.
//!
//! Error messages never include credential values.

/// Result type alias for at-auth operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error type for at-auth operations.
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
}

/// The kind of error that occurred.
#[derive(Debug, thiserror::Error)]
pub enum ErrorKind {
    /// No API key configured and none found in the environment.
    #[error("missing apiKey")]
    MissingApiKey,
}
