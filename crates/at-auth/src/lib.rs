//! # at-auth
//!
//! Airtable credential resolution.
//!
//! An [`AirtableCredentials`] value holds an optional API key (personal
//! access token) and API base URL. Whatever is not set explicitly is looked
//! up in an [`Environment`] at read time:
//!
//! - key: `AIRTABLE_API_KEY`, then `AIRTABLE_KEY`
//! - base: `AIRTABLE_API_BASE`, then `AIRTABLE_API`, then
//!   `https://api.airtable.com/v0`
//!
//! ## Security
//!
//! - The API key is redacted in Debug output
//! - Error messages never include credential values
//!
//! ## Example
//!
//! ```rust,ignore
//! use busbar_at_auth::{AirtableCredentials, Credentials};
//!
//! let mut creds = AirtableCredentials::from_env();
//! creds.configure(&serde_json::json!({ "apiKey": "pat..." }));
//! assert!(creds.is_valid());
//! ```

mod credentials;
mod env;
mod error;

pub use credentials::{AirtableCredentials, Credentials};
pub use env::{Environment, API_BASE_VARS, API_KEY_VARS};
pub use error::{Error, ErrorKind, Result};
