//! # at-rest
//!
//! Airtable REST API table operations.
//!
//! - **Query**: formula-filtered list with automatic `offset` pagination and
//!   an optional record cap
//! - **Upsert**: mixed updates and creates, sent in batches of ten
//!
//! Both operations return a single aggregated result once every page or
//! batch has been processed, or the first failure.
//!
//! ## Example
//!
//! ```rust,ignore
//! use busbar_at_rest::{AirtableRestClient, UpsertRecord, UpsertRequest};
//! use serde_json::json;
//!
//! let client = AirtableRestClient::from_env()?;
//!
//! let fields = json!({"Status": "Done"}).as_object().cloned().unwrap_or_default();
//! let request = UpsertRequest::new("appXXXXXXXXXXXXXX", "Tasks", vec![
//!     UpsertRecord::update("recXXXXXXXXXXXXXX", fields.clone()),
//!     UpsertRecord::create(fields),
//! ]);
//! let data = client.upsert(&request).await?;
//! ```

mod client;
mod error;
mod pagination;
mod query;
mod types;
mod upsert;

/// Most records the service accepts in one write request.
pub const MAX_BATCH: usize = 10;

/// Largest `pageSize`/`maxRecords` the service accepts per list request.
pub const MAX_PAGE_SIZE: usize = 10 * MAX_BATCH;

pub use client::AirtableRestClient;
pub use error::{Error, ErrorKind, Result};
pub use pagination::{PageState, Paginator};
pub use query::{Page, QueryData, QueryRequest};
pub use types::{Record, UpsertRecord};
pub use upsert::{
    Partition, UpsertData, UpsertPhase, UpsertProgress, UpsertRequest, WriteBatch, WriteEntry,
};
