//! List-records query types.

use serde_json::Value;
use std::time::Duration;

use crate::types::Record;

/// A formula-filtered list query against one table.
#[derive(Debug, Clone, PartialEq)]
pub struct QueryRequest {
    pub base_id: String,
    pub table: String,
    /// Server-side formula; only matching records are returned.
    pub filter_by_formula: Option<String>,
    /// Upper bound on records fetched across all pages.
    pub max_records: Option<u32>,
    /// Records per page; clamped to `[1, 100]` on the wire. Zero means
    /// the server default.
    pub page_size: Option<u32>,
    /// Let the transport retry rate limits and server errors.
    pub retry: bool,
    /// Per-page request timeout.
    pub timeout: Option<Duration>,
}

impl QueryRequest {
    /// Query every record of `table` in `base_id`.
    pub fn new(base_id: impl Into<String>, table: impl Into<String>) -> Self {
        Self {
            base_id: base_id.into(),
            table: table.into(),
            filter_by_formula: None,
            max_records: None,
            page_size: None,
            retry: true,
            timeout: None,
        }
    }

    pub fn filter_by_formula(mut self, formula: impl Into<String>) -> Self {
        self.filter_by_formula = Some(formula.into()).filter(|f| !f.is_empty());
        self
    }

    pub fn max_records(mut self, max_records: u32) -> Self {
        self.max_records = Some(max_records);
        self
    }

    pub fn page_size(mut self, page_size: u32) -> Self {
        self.page_size = Some(page_size);
        self
    }

    pub fn retry(mut self, retry: bool) -> Self {
        self.retry = retry;
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }
}

/// Aggregated result of a query.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct QueryData {
    /// Records in server order, across all pages fetched.
    pub records: Vec<Record>,
    /// Continuation token of the last page, if the server still had more
    /// when the record cap stopped the loop.
    pub offset: Option<String>,
}

/// One decoded list page.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Page {
    pub records: Vec<Record>,
    pub offset: Option<String>,
    /// Elements of `records` that were not record objects.
    pub skipped: usize,
}

impl Page {
    /// Decode a list response body.
    ///
    /// A missing or non-array `records` member decodes as an empty page.
    pub fn from_body(body: &Value) -> Self {
        let (records, skipped) = match body.get("records") {
            Some(Value::Array(items)) => Record::decode_all(items),
            _ => (Vec::new(), 0),
        };
        let offset = body
            .get("offset")
            .and_then(Value::as_str)
            .filter(|o| !o.is_empty())
            .map(str::to_string);

        Self {
            records,
            offset,
            skipped,
        }
    }
}
