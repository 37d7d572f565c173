//! Continuation-token pagination for list queries.
//!
//! The loop is a do/while: one page is always requested, then the next
//! page is requested only while the server returns an `offset` and the
//! record cap (if any) is not used up.
//!
//! ```text
//!            ┌──────────┐  receive(page)  ┌──────────────┐
//!   new ───▶ │ Fetching │ ──────────────▶ │ Accumulating │
//!            └──────────┘                 └──────────────┘
//!                 ▲   │ fail()                 │ advance()
//!                 │   ▼                        │
//!            ┌────────┐   has_offset &&        │
//!            │ Failed │   !cap_exhausted ──────┤
//!            └────────┘                        │ otherwise
//!                                              ▼
//!                                          ┌──────┐
//!                                          │ Done │
//!                                          └──────┘
//! ```

use crate::query::{Page, QueryData, QueryRequest};
use crate::types::Record;
use crate::{MAX_BATCH, MAX_PAGE_SIZE};

/// Where the pagination loop stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageState {
    /// A page request is due.
    Fetching,
    /// A page was received and appended; guards not yet evaluated.
    Accumulating,
    /// No further requests will be made.
    Done,
    /// A page request failed; the loop stops without a result.
    Failed,
}

/// Pagination state for a single query.
#[derive(Debug, Clone)]
pub struct Paginator {
    filter_by_formula: Option<String>,
    page_size: Option<u32>,
    remaining: Option<u64>,
    offset: Option<String>,
    records: Vec<Record>,
    pages: usize,
    state: PageState,
}

impl Paginator {
    /// Start paginating `request`.
    pub fn new(request: &QueryRequest) -> Self {
        Self {
            filter_by_formula: request.filter_by_formula.clone(),
            page_size: request.page_size.filter(|&n| n > 0),
            remaining: request.max_records.map(u64::from),
            offset: None,
            records: Vec::new(),
            pages: 0,
            state: PageState::Fetching,
        }
    }

    pub fn state(&self) -> PageState {
        self.state
    }

    /// Number of pages received so far.
    pub fn pages(&self) -> usize {
        self.pages
    }

    /// Number of records accumulated so far.
    pub fn record_count(&self) -> usize {
        self.records.len()
    }

    /// Records still allowed under the cap; `None` when uncapped.
    pub fn remaining(&self) -> Option<u64> {
        self.remaining
    }

    /// Whether the last page carried a continuation token.
    pub fn has_offset(&self) -> bool {
        self.offset.is_some()
    }

    /// Whether a cap is active and used up.
    pub fn cap_exhausted(&self) -> bool {
        self.remaining == Some(0)
    }

    /// Query parameters for the next page request.
    ///
    /// `pageSize` is clamped to `[1, 100]`; a zero page size is left out so
    /// the server default applies. The per-page `maxRecords` is the
    /// remaining allowance capped at 100; a cap of zero asks for one
    /// batch-sized page.
    pub fn page_params(&self) -> Vec<(String, String)> {
        let mut params = Vec::with_capacity(4);

        if let Some(ref formula) = self.filter_by_formula {
            params.push(("filterByFormula".to_string(), formula.clone()));
        }
        if let Some(page_size) = self.page_size {
            let page_size = page_size.clamp(1, MAX_PAGE_SIZE as u32);
            params.push(("pageSize".to_string(), page_size.to_string()));
        }
        if let Some(remaining) = self.remaining {
            let per_page = match remaining {
                0 => MAX_BATCH as u64,
                n => n.min(MAX_PAGE_SIZE as u64),
            };
            params.push(("maxRecords".to_string(), per_page.to_string()));
        }
        if let Some(ref offset) = self.offset {
            params.push(("offset".to_string(), offset.clone()));
        }

        params
    }

    /// Append a received page. `Fetching` → `Accumulating`.
    pub fn receive(&mut self, page: Page) -> PageState {
        if self.state != PageState::Fetching {
            return self.state;
        }

        let received = page.records.len() as u64;
        self.records.extend(page.records);
        self.offset = page.offset;
        if let Some(remaining) = self.remaining.as_mut() {
            *remaining = remaining.saturating_sub(received);
        }
        self.pages += 1;
        self.state = PageState::Accumulating;
        self.state
    }

    /// Evaluate the continuation guards. `Accumulating` → `Fetching` or `Done`.
    pub fn advance(&mut self) -> PageState {
        if self.state == PageState::Accumulating {
            self.state = if self.has_offset() && !self.cap_exhausted() {
                PageState::Fetching
            } else {
                PageState::Done
            };
        }
        self.state
    }

    /// Abandon the loop after a failed request.
    pub fn fail(&mut self) -> PageState {
        self.state = PageState::Failed;
        self.state
    }

    /// The accumulated records and the last continuation token.
    pub fn finish(self) -> QueryData {
        QueryData {
            records: self.records,
            offset: self.offset,
        }
    }
}
