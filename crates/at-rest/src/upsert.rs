//! Batched upsert types.
//!
//! Records with a non-empty id are updates (`PATCH`), records with fields
//! but no id are creates (`POST`). Updates are sent first, then creates,
//! in batches of [`MAX_BATCH`] and strictly one after another.

use serde::Serialize;
use serde_json::{Map, Value};
use std::time::Duration;

use busbar_at_client::RequestMethod;

use crate::types::{Record, UpsertRecord};
use crate::MAX_BATCH;

/// A batched create-or-update against one table.
#[derive(Debug, Clone, PartialEq)]
pub struct UpsertRequest {
    pub base_id: String,
    pub table: String,
    pub records: Vec<UpsertRecord>,
    /// Ask the server to coerce field values to the column types.
    pub typecast: bool,
    /// Per-batch request timeout.
    pub timeout: Option<Duration>,
}

impl UpsertRequest {
    pub fn new(
        base_id: impl Into<String>,
        table: impl Into<String>,
        records: impl IntoIterator<Item = UpsertRecord>,
    ) -> Self {
        Self {
            base_id: base_id.into(),
            table: table.into(),
            records: records.into_iter().collect(),
            typecast: false,
            timeout: None,
        }
    }

    pub fn typecast(mut self, typecast: bool) -> Self {
        self.typecast = typecast;
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }
}

/// Outcome of a completed upsert.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UpsertData {
    /// Records returned by the update batches, in batch order.
    pub patched: Vec<Record>,
    /// Records returned by the create batches, in batch order.
    pub created: Vec<Record>,
    /// Number of input entries skipped for having neither id nor fields.
    pub dropped: usize,
}

impl UpsertData {
    pub(crate) fn push(&mut self, phase: UpsertPhase, records: Vec<Record>) {
        match phase {
            UpsertPhase::Update => self.patched.extend(records),
            UpsertPhase::Create => self.created.extend(records),
        }
    }
}

/// The two write phases, in the order they run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpsertPhase {
    Update,
    Create,
}

impl UpsertPhase {
    /// HTTP method used by this phase.
    pub fn method(self) -> RequestMethod {
        match self {
            UpsertPhase::Update => RequestMethod::Patch,
            UpsertPhase::Create => RequestMethod::Post,
        }
    }
}

impl std::fmt::Display for UpsertPhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            UpsertPhase::Update => write!(f, "update"),
            UpsertPhase::Create => write!(f, "create"),
        }
    }
}

/// How far an upsert got before it stopped.
///
/// Counts are records the server returned from accepted batches.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UpsertProgress {
    pub patched: usize,
    pub created: usize,
    pub batches_sent: usize,
    /// Phase of the batch that failed.
    pub failed_phase: Option<UpsertPhase>,
}

impl UpsertProgress {
    pub(crate) fn record(&mut self, phase: UpsertPhase, count: usize) {
        match phase {
            UpsertPhase::Update => self.patched += count,
            UpsertPhase::Create => self.created += count,
        }
        self.batches_sent += 1;
    }
}

/// One element of a write batch body.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WriteEntry {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub fields: Map<String, Value>,
}

/// Body of one `PATCH` or `POST` batch.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WriteBatch<'a> {
    pub records: &'a [WriteEntry],
    pub typecast: bool,
}

/// Input records split by phase.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Partition {
    pub updates: Vec<WriteEntry>,
    pub creates: Vec<WriteEntry>,
    pub dropped: usize,
}

impl Partition {
    /// Split records into updates and creates, preserving input order
    /// within each group.
    ///
    /// An update without fields sends an empty field map.
    pub fn from_records(records: &[UpsertRecord]) -> Self {
        let mut partition = Self::default();

        for record in records {
            match (record.target_id(), &record.fields) {
                (Some(id), fields) => partition.updates.push(WriteEntry {
                    id: Some(id.to_string()),
                    fields: fields.clone().unwrap_or_default(),
                }),
                (None, Some(fields)) => partition.creates.push(WriteEntry {
                    id: None,
                    fields: fields.clone(),
                }),
                (None, None) => partition.dropped += 1,
            }
        }

        partition
    }

    /// Batches in send order: all update batches, then all create batches.
    pub fn batches(&self) -> impl Iterator<Item = (UpsertPhase, &[WriteEntry])> {
        self.updates
            .chunks(MAX_BATCH)
            .map(|chunk| (UpsertPhase::Update, chunk))
            .chain(
                self.creates
                    .chunks(MAX_BATCH)
                    .map(|chunk| (UpsertPhase::Create, chunk)),
            )
    }

    /// Number of requests the upsert will issue.
    pub fn batch_count(&self) -> usize {
        self.updates.len().div_ceil(MAX_BATCH) + self.creates.len().div_ceil(MAX_BATCH)
    }

    pub fn is_empty(&self) -> bool {
        self.updates.is_empty() && self.creates.is_empty()
    }
}
