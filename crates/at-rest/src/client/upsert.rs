use serde_json::Value;
use tracing::{debug, error, instrument, warn};

use busbar_at_auth::Credentials;
use busbar_at_client::JsonResponse;

use crate::error::{Error, ErrorKind, Result};
use crate::types::Record;
use crate::upsert::{
    Partition, UpsertData, UpsertPhase, UpsertProgress, UpsertRequest, WriteBatch, WriteEntry,
};

impl super::AirtableRestClient {
    /// Update and create records in batches of ten.
    ///
    /// All update batches go out first (`PATCH`), then all create batches
    /// (`POST`), one request at a time and never retried. The first batch
    /// that fails ends the run with that batch's error; batches sent before
    /// it stay applied and are described by [`Error::progress`].
    #[instrument(
        skip(self, request),
        fields(base_id = %request.base_id, table = %request.table, records = request.records.len())
    )]
    pub async fn upsert(&self, request: &UpsertRequest) -> Result<UpsertData> {
        self.credentials.require_auth_headers()?;

        let partition = Partition::from_records(&request.records);
        if partition.dropped > 0 {
            warn!(
                dropped = partition.dropped,
                "Skipping upsert entries with neither id nor fields"
            );
        }
        debug!(
            updates = partition.updates.len(),
            creates = partition.creates.len(),
            batches = partition.batch_count(),
            "Upsert partitioned"
        );

        let mut data = UpsertData {
            dropped: partition.dropped,
            ..Default::default()
        };
        if partition.is_empty() {
            debug!("Nothing to upsert");
            return Ok(data);
        }
        let mut progress = UpsertProgress::default();

        for (phase, batch) in partition.batches() {
            let response = match self.send_batch(request, phase, batch).await {
                Ok(response) => response,
                Err(err) => {
                    error!(
                        error = %err,
                        phase = %phase,
                        batches_sent = progress.batches_sent,
                        "Upsert batch request failed"
                    );
                    return Err(err);
                }
            };

            let records = match decode_batch(response) {
                Ok((records, skipped)) => {
                    if skipped > 0 {
                        warn!(phase = %phase, skipped, "Skipped returned elements that are not records");
                    }
                    records
                }
                Err((status, message, body)) => {
                    progress.failed_phase = Some(phase);
                    error!(
                        status,
                        message = %message,
                        phase = %phase,
                        batches_sent = progress.batches_sent,
                        "Upsert batch rejected"
                    );
                    return Err(Error::new(ErrorKind::UpsertFailed {
                        status,
                        message,
                        body,
                        progress,
                    }));
                }
            };

            debug!(phase = %phase, sent = batch.len(), returned = records.len(), "Upsert batch applied");
            progress.record(phase, records.len());
            data.push(phase, records);
        }

        Ok(data)
    }

    async fn send_batch(
        &self,
        request: &UpsertRequest,
        phase: UpsertPhase,
        batch: &[WriteEntry],
    ) -> Result<JsonResponse> {
        let body = WriteBatch {
            records: batch,
            typecast: request.typecast,
        };
        let mut builder = self
            .table_request(phase.method(), &request.base_id, &request.table, &[])?
            .json(&body)?
            .retry(false);
        if let Some(timeout) = request.timeout {
            builder = builder.timeout(timeout);
        }

        Ok(self.http.json_request(builder).await?)
    }
}

type BatchFailure = (Option<u16>, String, Option<Value>);

/// Pull the returned records out of a write response.
///
/// No body or an error status fails the batch, as does a `records` member
/// that is set to anything but an array. An absent or falsy `records` reads
/// as an empty list. Elements that do not decode are skipped and counted.
fn decode_batch(response: JsonResponse) -> std::result::Result<(Vec<Record>, usize), BatchFailure> {
    let decoded = match &response.json {
        Some(body) if !body.is_null() && !response.is_error_status() => {
            match body.get("records") {
                Some(Value::Array(items)) => Some(Record::decode_all(items)),
                Some(records) if is_truthy(records) => None,
                _ => Some((Vec::new(), 0)),
            }
        }
        _ => None,
    };

    decoded.ok_or_else(|| {
        let message = response.error_message();
        (Some(response.status), message, response.json)
    })
}

fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|n| n != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}
