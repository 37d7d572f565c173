use tracing::{debug, error, instrument, warn};

use busbar_at_client::{JsonResponse, RequestMethod};

use crate::error::{Error, ErrorKind, Result};
use crate::pagination::{PageState, Paginator};
use crate::query::{Page, QueryData, QueryRequest};

impl super::AirtableRestClient {
    /// Run a formula query, following continuation tokens until the server
    /// has no more pages or `max_records` is reached.
    ///
    /// The first failing page aborts the whole query; records from earlier
    /// pages are discarded.
    ///
    /// # Security
    ///
    /// The formula is evaluated by the server. Quote user-provided values
    /// before interpolating them into `filter_by_formula`.
    #[instrument(
        skip(self, request),
        fields(base_id = %request.base_id, table = %request.table)
    )]
    pub async fn query(&self, request: &QueryRequest) -> Result<QueryData> {
        let mut paginator = Paginator::new(request);

        while paginator.state() == PageState::Fetching {
            let params = paginator.page_params();
            let mut builder =
                self.table_request(RequestMethod::Get, &request.base_id, &request.table, &params)?;
            builder = builder.retry(request.retry);
            if let Some(timeout) = request.timeout {
                builder = builder.timeout(timeout);
            }

            let response = match self.http.json_request(builder).await {
                Ok(response) => response,
                Err(err) => {
                    paginator.fail();
                    error!(error = %err, page = paginator.pages() + 1, "Query request failed");
                    return Err(err.into());
                }
            };

            let page = match decode_page(response) {
                Ok(page) => page,
                Err(err) => {
                    paginator.fail();
                    error!(error = %err, page = paginator.pages() + 1, "Query page rejected");
                    return Err(err);
                }
            };

            if page.skipped > 0 {
                warn!(
                    page = paginator.pages() + 1,
                    skipped = page.skipped,
                    "Skipped list elements that are not records"
                );
            }
            debug!(
                page = paginator.pages() + 1,
                records = page.records.len(),
                has_offset = page.offset.is_some(),
                "Query page received"
            );
            paginator.receive(page);
            paginator.advance();
        }

        debug!(
            pages = paginator.pages(),
            records = paginator.record_count(),
            "Query complete"
        );
        Ok(paginator.finish())
    }
}

/// Turn a list response into a page, or the query error it represents.
fn decode_page(response: JsonResponse) -> Result<Page> {
    let body = match response.json {
        Some(ref body) if !body.is_null() && !response.is_error_status() => body,
        _ => {
            let message = response.error_message();
            return Err(query_failed(response, message));
        }
    };

    Ok(Page::from_body(body))
}

fn query_failed(response: JsonResponse, message: String) -> Error {
    Error::new(ErrorKind::QueryFailed {
        status: Some(response.status),
        message,
        body: response.json,
    })
}
