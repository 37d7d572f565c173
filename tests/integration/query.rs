//! Query pagination scenarios.

use super::common::{client, records_body};
use busbar_at_api::QueryRequest;
use serde_json::json;
use wiremock::matchers::{method, path, query_param, query_param_is_missing};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[tokio::test]
async fn test_query_two_pages_up_to_cap() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v0/B/T"))
        .and(query_param("maxRecords", "15"))
        .and(query_param_is_missing("offset"))
        .respond_with(ResponseTemplate::new(200).set_body_json(records_body(0..10, Some("X"))))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/v0/B/T"))
        .and(query_param("maxRecords", "5"))
        .and(query_param("offset", "X"))
        .respond_with(ResponseTemplate::new(200).set_body_json(records_body(10..15, None)))
        .expect(1)
        .mount(&server)
        .await;

    let data = client(&server)
        .query(&QueryRequest::new("B", "T").max_records(15))
        .await
        .expect("query should succeed");

    assert_eq!(data.records.len(), 15);
    assert!(data.offset.is_none());
    for (i, record) in data.records.iter().enumerate() {
        assert_eq!(record.id.as_deref(), Some(format!("rec{i}").as_str()));
    }
}

#[tokio::test]
async fn test_query_single_request_without_offset() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v0/B/T"))
        .respond_with(ResponseTemplate::new(200).set_body_json(records_body(0..4, None)))
        .expect(1)
        .mount(&server)
        .await;

    let data = client(&server)
        .query(&QueryRequest::new("B", "T").max_records(500))
        .await
        .expect("query should succeed");
    assert_eq!(data.records.len(), 4);
}

#[tokio::test]
async fn test_query_zero_cap_issues_one_request() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v0/B/T"))
        .respond_with(ResponseTemplate::new(200).set_body_json(records_body(0..10, Some("more"))))
        .expect(1)
        .mount(&server)
        .await;

    let data = client(&server)
        .query(&QueryRequest::new("B", "T").max_records(0))
        .await
        .expect("query should succeed");

    assert_eq!(data.records.len(), 10);
    assert_eq!(data.offset.as_deref(), Some("more"));
}

#[tokio::test]
async fn test_query_page_size_is_clamped() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v0/B/T"))
        .and(query_param("pageSize", "100"))
        .respond_with(ResponseTemplate::new(200).set_body_json(records_body(0..1, None)))
        .expect(1)
        .mount(&server)
        .await;

    client(&server)
        .query(&QueryRequest::new("B", "T").page_size(1000))
        .await
        .expect("query should succeed");
}

#[tokio::test]
async fn test_query_formula_and_table_encoding() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v0/appB/Open%20Tasks"))
        .and(query_param("filterByFormula", "AND({Owner} = 'Kim', NOT({Done}))"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"records": []})))
        .expect(1)
        .mount(&server)
        .await;

    let data = client(&server)
        .query(
            &QueryRequest::new("appB", "Open Tasks")
                .filter_by_formula("AND({Owner} = 'Kim', NOT({Done}))"),
        )
        .await
        .expect("query should succeed");
    assert!(data.records.is_empty());
}

#[tokio::test]
async fn test_query_is_repeatable() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(query_param_is_missing("offset"))
        .respond_with(ResponseTemplate::new(200).set_body_json(records_body(0..3, Some("p2"))))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(query_param("offset", "p2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(records_body(3..5, None)))
        .mount(&server)
        .await;

    let client = client(&server);
    let request = QueryRequest::new("B", "T");
    let first = client.query(&request).await.expect("first run");
    let second = client.query(&request).await.expect("second run");
    assert_eq!(first, second);
    assert_eq!(first.records.len(), 5);
}

#[tokio::test]
async fn test_query_retries_rate_limit_when_enabled() {
    use busbar_at_api::{AirtableRestClient, ClientConfig, RetryConfig};
    use std::time::Duration;

    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(429).set_body_json(json!({"error": {"type": "RATE_LIMIT_REACHED"}})))
        .up_to_n_times(1)
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(records_body(0..2, None)))
        .expect(1)
        .mount(&server)
        .await;

    let config = ClientConfig::builder()
        .with_retry(RetryConfig {
            max_attempts: 2,
            initial_delay: Duration::from_millis(5),
            rate_limit_wait: Duration::from_millis(5),
            ..Default::default()
        })
        .build();
    let client = AirtableRestClient::with_config(super::common::credentials(&server), config)
        .expect("client should build");

    let data = client
        .query(&QueryRequest::new("B", "T"))
        .await
        .expect("query should succeed after retry");
    assert_eq!(data.records.len(), 2);
}
