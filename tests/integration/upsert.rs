//! Upsert batching scenarios.

use super::common::{client, records_body};
use busbar_at_api::rest::UpsertPhase;
use busbar_at_api::{UpsertRecord, UpsertRequest};
use serde_json::{json, Map, Value};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, Request, Respond, ResponseTemplate};

fn fields(i: usize) -> Map<String, Value> {
    let mut map = Map::new();
    map.insert("Index".into(), json!(i));
    map
}

/// Echo back the records of the write batch, assigning ids to creates.
struct EchoBatch;

impl Respond for EchoBatch {
    fn respond(&self, request: &Request) -> ResponseTemplate {
        let body: Value = serde_json::from_slice(&request.body).unwrap_or(Value::Null);
        let records: Vec<Value> = body["records"]
            .as_array()
            .cloned()
            .unwrap_or_default()
            .into_iter()
            .enumerate()
            .map(|(i, mut record)| {
                if record.get("id").is_none() {
                    record["id"] = json!(format!("recNEW{i}"));
                }
                record
            })
            .collect();
        ResponseTemplate::new(200).set_body_json(json!({"records": records}))
    }
}

fn mixed_records(updates: usize, creates: usize) -> Vec<UpsertRecord> {
    let mut records: Vec<UpsertRecord> = (0..updates)
        .map(|i| UpsertRecord::update(format!("rec{i}"), fields(i)))
        .collect();
    records.extend((0..creates).map(|i| UpsertRecord::create(fields(100 + i))));
    records
}

#[tokio::test]
async fn test_upsert_mixed_batches_in_order() {
    let server = MockServer::start().await;

    Mock::given(path("/v0/B/T"))
        .respond_with(EchoBatch)
        .expect(3)
        .mount(&server)
        .await;

    let data = client(&server)
        .upsert(&UpsertRequest::new("B", "T", mixed_records(12, 3)))
        .await
        .expect("upsert should succeed");

    assert_eq!(data.patched.len(), 12);
    assert_eq!(data.created.len(), 3);
    assert_eq!(data.patched[11].id.as_deref(), Some("rec11"));
    assert_eq!(data.created[0].field("Index"), Some(&json!(100)));

    let requests = server.received_requests().await.expect("recording enabled");
    let shape: Vec<(String, usize)> = requests
        .iter()
        .map(|r| {
            let body: Value = serde_json::from_slice(&r.body).unwrap_or(Value::Null);
            let count = body["records"].as_array().map(Vec::len).unwrap_or(0);
            (r.method.to_string(), count)
        })
        .collect();
    assert_eq!(
        shape,
        vec![
            ("PATCH".to_string(), 10),
            ("PATCH".to_string(), 2),
            ("POST".to_string(), 3)
        ]
    );
}

#[tokio::test]
async fn test_upsert_second_patch_fails_and_creates_are_skipped() {
    let server = MockServer::start().await;

    Mock::given(method("PATCH"))
        .respond_with(ResponseTemplate::new(200).set_body_json(records_body(0..10, None)))
        .up_to_n_times(1)
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("PATCH"))
        .respond_with(ResponseTemplate::new(422).set_body_json(json!({
            "error": {"type": "INVALID_RECORDS", "message": "Record rec11 does not exist"}
        })))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .respond_with(EchoBatch)
        .expect(0)
        .mount(&server)
        .await;

    let err = client(&server)
        .upsert(&UpsertRequest::new("B", "T", mixed_records(12, 3)))
        .await
        .expect_err("second batch should fail");

    assert_eq!(err.status(), Some(422));
    assert_eq!(
        err.to_string(),
        "airtable: upsert failed - Record rec11 does not exist"
    );
    assert_eq!(
        err.body().and_then(|b| b["error"]["type"].as_str()),
        Some("INVALID_RECORDS")
    );

    let progress = err.progress().expect("upsert failures carry progress");
    assert_eq!(progress.patched, 10);
    assert_eq!(progress.created, 0);
    assert_eq!(progress.batches_sent, 1);
    assert_eq!(progress.failed_phase, Some(UpsertPhase::Update));
}

#[tokio::test]
async fn test_upsert_drops_entries_without_id_or_fields() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(EchoBatch)
        .expect(1)
        .mount(&server)
        .await;

    let records = vec![
        UpsertRecord::default(),
        UpsertRecord::create(fields(1)),
        UpsertRecord {
            id: Some(String::new()),
            fields: None,
        },
    ];
    let data = client(&server)
        .upsert(&UpsertRequest::new("B", "T", records))
        .await
        .expect("upsert should succeed");

    assert!(data.patched.is_empty());
    assert_eq!(data.created.len(), 1);
    assert_eq!(data.dropped, 2);
}
