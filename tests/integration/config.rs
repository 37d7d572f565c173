//! Credential resolution and fail-fast behaviour.

use super::common::init_tracing;
use busbar_at_api::{
    AirtableCredentials, AirtableRestClient, Credentials, Environment, QueryRequest, UpsertRecord,
    UpsertRequest,
};
use serde_json::{json, Map};
use wiremock::matchers::any;
use wiremock::{Mock, MockServer, ResponseTemplate};

#[tokio::test]
async fn test_missing_api_key_fails_without_network() {
    init_tracing();
    let server = MockServer::start().await;

    Mock::given(any())
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"records": []})))
        .expect(0)
        .mount(&server)
        .await;

    let creds = AirtableCredentials::new()
        .with_env(Environment::empty())
        .with_api_base(format!("{}/v0", server.uri()));
    let client = AirtableRestClient::new(creds).expect("client should build");

    let query_err = client
        .query(&QueryRequest::new("B", "T"))
        .await
        .expect_err("query needs a key");
    assert!(query_err.to_string().contains("missing apiKey"));

    let upsert_err = client
        .upsert(&UpsertRequest::new(
            "B",
            "T",
            vec![UpsertRecord::create(Map::new())],
        ))
        .await
        .expect_err("upsert needs a key");
    assert!(upsert_err.to_string().contains("missing apiKey"));
}

#[tokio::test]
async fn test_environment_fallback_supplies_key_and_base() {
    init_tracing();
    let server = MockServer::start().await;

    Mock::given(any())
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"records": []})))
        .expect(1)
        .mount(&server)
        .await;

    let env = Environment::from_pairs([
        ("AIRTABLE_KEY", "patFROMENV.value".to_string()),
        ("AIRTABLE_API", format!("{}/v0/", server.uri())),
    ]);
    let creds = AirtableCredentials::new().with_env(env);
    assert_eq!(creds.api_base(), format!("{}/v0", server.uri()));

    let client = AirtableRestClient::new(creds).expect("client should build");
    client
        .query(&QueryRequest::new("B", "T"))
        .await
        .expect("query should succeed");

    let requests = server.received_requests().await.expect("recording enabled");
    assert_eq!(
        requests[0]
            .headers
            .get("authorization")
            .and_then(|v| v.to_str().ok()),
        Some("Bearer patFROMENV.value")
    );
}

#[tokio::test]
async fn test_configure_after_construction() {
    init_tracing();
    let server = MockServer::start().await;

    Mock::given(any())
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"records": []})))
        .expect(1)
        .mount(&server)
        .await;

    let mut client =
        AirtableRestClient::new(AirtableCredentials::new().with_env(Environment::empty()))
            .expect("client should build");

    // Non-objects and ill-typed members are ignored.
    client.configure(&json!("not an object"));
    client.configure(&json!({"apiKey": 42}));
    assert!(!client.credentials().is_valid());

    client.configure(&json!({"apiKey": "patLATE.key", "api": format!("{}/v0", server.uri())}));
    client
        .query(&QueryRequest::new("B", "T"))
        .await
        .expect("query should succeed once configured");
}
