use busbar_at_api::{AirtableCredentials, AirtableRestClient, ClientConfig, Environment};
use serde_json::{json, Value};
use std::sync::Once;
use wiremock::MockServer;

static TRACING: Once = Once::new();

/// Install a test subscriber once; honours `RUST_LOG`.
pub fn init_tracing() {
    TRACING.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();
    });
}

/// Credentials pointing at the mock server, isolated from the process
/// environment.
pub fn credentials(server: &MockServer) -> AirtableCredentials {
    AirtableCredentials::new()
        .with_env(Environment::empty())
        .with_api_key("patINTEGRATION.test")
        .with_api_base(format!("{}/v0", server.uri()))
}

/// A client for the mock server with transport retries turned off.
pub fn client(server: &MockServer) -> AirtableRestClient {
    init_tracing();
    AirtableRestClient::with_config(
        credentials(server),
        ClientConfig::builder().without_retry().build(),
    )
    .expect("client should build")
}

/// A list/write response body with records `rec<start>..rec<end>`.
pub fn records_body(range: std::ops::Range<usize>, offset: Option<&str>) -> Value {
    let records: Vec<Value> = range
        .map(|i| json!({"id": format!("rec{i}"), "createdTime": "2024-05-01T12:00:00.000Z", "fields": {"Index": i}}))
        .collect();
    match offset {
        Some(offset) => json!({"records": records, "offset": offset}),
        None => json!({"records": records}),
    }
}
