//! HTTP response handling and Airtable error envelope parsing.

use serde_json::Value;
use std::sync::LazyLock;
use std::time::Duration;

use crate::error::Result;

/// Wrapper around an HTTP response.
#[derive(Debug)]
pub struct Response {
    inner: reqwest::Response,
}

impl Response {
    pub(crate) fn new(inner: reqwest::Response) -> Self {
        Self { inner }
    }

    /// Get the HTTP status code.
    pub fn status(&self) -> u16 {
        self.inner.status().as_u16()
    }

    /// Returns true if the response status is successful (2xx).
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status())
    }

    /// Get a header value.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.inner.headers().get(name)?.to_str().ok()
    }

    /// Get the Retry-After header as a Duration.
    ///
    /// Only the delay-seconds form is understood.
    pub fn retry_after(&self) -> Option<Duration> {
        self.header("retry-after")?
            .trim()
            .parse::<u64>()
            .ok()
            .map(Duration::from_secs)
    }

    /// Get the response body as text.
    pub async fn text(self) -> Result<String> {
        self.inner.text().await.map_err(Into::into)
    }

    /// Read the body into a [`JsonResponse`].
    ///
    /// A body that is empty or not valid JSON becomes `json: None`; the
    /// status is always preserved.
    pub async fn into_json_response(self) -> Result<JsonResponse> {
        let status = self.status();
        let text = self.text().await?;
        let json = if text.trim().is_empty() {
            None
        } else {
            serde_json::from_str(&text).ok()
        };
        Ok(JsonResponse { status, json })
    }
}

/// A status code paired with the parsed JSON body, if any.
#[derive(Debug, Clone, PartialEq)]
pub struct JsonResponse {
    /// HTTP status code.
    pub status: u16,
    /// Parsed body, `None` when empty or unparseable.
    pub json: Option<Value>,
}

impl JsonResponse {
    /// Returns true for statuses of 400 and above.
    pub fn is_error_status(&self) -> bool {
        self.status >= 400
    }

    /// Human-readable failure message for this response.
    pub fn error_message(&self) -> String {
        error_message(self.json.as_ref(), Some(self.status))
    }
}

/// Extract a human-readable message from an Airtable error envelope.
///
/// Airtable reports errors either as `{"error": {"type": ..., "message": ...}}`
/// or as `{"error": "NOT_FOUND"}`. When no envelope is present the message
/// falls back to `status <code>`.
pub fn error_message(body: Option<&Value>, status: Option<u16>) -> String {
    let envelope = body.and_then(|b| b.get("error"));
    let message = match envelope {
        None | Some(Value::Null) | Some(Value::Bool(false)) => None,
        Some(Value::String(s)) if s.is_empty() => None,
        Some(Value::String(s)) => Some(s.clone()),
        Some(Value::Object(map)) => Some(
            ["message", "type"]
                .iter()
                .find_map(|key| map.get(*key).and_then(Value::as_str).filter(|s| !s.is_empty()))
                .unwrap_or("error")
                .to_string(),
        ),
        Some(_) => Some("error".to_string()),
    };

    match message {
        Some(message) => sanitize_error_message(&message),
        None => match status {
            Some(status) if status != 0 => format!("status {status}"),
            _ => "status unknown".to_string(),
        },
    }
}

static TOKEN_PATTERN: LazyLock<regex_lite::Regex> = LazyLock::new(|| {
    regex_lite::Regex::new(r"pat[A-Za-z0-9]{14}\.[A-Za-z0-9]{16,}").expect("valid token pattern")
});

static LEGACY_KEY_PATTERN: LazyLock<regex_lite::Regex> = LazyLock::new(|| {
    regex_lite::Regex::new(r"\bkey[A-Za-z0-9]{14}\b").expect("valid key pattern")
});

/// Sanitize an error message to prevent exposing credentials.
///
/// Personal access tokens and legacy API keys are redacted and messages
/// longer than 500 bytes are truncated.
fn sanitize_error_message(message: &str) -> String {
    const MAX_LENGTH: usize = 500;

    let sanitized = TOKEN_PATTERN.replace_all(message, "[REDACTED_TOKEN]");
    let mut sanitized = LEGACY_KEY_PATTERN
        .replace_all(&sanitized, "[REDACTED_KEY]")
        .to_string();

    if sanitized.len() > MAX_LENGTH {
        let mut cut = MAX_LENGTH;
        while !sanitized.is_char_boundary(cut) {
            cut -= 1;
        }
        sanitized.truncate(cut);
        sanitized.push_str("...[truncated]");
    }

    sanitized
}
