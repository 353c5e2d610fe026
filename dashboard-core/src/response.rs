use reqwest::{Response, StatusCode};
use serde_json::{Map, Value};
use tracing::error;

use crate::error::{ClientError, ClientResult};

/// A decoded provider response: a JSON object, otherwise untouched.
pub type Payload = Map<String, Value>;

/// Validate an HTTP response and decode its body, or fail with `ClientError`.
///
/// Every provider request funnels through here so failures look the same no
/// matter which service produced them.
pub async fn handle_response(res: Response) -> ClientResult<Payload> {
    let status = res.status();
    let url = res.url().clone();

    let body = res.text().await.map_err(|err| {
        error!(%url, error = %err, "Failed to read response body");
        ClientError::from(err)
    })?;

    decode_payload(status, &body).inspect_err(|err| {
        error!(%url, %status, error = %err, "API request failed");
    })
}

/// Status check and JSON decoding, split from [`handle_response`] so it does
/// not need a live connection.
pub fn decode_payload(status: StatusCode, body: &str) -> ClientResult<Payload> {
    if !status.is_success() {
        return Err(ClientError::new(format!(
            "Request failed with status {status}: {}",
            truncate_body(body),
        )));
    }

    let value: Value = serde_json::from_str(body).map_err(|err| {
        ClientError::with_source(format!("Malformed response body: {err}"), err)
    })?;

    match value {
        Value::Object(map) => Ok(map),
        other => Err(ClientError::new(format!(
            "Malformed response body: expected a JSON object, got {}",
            json_kind(&other)
        ))),
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    match body.char_indices().nth(MAX) {
        Some((idx, _)) => format!("{}...", &body[..idx]),
        None => body.to_string(),
    }
}
