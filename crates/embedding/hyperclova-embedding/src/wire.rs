//! Request and response shapes of the embedding API tool endpoint.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{HyperClovaError, Result};

/// `status.code` value of a successful response.
pub const SUCCESS_CODE: &str = "20000";

// Lowercase so they can be used with `HeaderName::from_static`.
pub(crate) const API_KEY_HEADER: &str = "x-ncp-clovastudio-api-key";
pub(crate) const API_GATEWAY_KEY_HEADER: &str = "x-ncp-apigw-api-key";

/// One unit of text to embed; serialized as the request body `{"text": ...}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EmbeddingInput {
    pub text: String,
}

impl From<&str> for EmbeddingInput {
    fn from(text: &str) -> Self {
        Self {
            text: text.to_string(),
        }
    }
}

impl From<String> for EmbeddingInput {
    fn from(text: String) -> Self {
        Self { text }
    }
}

impl From<&String> for EmbeddingInput {
    fn from(text: &String) -> Self {
        Self { text: text.clone() }
    }
}

/// Accepts a JSON string, or an object whose `text` member is a string.
impl TryFrom<Value> for EmbeddingInput {
    type Error = HyperClovaError;

    fn try_from(value: Value) -> Result<Self> {
        match value {
            Value::String(text) => Ok(Self { text }),
            Value::Object(mut map) => match map.remove("text") {
                Some(Value::String(text)) => Ok(Self { text }),
                _ => Err(HyperClovaError::InvalidInput(
                    "object input must have a string 'text' key".to_string(),
                )),
            },
            other => Err(HyperClovaError::InvalidInput(format!(
                "input should be a string or an object with a 'text' key, got {}",
                json_kind(&other)
            ))),
        }
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[derive(Debug, Deserialize)]
struct EmbeddingResponse {
    result: EmbeddingResult,
}

#[derive(Debug, Deserialize)]
struct EmbeddingResult {
    embedding: Vec<f32>,
}

/// Parses a full response body into the embedding vector.
///
/// Success is decided solely by `status.code == "20000"`; the HTTP status is not consulted.
pub(crate) fn parse_embedding_response(body: &str) -> Result<Vec<f32>> {
    let decode_error = |source| HyperClovaError::Decode {
        source,
        body: body.to_string(),
    };

    let value: Value = serde_json::from_str(body).map_err(decode_error)?;

    let code = value.pointer("/status/code").and_then(Value::as_str);
    if code != Some(SUCCESS_CODE) {
        return Err(HyperClovaError::Provider {
            code: code.map(str::to_string),
            body: body.to_string(),
        });
    }

    let response: EmbeddingResponse = serde_json::from_value(value).map_err(decode_error)?;
    Ok(response.result.embedding)
}
