//! Google Generative Language API client.
//!
//! Thin wrapper over `models/{model}:generateContent`. Structured calls send a
//! `responseSchema`, which only accepts an `OpenAPI` subset of JSON Schema, so
//! the shared schema is pruned first. Pure parsing in `parse_response`.

use serde::Serialize;
use serde_json::Value;
use std::time::Duration;
use tracing::warn;

use super::config::{GeminiConfig, LlmTimeouts};
use super::types::{LlmError, Message, OutputSchema};

/// Schema keywords `generateContent` rejects.
const UNSUPPORTED_SCHEMA_KEYS: &[&str] = &["additionalProperties", "default", "$schema"];

// =============================================================================
// CLIENT
// =============================================================================

pub struct GeminiClient {
    http: reqwest::Client,
    api_key: String,
    base_url: String,
}

impl GeminiClient {
    pub fn new(config: &GeminiConfig, timeouts: LlmTimeouts) -> Result<Self, LlmError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeouts.request_secs))
            .connect_timeout(Duration::from_secs(timeouts.connect_secs))
            .build()
            .map_err(|e| LlmError::HttpClientBuild(e.to_string()))?;
        Ok(Self { http, api_key: config.api_key.clone(), base_url: config.base_url.clone() })
    }

    /// Send `messages` and return the reply text.
    pub async fn complete(
        &self,
        model: &str,
        temperature: f32,
        messages: &[Message],
        schema: Option<&OutputSchema>,
    ) -> Result<String, LlmError> {
        let body = build_request(temperature, messages, schema);
        let url = format!("{}/models/{}:generateContent", self.base_url, model);

        let response = self
            .http
            .post(url)
            .header("x-goog-api-key", &self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| LlmError::ApiRequest(e.to_string()))?;

        let status = response.status().as_u16();
        let text = response
            .text()
            .await
            .map_err(|e| LlmError::ApiRequest(e.to_string()))?;

        if status != 200 {
            return Err(LlmError::ApiResponse { status, body: text });
        }

        parse_response(&text)
    }
}

// =============================================================================
// WIRE TYPES
// =============================================================================

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ApiRequest {
    contents: Vec<ApiContent>,
    generation_config: GenerationConfig,
}

#[derive(Serialize)]
struct ApiContent {
    role: &'static str,
    parts: Vec<ApiPart>,
}

#[derive(Serialize)]
struct ApiPart {
    text: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    temperature: f32,
    #[serde(skip_serializing_if = "Option::is_none")]
    response_mime_type: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    response_schema: Option<Value>,
}

fn build_request(temperature: f32, messages: &[Message], schema: Option<&OutputSchema>) -> ApiRequest {
    let contents = messages
        .iter()
        .map(|m| ApiContent {
            role: if m.role == "assistant" { "model" } else { "user" },
            parts: vec![ApiPart { text: m.content.clone() }],
        })
        .collect();

    ApiRequest {
        contents,
        generation_config: GenerationConfig {
            temperature,
            response_mime_type: schema.map(|_| "application/json"),
            response_schema: schema.map(|s| prune_schema(&s.schema)),
        },
    }
}

/// Recursively drop keywords the Gemini schema dialect does not accept.
fn prune_schema(schema: &Value) -> Value {
    match schema {
        Value::Object(map) => Value::Object(
            map.iter()
                .filter(|(key, _)| !UNSUPPORTED_SCHEMA_KEYS.contains(&key.as_str()))
                .map(|(key, value)| (key.clone(), prune_schema(value)))
                .collect(),
        ),
        Value::Array(items) => Value::Array(items.iter().map(prune_schema).collect()),
        other => other.clone(),
    }
}

// =============================================================================
// PARSING
// =============================================================================

fn parse_response(json: &str) -> Result<String, LlmError> {
    let root: Value = serde_json::from_str(json).map_err(|e| LlmError::ApiParse(e.to_string()))?;

    let Some(candidate) = root
        .get("candidates")
        .and_then(Value::as_array)
        .and_then(|arr| arr.first())
    else {
        let reason = root
            .get("promptFeedback")
            .and_then(|f| f.get("blockReason"))
            .and_then(Value::as_str)
            .unwrap_or("no candidates");
        return Err(LlmError::ApiParse(format!("gemini: prompt blocked: {reason}")));
    };

    let text: String = candidate
        .get("content")
        .and_then(|c| c.get("parts"))
        .and_then(Value::as_array)
        .map(|parts| {
            parts
                .iter()
                .filter_map(|p| p.get("text").and_then(Value::as_str))
                .collect()
        })
        .unwrap_or_default();

    if text.is_empty() {
        let finish = candidate
            .get("finishReason")
            .and_then(Value::as_str)
            .unwrap_or("unknown");
        warn!(finish_reason = finish, "gemini: candidate has no text");
    }
    Ok(text)
}

#[cfg(test)]
#[path = "gemini_test.rs"]
mod tests;
