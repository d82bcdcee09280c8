//! OpenAI-compatible API client.
//!
//! Supports both `/v1/chat/completions` and `/v1/responses`. Structured calls
//! attach a strict `json_schema` response format; both endpoints return the
//! reply text, which the caller decodes.

use serde::Serialize;
use serde_json::Value;
use std::time::Duration;

use super::config::{LlmTimeouts, OpenAiApiMode, OpenAiConfig};
use super::types::{LlmError, Message, OutputSchema};

pub struct OpenAiClient {
    http: reqwest::Client,
    api_key: String,
    base_url: String,
    mode: OpenAiApiMode,
}

impl OpenAiClient {
    pub fn new(config: &OpenAiConfig, timeouts: LlmTimeouts) -> Result<Self, LlmError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeouts.request_secs))
            .connect_timeout(Duration::from_secs(timeouts.connect_secs))
            .build()
            .map_err(|e| LlmError::HttpClientBuild(e.to_string()))?;
        Ok(Self {
            http,
            api_key: config.api_key.clone(),
            base_url: config.base_url.clone(),
            mode: config.mode,
        })
    }

    /// Send `messages` and return the reply text.
    pub async fn complete(
        &self,
        model: &str,
        temperature: f32,
        messages: &[Message],
        schema: Option<&OutputSchema>,
    ) -> Result<String, LlmError> {
        match self.mode {
            OpenAiApiMode::ChatCompletions => {
                let body = CcRequest {
                    model,
                    temperature,
                    messages,
                    response_format: schema.map(CcResponseFormat::from),
                };
                let text = self.send_json("/chat/completions", &body).await?;
                parse_chat_completions_response(&text)
            }
            OpenAiApiMode::Responses => {
                let input = build_responses_input(messages);
                let body = RespRequest {
                    model,
                    temperature,
                    input: &input,
                    text: schema.map(|s| RespTextConfig { format: RespFormat::from(s) }),
                };
                let text = self.send_json("/responses", &body).await?;
                parse_responses_response(&text)
            }
        }
    }

    async fn send_json(&self, path: &str, body: &impl Serialize) -> Result<String, LlmError> {
        let url = format!("{}{}", self.base_url, path);
        let response = self
            .http
            .post(url)
            .bearer_auth(&self.api_key)
            .json(body)
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
        Ok(text)
    }
}

// =============================================================================
// CHAT COMPLETIONS — wire types
// =============================================================================

#[derive(Serialize)]
struct CcRequest<'a> {
    model: &'a str,
    temperature: f32,
    messages: &'a [Message],
    #[serde(skip_serializing_if = "Option::is_none")]
    response_format: Option<CcResponseFormat<'a>>,
}

#[derive(Serialize)]
struct CcResponseFormat<'a> {
    #[serde(rename = "type")]
    format_type: &'static str,
    json_schema: CcJsonSchema<'a>,
}

#[derive(Serialize)]
struct CcJsonSchema<'a> {
    name: &'a str,
    schema: &'a Value,
    strict: bool,
}

impl<'a> From<&'a OutputSchema> for CcResponseFormat<'a> {
    fn from(schema: &'a OutputSchema) -> Self {
        Self {
            format_type: "json_schema",
            json_schema: CcJsonSchema { name: &schema.name, schema: &schema.schema, strict: true },
        }
    }
}

// =============================================================================
// RESPONSES — wire types
// =============================================================================

#[derive(Serialize)]
struct RespRequest<'a> {
    model: &'a str,
    temperature: f32,
    input: &'a [RespInputItem],
    #[serde(skip_serializing_if = "Option::is_none")]
    text: Option<RespTextConfig<'a>>,
}

#[derive(Serialize)]
#[serde(tag = "type")]
enum RespInputItem {
    #[serde(rename = "message")]
    Message {
        role: String,
        content: Vec<RespTextContent>,
    },
}

#[derive(Serialize)]
struct RespTextContent {
    #[serde(rename = "type")]
    content_type: &'static str,
    text: String,
}

impl RespTextContent {
    fn input_text(text: String) -> Self {
        Self { content_type: "input_text", text }
    }
}

#[derive(Serialize)]
struct RespTextConfig<'a> {
    format: RespFormat<'a>,
}

#[derive(Serialize)]
struct RespFormat<'a> {
    #[serde(rename = "type")]
    format_type: &'static str,
    name: &'a str,
    schema: &'a Value,
    strict: bool,
}

impl<'a> From<&'a OutputSchema> for RespFormat<'a> {
    fn from(schema: &'a OutputSchema) -> Self {
        Self { format_type: "json_schema", name: &schema.name, schema: &schema.schema, strict: true }
    }
}

fn build_responses_input(messages: &[Message]) -> Vec<RespInputItem> {
    messages
        .iter()
        .map(|message| RespInputItem::Message {
            role: message.role.clone(),
            content: vec![RespTextContent::input_text(message.content.clone())],
        })
        .collect()
}

// =============================================================================
// RESPONSE PARSING
// =============================================================================

pub(crate) fn parse_chat_completions_response(json_text: &str) -> Result<String, LlmError> {
    let root: Value = serde_json::from_str(json_text).map_err(|e| LlmError::ApiParse(e.to_string()))?;

    let Some(message) = root
        .get("choices")
        .and_then(Value::as_array)
        .and_then(|arr| arr.first())
        .and_then(|choice| choice.get("message"))
    else {
        return Err(LlmError::ApiParse("chat_completions: missing choices[0].message".to_string()));
    };

    if let Some(refusal) = message.get("refusal").and_then(Value::as_str) {
        return Err(LlmError::ApiParse(format!("chat_completions: model refused: {refusal}")));
    }

    // Null or missing content is an empty reply, not a wire error.
    Ok(message
        .get("content")
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string())
}

pub(crate) fn parse_responses_response(json_text: &str) -> Result<String, LlmError> {
    let root: Value = serde_json::from_str(json_text).map_err(|e| LlmError::ApiParse(e.to_string()))?;

    let mut text = String::new();
    if let Some(items) = root.get("output").and_then(Value::as_array) {
        for item in items {
            if item.get("type").and_then(Value::as_str) != Some("message") {
                continue;
            }
            let Some(parts) = item.get("content").and_then(Value::as_array) else {
                continue;
            };
            for part in parts {
                match part.get("type").and_then(Value::as_str) {
                    Some("output_text" | "text") => {
                        if let Some(t) = part.get("text").and_then(Value::as_str) {
                            text.push_str(t);
                        }
                    }
                    Some("refusal") => {
                        let reason = part
                            .get("refusal")
                            .and_then(Value::as_str)
                            .unwrap_or("");
                        return Err(LlmError::ApiParse(format!("responses: model refused: {reason}")));
                    }
                    _ => {}
                }
            }
        }
    }
    if text.is_empty() {
        if let Some(output_text) = root.get("output_text").and_then(Value::as_str) {
            text.push_str(output_text);
        }
    }

    Ok(text)
}

#[cfg(test)]
#[path = "openai_test.rs"]
mod tests;
