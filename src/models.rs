//! Request and response shapes for the summary API.
//!
//! `SummaryResponse` is both the HTTP 200 body and the schema the provider is
//! asked to fill in structured mode, so the serialized field names
//! (`actionItemsByRole`, upper-case role keys) are part of the wire contract.

use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::llm::types::OutputSchema;

/// Name attached to the structured-output schema.
pub const SUMMARY_SCHEMA_NAME: &str = "meeting_summary";

/// The closed set of role keys, in wire order.
pub const ROLE_KEYS: [&str; 6] = ["PM", "PD", "FE", "BE", "AI", "ALL"];

// =============================================================================
// REQUEST
// =============================================================================

/// Body of `POST /api/summary`.
#[derive(Debug, Clone, Deserialize)]
pub struct SummaryRequest {
    /// Meeting transcript text. Must contain non-whitespace characters.
    pub meeting_content: String,
    /// `"openai"` or `"gemini"`; the configured default when absent.
    #[serde(default)]
    pub provider: Option<String>,
}

// =============================================================================
// RESPONSE
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Milestone {
    pub task: String,
    pub deadline: String,
}

/// Action items grouped by team role. Every role defaults to empty.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionItemsByRole {
    /// Project manager.
    #[serde(rename = "PM", default)]
    pub pm: Vec<String>,
    /// Product designer.
    #[serde(rename = "PD", default)]
    pub pd: Vec<String>,
    /// Frontend.
    #[serde(rename = "FE", default)]
    pub fe: Vec<String>,
    /// Backend.
    #[serde(rename = "BE", default)]
    pub be: Vec<String>,
    /// AI engineering.
    #[serde(rename = "AI", default)]
    pub ai: Vec<String>,
    /// Whole team.
    #[serde(rename = "ALL", default)]
    pub all: Vec<String>,
}

impl ActionItemsByRole {
    /// Mutable access to the items of a role key from [`ROLE_KEYS`].
    pub fn role_mut(&mut self, key: &str) -> Option<&mut Vec<String>> {
        match key {
            "PM" => Some(&mut self.pm),
            "PD" => Some(&mut self.pd),
            "FE" => Some(&mut self.fe),
            "BE" => Some(&mut self.be),
            "AI" => Some(&mut self.ai),
            "ALL" => Some(&mut self.all),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SummaryResponse {
    #[serde(default)]
    pub summary: String,
    #[serde(default)]
    pub milestones: Vec<Milestone>,
    #[serde(rename = "actionItemsByRole", alias = "action_items_by_role")]
    pub action_items_by_role: ActionItemsByRole,
}

/// Body of every 4xx/5xx response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
    pub detail: String,
}

// =============================================================================
// STRUCTURED OUTPUT SCHEMA
// =============================================================================

/// Strict JSON schema describing [`SummaryResponse`] on the wire.
#[must_use]
pub fn summary_output_schema() -> OutputSchema {
    let role_properties: serde_json::Map<String, serde_json::Value> = ROLE_KEYS
        .iter()
        .map(|role| ((*role).to_string(), json!({ "type": "array", "items": { "type": "string" } })))
        .collect();

    let schema = json!({
        "type": "object",
        "additionalProperties": false,
        "required": ["summary", "milestones", "actionItemsByRole"],
        "properties": {
            "summary": { "type": "string" },
            "milestones": {
                "type": "array",
                "items": {
                    "type": "object",
                    "additionalProperties": false,
                    "required": ["task", "deadline"],
                    "properties": {
                        "task": { "type": "string" },
                        "deadline": { "type": "string" }
                    }
                }
            },
            "actionItemsByRole": {
                "type": "object",
                "additionalProperties": false,
                "required": ROLE_KEYS,
                "properties": role_properties
            }
        }
    });

    OutputSchema { name: SUMMARY_SCHEMA_NAME.to_string(), schema }
}

#[cfg(test)]
#[path = "models_test.rs"]
mod tests;
