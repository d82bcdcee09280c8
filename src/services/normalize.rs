//! Reply normalization for the free-text fallback.
//!
//! DESIGN
//! ======
//! Three pure steps turn a model's raw text into a [`SummaryResponse`]:
//!
//! 1. `strip_code_fences` removes a surrounding markdown fence
//!    (```` ```json ```` or ```` ``` ````).
//! 2. `parse_reply` decodes JSON, keeping a short preview of the text on
//!    failure.
//! 3. `lenient_decode` reads each known field with a fixed default: missing
//!    or `null` collections become empty, a missing summary becomes `""`.
//!    Present-but-mistyped fields are errors.

use serde_json::{Map, Value};

use crate::models::{ActionItemsByRole, Milestone, ROLE_KEYS, SummaryResponse};

/// Maximum characters of reply text kept in a parse error.
pub const PREVIEW_CHARS: usize = 200;

#[derive(Debug, thiserror::Error)]
pub enum ResponseParseError {
    #[error("invalid JSON response: {source} (response preview: {preview})")]
    InvalidJson {
        #[source]
        source: serde_json::Error,
        preview: String,
    },
    #[error("failed to convert response: {reason}")]
    Conversion { reason: String, data: Value },
}

impl crate::error::ErrorCode for ResponseParseError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::InvalidJson { .. } => "E_RESPONSE_JSON",
            Self::Conversion { .. } => "E_RESPONSE_CONVERSION",
        }
    }
}

// =============================================================================
// SANITIZE + PARSE
// =============================================================================

/// Trim whitespace and a surrounding markdown code fence.
#[must_use]
pub fn strip_code_fences(text: &str) -> &str {
    let mut text = text.trim();
    if let Some(rest) = text.strip_prefix("```json") {
        text = rest;
    } else if let Some(rest) = text.strip_prefix("```") {
        text = rest;
    }
    if let Some(rest) = text.strip_suffix("```") {
        text = rest;
    }
    text.trim()
}

/// First [`PREVIEW_CHARS`] characters of `text`.
#[must_use]
pub fn preview(text: &str) -> String {
    text.chars().take(PREVIEW_CHARS).collect()
}

/// Strip fences from `raw` and parse the remainder as JSON.
///
/// # Errors
///
/// Returns [`ResponseParseError::InvalidJson`] when the sanitized text is not
/// valid JSON, including when it is empty.
pub fn parse_reply(raw: &str) -> Result<Value, ResponseParseError> {
    let text = strip_code_fences(raw);
    serde_json::from_str(text).map_err(|source| ResponseParseError::InvalidJson { source, preview: preview(text) })
}

// =============================================================================
// LENIENT DECODE
// =============================================================================

/// Map a parsed reply onto [`SummaryResponse`], defaulting absent fields.
///
/// # Errors
///
/// Returns [`ResponseParseError::Conversion`] carrying `data` when a present
/// field has the wrong shape.
pub fn lenient_decode(data: Value) -> Result<SummaryResponse, ResponseParseError> {
    match decode_fields(&data) {
        Ok(response) => Ok(response),
        Err(reason) => Err(ResponseParseError::Conversion { reason, data }),
    }
}

fn decode_fields(data: &Value) -> Result<SummaryResponse, String> {
    let Some(root) = data.as_object() else {
        return Err(format!("expected a JSON object, got {}", kind(data)));
    };

    let summary = match present(root, "summary") {
        None => String::new(),
        Some(Value::String(s)) => s.clone(),
        Some(other) => return Err(format!("summary: expected string, got {}", kind(other))),
    };

    let milestones = match present(root, "milestones") {
        None => Vec::new(),
        Some(Value::Array(items)) => items
            .iter()
            .enumerate()
            .map(|(i, item)| decode_milestone(i, item))
            .collect::<Result<Vec<_>, _>>()?,
        Some(other) => return Err(format!("milestones: expected array, got {}", kind(other))),
    };

    let action_items_by_role =
        match present(root, "actionItemsByRole").or_else(|| present(root, "action_items_by_role")) {
            None => ActionItemsByRole::default(),
            Some(Value::Object(roles)) => decode_roles(roles)?,
            Some(other) => return Err(format!("actionItemsByRole: expected object, got {}", kind(other))),
        };

    Ok(SummaryResponse { summary, milestones, action_items_by_role })
}

fn decode_milestone(index: usize, item: &Value) -> Result<Milestone, String> {
    let Some(obj) = item.as_object() else {
        return Err(format!("milestones[{index}]: expected object, got {}", kind(item)));
    };
    let field = |name: &str| match obj.get(name) {
        Some(Value::String(s)) => Ok(s.clone()),
        Some(other) => Err(format!("milestones[{index}].{name}: expected string, got {}", kind(other))),
        None => Err(format!("milestones[{index}]: missing field '{name}'")),
    };
    Ok(Milestone { task: field("task")?, deadline: field("deadline")? })
}

fn decode_roles(roles: &Map<String, Value>) -> Result<ActionItemsByRole, String> {
    let mut out = ActionItemsByRole::default();
    for key in ROLE_KEYS {
        let items = match present(roles, key) {
            None => continue,
            Some(Value::Array(items)) => items,
            Some(other) => return Err(format!("actionItemsByRole.{key}: expected array, got {}", kind(other))),
        };
        let Some(slot) = out.role_mut(key) else {
            continue;
        };
        for (i, item) in items.iter().enumerate() {
            match item {
                Value::String(s) => slot.push(s.clone()),
                other => return Err(format!("actionItemsByRole.{key}[{i}]: expected string, got {}", kind(other))),
            }
        }
    }
    Ok(out)
}

/// A field that is present and not `null`.
fn present<'a>(obj: &'a Map<String, Value>, key: &str) -> Option<&'a Value> {
    obj.get(key).filter(|v| !v.is_null())
}

fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
#[path = "normalize_test.rs"]
mod tests;
