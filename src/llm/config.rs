//! LLM configuration parsed from environment variables.

use std::fmt;
use std::str::FromStr;

use super::types::LlmError;

pub const DEFAULT_OPENAI_BASE_URL: &str = "https://api.openai.com/v1";
pub const DEFAULT_GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";
pub const DEFAULT_OPENAI_MODEL: &str = "gpt-5-mini";
pub const DEFAULT_GEMINI_MODEL: &str = "gemini-1.5-flash";
pub const DEFAULT_LLM_REQUEST_TIMEOUT_SECS: u64 = 120;
pub const DEFAULT_LLM_CONNECT_TIMEOUT_SECS: u64 = 10;

pub const OPENAI_API_KEY_VAR: &str = "OPENAI_API_KEY";
pub const GOOGLE_API_KEY_VAR: &str = "GOOGLE_API_KEY";

// =============================================================================
// PROVIDER KIND
// =============================================================================

/// Supported LLM vendors, selectable per request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProviderKind {
    OpenAi,
    Gemini,
}

impl ProviderKind {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::OpenAi => "openai",
            Self::Gemini => "gemini",
        }
    }
}

impl fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ProviderKind {
    type Err = LlmError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw {
            "openai" => Ok(Self::OpenAi),
            "gemini" => Ok(Self::Gemini),
            other => Err(LlmError::UnsupportedProvider(other.to_string())),
        }
    }
}

// =============================================================================
// PROVIDER SETTINGS
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OpenAiApiMode {
    ChatCompletions,
    Responses,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LlmTimeouts {
    pub request_secs: u64,
    pub connect_secs: u64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OpenAiConfig {
    pub api_key: String,
    pub model: String,
    pub base_url: String,
    pub mode: OpenAiApiMode,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeminiConfig {
    pub api_key: String,
    pub model: String,
    pub base_url: String,
}

/// Credentials, models and transport settings for every provider.
///
/// API keys may be empty here: a missing key only fails when that provider's
/// client is first built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LlmSettings {
    pub openai: OpenAiConfig,
    pub gemini: GeminiConfig,
    pub timeouts: LlmTimeouts,
}

impl LlmSettings {
    /// Build provider settings from a key lookup (normally the environment).
    ///
    /// Optional:
    /// - `OPENAI_API_KEY`, `OPENAI_MODEL`, `OPENAI_BASE_URL`
    /// - `OPENAI_API_MODE`: `responses` (default) or `chat_completions`
    /// - `GOOGLE_API_KEY`, `GEMINI_MODEL`, `GEMINI_BASE_URL`
    /// - `LLM_REQUEST_TIMEOUT_SECS`: default 120
    /// - `LLM_CONNECT_TIMEOUT_SECS`: default 10
    ///
    /// # Errors
    ///
    /// Returns [`LlmError::ConfigParse`] for an unknown `OPENAI_API_MODE`.
    pub fn from_lookup(get: &impl Fn(&str) -> Option<String>) -> Result<Self, LlmError> {
        let openai = OpenAiConfig {
            api_key: get(OPENAI_API_KEY_VAR).unwrap_or_default(),
            model: get("OPENAI_MODEL").unwrap_or_else(|| DEFAULT_OPENAI_MODEL.to_string()),
            base_url: base_url(get("OPENAI_BASE_URL"), DEFAULT_OPENAI_BASE_URL),
            mode: parse_openai_mode(get("OPENAI_API_MODE").as_deref())?,
        };
        let gemini = GeminiConfig {
            api_key: get(GOOGLE_API_KEY_VAR).unwrap_or_default(),
            model: get("GEMINI_MODEL").unwrap_or_else(|| DEFAULT_GEMINI_MODEL.to_string()),
            base_url: base_url(get("GEMINI_BASE_URL"), DEFAULT_GEMINI_BASE_URL),
        };
        let timeouts = LlmTimeouts {
            request_secs: parse_u64_or(get("LLM_REQUEST_TIMEOUT_SECS"), DEFAULT_LLM_REQUEST_TIMEOUT_SECS),
            connect_secs: parse_u64_or(get("LLM_CONNECT_TIMEOUT_SECS"), DEFAULT_LLM_CONNECT_TIMEOUT_SECS),
        };

        Ok(Self { openai, gemini, timeouts })
    }
}

fn base_url(raw: Option<String>, default: &str) -> String {
    raw.unwrap_or_else(|| default.to_string())
        .trim_end_matches('/')
        .to_string()
}

fn parse_u64_or(raw: Option<String>, default: u64) -> u64 {
    raw.and_then(|v| v.parse::<u64>().ok())
        .unwrap_or(default)
}

pub(crate) fn parse_openai_mode(raw: Option<&str>) -> Result<OpenAiApiMode, LlmError> {
    match raw.unwrap_or("responses") {
        "responses" => Ok(OpenAiApiMode::Responses),
        "chat_completions" => Ok(OpenAiApiMode::ChatCompletions),
        other => Err(LlmError::ConfigParse(format!(
            "unsupported OPENAI_API_MODE '{other}' (expected 'responses' or 'chat_completions')"
        ))),
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
