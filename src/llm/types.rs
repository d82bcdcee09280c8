//! LLM types — provider-neutral messages, schemas and errors.
//!
//! Shared by the `OpenAI` and Gemini clients and by every caller that talks
//! to a provider through [`LlmChat`].

use serde::{Deserialize, Serialize};

use super::config::ProviderKind;

// =============================================================================
// ERROR
// =============================================================================

/// Errors produced by LLM client construction and calls.
#[derive(Debug, thiserror::Error)]
pub enum LlmError {
    /// A configuration value could not be parsed.
    #[error("config parse failed: {0}")]
    ConfigParse(String),

    /// The provider identifier is not one of the supported providers.
    #[error("unsupported provider: {0}")]
    UnsupportedProvider(String),

    /// The provider's API key is not configured.
    #[error("missing API key: env var {var} not set")]
    MissingApiKey { var: String },

    /// Building the client for a provider failed. Never cached.
    #[error("failed to initialize {provider} client: {source}")]
    ProviderInit {
        provider: ProviderKind,
        #[source]
        source: Box<LlmError>,
    },

    /// The HTTP request to the LLM provider failed.
    #[error("API request failed: {0}")]
    ApiRequest(String),

    /// The LLM provider returned a non-success HTTP status.
    #[error("API response error: status {status}")]
    ApiResponse { status: u16, body: String },

    /// The LLM provider response body could not be interpreted.
    #[error("API response parse failed: {0}")]
    ApiParse(String),

    /// The underlying HTTP client could not be constructed.
    #[error("HTTP client build failed: {0}")]
    HttpClientBuild(String),
}

impl crate::error::ErrorCode for LlmError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::ConfigParse(_) => "E_CONFIG_PARSE",
            Self::UnsupportedProvider(_) => "E_UNSUPPORTED_PROVIDER",
            Self::MissingApiKey { .. } => "E_MISSING_API_KEY",
            Self::ProviderInit { .. } => "E_PROVIDER_INIT",
            Self::ApiRequest(_) => "E_API_REQUEST",
            Self::ApiResponse { .. } => "E_API_RESPONSE",
            Self::ApiParse(_) => "E_API_PARSE",
            Self::HttpClientBuild(_) => "E_HTTP_CLIENT_BUILD",
        }
    }

    fn retryable(&self) -> bool {
        matches!(self, Self::ApiRequest(_) | Self::ApiResponse { status: 429 | 500..=599, .. })
    }
}

// =============================================================================
// MESSAGES
// =============================================================================

/// A single chat message. The summary flow only ever sends one user turn.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub role: String,
    pub content: String,
}

impl Message {
    #[must_use]
    pub fn user(content: impl Into<String>) -> Self {
        Self { role: "user".into(), content: content.into() }
    }
}

// =============================================================================
// OUTPUT SCHEMA
// =============================================================================

/// A named JSON schema the provider must constrain its reply to.
#[derive(Debug, Clone, PartialEq)]
pub struct OutputSchema {
    pub name: String,
    pub schema: serde_json::Value,
}

// =============================================================================
// LLM CHAT TRAIT
// =============================================================================

/// Provider-neutral async trait for LLM calls. Enables mocking in tests.
#[async_trait::async_trait]
pub trait LlmChat: Send + Sync {
    /// Ask the provider for a reply constrained to `schema` and return it as
    /// parsed JSON.
    ///
    /// # Errors
    ///
    /// Returns an [`LlmError`] if the request fails or the reply is not JSON.
    async fn complete_structured(
        &self,
        messages: &[Message],
        schema: &OutputSchema,
    ) -> Result<serde_json::Value, LlmError>;

    /// Ask the provider for a free-text reply. An empty reply is `Ok("")`.
    ///
    /// # Errors
    ///
    /// Returns an [`LlmError`] if the request fails, the model refuses, or the
    /// response body is malformed.
    async fn complete_text(&self, messages: &[Message]) -> Result<String, LlmError>;
}

#[cfg(test)]
#[path = "types_test.rs"]
mod tests;
