//! Summary service — transcript → prompt → LLM → `SummaryResponse`.
//!
//! DESIGN
//! ======
//! Each call runs a two-tier pipeline against one provider client:
//!
//! 1. Structured tier: the provider is asked to fill the summary schema
//!    directly and its JSON is decoded strictly. Any failure here (provider
//!    error, non-JSON, schema mismatch) hands over to the next tier.
//! 2. Text tier: the same prompt is sent as a plain chat call and the reply
//!    goes through `normalize` (fence strip, JSON parse, lenient decode).
//!    Failure here is terminal for the request.
//!
//! No other retries happen. Both tiers produce the same `SummaryResponse`.

use std::sync::Arc;

use tracing::{error, info, warn};

use super::normalize::{self, ResponseParseError};
use crate::error::ErrorCode;
use crate::llm::LlmChat;
use crate::llm::config::ProviderKind;
use crate::llm::registry::ProviderRegistry;
use crate::llm::types::{LlmError, Message};
use crate::models::{SummaryRequest, SummaryResponse, summary_output_schema};
use crate::prompts::{PromptError, PromptStore};

/// Template name used for every summary prompt.
pub const SUMMARY_PROMPT: &str = "meeting_summary";

// =============================================================================
// TYPES
// =============================================================================

#[derive(Debug, thiserror::Error)]
pub enum SummaryError {
    #[error("invalid request: {0}")]
    InvalidRequest(String),
    #[error("unsupported provider: {0}")]
    UnsupportedProvider(String),
    #[error(transparent)]
    Prompt(#[from] PromptError),
    #[error(transparent)]
    Provider(#[from] LlmError),
    #[error(transparent)]
    Parse(#[from] ResponseParseError),
}

impl ErrorCode for SummaryError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::InvalidRequest(_) => "E_INVALID_REQUEST",
            Self::UnsupportedProvider(_) => "E_UNSUPPORTED_PROVIDER",
            Self::Prompt(e) => e.error_code(),
            Self::Provider(e) => e.error_code(),
            Self::Parse(e) => e.error_code(),
        }
    }

    fn retryable(&self) -> bool {
        matches!(self, Self::Provider(e) if e.retryable())
    }
}

/// Result of the structured tier.
#[derive(Debug)]
pub(crate) enum StructuredOutcome {
    /// The provider's structured reply decoded cleanly.
    Decoded(SummaryResponse),
    /// The tier failed; the reason is logged and the text tier runs next.
    Fallback(String),
}

// =============================================================================
// SERVICE
// =============================================================================

pub struct SummaryService {
    prompts: Arc<PromptStore>,
    providers: Arc<ProviderRegistry>,
    default_provider: ProviderKind,
}

impl SummaryService {
    #[must_use]
    pub fn new(prompts: Arc<PromptStore>, providers: Arc<ProviderRegistry>, default_provider: ProviderKind) -> Self {
        Self { prompts, providers, default_provider }
    }

    /// Generate a structured summary for `request`.
    ///
    /// # Errors
    ///
    /// - [`SummaryError::InvalidRequest`] for blank `meeting_content`
    /// - [`SummaryError::UnsupportedProvider`] for an unknown provider id
    /// - [`SummaryError::Prompt`] when the template cannot be loaded or filled
    /// - [`SummaryError::Provider`] when the client cannot be built or the
    ///   text-tier call fails
    /// - [`SummaryError::Parse`] when the text-tier reply is not recoverable
    pub async fn generate(&self, request: &SummaryRequest) -> Result<SummaryResponse, SummaryError> {
        if request.meeting_content.trim().is_empty() {
            return Err(SummaryError::InvalidRequest("meeting_content must not be empty".into()));
        }
        let provider = self.resolve_provider(request.provider.as_deref())?;
        info!(%provider, content_len = request.meeting_content.len(), "summary: request received");

        let prompt = self
            .prompts
            .format(SUMMARY_PROMPT, &[("meeting_content", request.meeting_content.as_str())])?;
        let client = self.providers.get(provider)?;
        let messages = [Message::user(prompt)];

        match structured_tier(client.as_ref(), &messages).await {
            StructuredOutcome::Decoded(response) => {
                info!(%provider, "summary: structured output succeeded");
                return Ok(response);
            }
            StructuredOutcome::Fallback(reason) => {
                warn!(%provider, error = %reason, "summary: structured output failed, falling back to text parsing");
            }
        }

        let response = text_tier(client.as_ref(), &messages).await?;
        info!(%provider, "summary: text fallback succeeded");
        Ok(response)
    }

    /// The request's provider, or the configured default when absent.
    fn resolve_provider(&self, requested: Option<&str>) -> Result<ProviderKind, SummaryError> {
        match requested {
            None => Ok(self.default_provider),
            Some(raw) => raw
                .parse()
                .map_err(|_| SummaryError::UnsupportedProvider(raw.to_string())),
        }
    }
}

// =============================================================================
// TIERS
// =============================================================================

pub(crate) async fn structured_tier(client: &dyn LlmChat, messages: &[Message]) -> StructuredOutcome {
    let schema = summary_output_schema();
    let value = match client.complete_structured(messages, &schema).await {
        Ok(value) => value,
        Err(e) => return StructuredOutcome::Fallback(e.to_string()),
    };
    match serde_json::from_value::<SummaryResponse>(value) {
        Ok(response) => StructuredOutcome::Decoded(response),
        Err(e) => StructuredOutcome::Fallback(format!("structured reply does not match schema: {e}")),
    }
}

pub(crate) async fn text_tier(client: &dyn LlmChat, messages: &[Message]) -> Result<SummaryResponse, SummaryError> {
    let raw = client.complete_text(messages).await?;

    let data = normalize::parse_reply(&raw).inspect_err(|e| {
        if let ResponseParseError::InvalidJson { preview, .. } = e {
            error!(code = e.error_code(), error = %e, preview = %preview, "summary: JSON parsing failed");
        }
    })?;

    let response = normalize::lenient_decode(data).inspect_err(|e| {
        if let ResponseParseError::Conversion { reason, data } = e {
            let data = normalize::preview(&data.to_string());
            error!(code = e.error_code(), error = %reason, data = %data, "summary: manual conversion failed");
        }
    })?;
    Ok(response)
}

#[cfg(test)]
#[path = "summary_test.rs"]
mod tests;
