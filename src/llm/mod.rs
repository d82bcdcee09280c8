//! LLM — multi-provider adapter for summary generation.
//!
//! DESIGN
//! ======
//! `LlmClient` dispatches to `OpenAI` or Gemini and implements [`LlmChat`], the
//! seam the summary service depends on. Clients are built lazily, one per
//! provider, by [`registry::ProviderRegistry`].

pub mod config;
pub mod gemini;
pub mod openai;
pub mod registry;
pub mod types;

use config::{LlmSettings, ProviderKind};
pub use types::LlmChat;
use types::{LlmError, Message, OutputSchema};

/// Fixed sampling temperature; structured output should be reproducible.
pub const TEMPERATURE: f32 = 0.0;

// =============================================================================
// CLIENT DISPATCH
// =============================================================================

/// Concrete LLM client bound to one provider and model.
pub struct LlmClient {
    inner: LlmProvider,
    model: String,
}

enum LlmProvider {
    OpenAi(openai::OpenAiClient),
    Gemini(gemini::GeminiClient),
}

impl LlmClient {
    /// Build the client for `provider` from typed settings.
    ///
    /// # Errors
    ///
    /// Returns an error if the provider's API key is empty or the HTTP client
    /// fails to build.
    pub fn for_provider(provider: ProviderKind, settings: &LlmSettings) -> Result<Self, LlmError> {
        match provider {
            ProviderKind::OpenAi => {
                let cfg = &settings.openai;
                require_key(&cfg.api_key, config::OPENAI_API_KEY_VAR)?;
                let client = openai::OpenAiClient::new(cfg, settings.timeouts)?;
                Ok(Self { inner: LlmProvider::OpenAi(client), model: cfg.model.clone() })
            }
            ProviderKind::Gemini => {
                let cfg = &settings.gemini;
                require_key(&cfg.api_key, config::GOOGLE_API_KEY_VAR)?;
                let client = gemini::GeminiClient::new(cfg, settings.timeouts)?;
                Ok(Self { inner: LlmProvider::Gemini(client), model: cfg.model.clone() })
            }
        }
    }

    /// Return the configured model name (e.g. `"gpt-5-mini"`).
    #[must_use]
    pub fn model(&self) -> &str {
        &self.model
    }

    async fn complete(&self, messages: &[Message], schema: Option<&OutputSchema>) -> Result<String, LlmError> {
        match &self.inner {
            LlmProvider::OpenAi(c) => c.complete(&self.model, TEMPERATURE, messages, schema).await,
            LlmProvider::Gemini(c) => c.complete(&self.model, TEMPERATURE, messages, schema).await,
        }
    }
}

fn require_key(key: &str, var: &str) -> Result<(), LlmError> {
    if key.trim().is_empty() {
        return Err(LlmError::MissingApiKey { var: var.to_string() });
    }
    Ok(())
}

/// Parse a structured-mode reply. Empty text is an error here; on the text
/// path it is returned as-is for the caller to judge.
fn decode_structured(text: &str) -> Result<serde_json::Value, LlmError> {
    if text.trim().is_empty() {
        return Err(LlmError::ApiParse("structured reply has no text content".to_string()));
    }
    serde_json::from_str(text).map_err(|e| LlmError::ApiParse(format!("structured reply is not JSON: {e}")))
}

#[async_trait::async_trait]
impl LlmChat for LlmClient {
    async fn complete_structured(
        &self,
        messages: &[Message],
        schema: &OutputSchema,
    ) -> Result<serde_json::Value, LlmError> {
        let text = self.complete(messages, Some(schema)).await?;
        decode_structured(&text)
    }

    async fn complete_text(&self, messages: &[Message]) -> Result<String, LlmError> {
        self.complete(messages, None).await
    }
}
