//! Shared application state.
//!
//! DESIGN
//! ======
//! `AppState` is injected into Axum handlers via the `State` extractor. It
//! holds the immutable settings and the summary service, which owns the two
//! process-wide caches (prompt templates, provider clients).

use std::sync::Arc;

use crate::config::Settings;
use crate::llm::registry::ProviderRegistry;
use crate::prompts::PromptStore;
use crate::services::summary::SummaryService;

/// Shared application state, injected into Axum handlers via State extractor.
/// Clone is required by Axum; all inner fields are Arc-wrapped.
#[derive(Clone)]
pub struct AppState {
    pub settings: Arc<Settings>,
    pub summaries: Arc<SummaryService>,
}

impl AppState {
    #[must_use]
    pub fn new(settings: Arc<Settings>, summaries: Arc<SummaryService>) -> Self {
        Self { settings, summaries }
    }

    /// Wire the production service graph from settings.
    #[must_use]
    pub fn from_settings(settings: Settings) -> Self {
        let prompts = Arc::new(PromptStore::new(settings.prompts_dir.clone()));
        let providers = Arc::new(ProviderRegistry::from_settings(Arc::new(settings.llm.clone())));
        let summaries = Arc::new(SummaryService::new(prompts, providers, settings.default_provider));
        Self::new(Arc::new(settings), summaries)
    }
}

// =============================================================================
// TEST HELPERS
// =============================================================================

#[cfg(test)]
pub mod test_helpers {
    use std::collections::VecDeque;
    use std::path::PathBuf;
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use serde_json::Value;

    use super::*;
    use crate::llm::LlmChat;
    use crate::llm::config::ProviderKind;
    use crate::llm::types::{LlmError, Message, OutputSchema};

    /// Scripted LLM: replies are popped from per-mode queues in order.
    #[derive(Default)]
    pub struct MockLlm {
        structured: Mutex<VecDeque<Result<Value, LlmError>>>,
        text: Mutex<VecDeque<Result<String, LlmError>>>,
        structured_calls: AtomicUsize,
        text_calls: AtomicUsize,
        last_prompt: Mutex<Option<String>>,
    }

    impl MockLlm {
        #[must_use]
        pub fn new() -> Self {
            Self::default()
        }

        #[must_use]
        pub fn with_structured(self, reply: Result<Value, LlmError>) -> Self {
            self.structured.lock().unwrap().push_back(reply);
            self
        }

        #[must_use]
        pub fn with_text(self, reply: Result<String, LlmError>) -> Self {
            self.text.lock().unwrap().push_back(reply);
            self
        }

        pub fn structured_calls(&self) -> usize {
            self.structured_calls.load(Ordering::SeqCst)
        }

        pub fn text_calls(&self) -> usize {
            self.text_calls.load(Ordering::SeqCst)
        }

        pub fn last_prompt(&self) -> Option<String> {
            self.last_prompt.lock().unwrap().clone()
        }

        fn record(&self, messages: &[Message]) {
            *self.last_prompt.lock().unwrap() = messages.last().map(|m| m.content.clone());
        }
    }

    #[async_trait::async_trait]
    impl LlmChat for MockLlm {
        async fn complete_structured(&self, messages: &[Message], _schema: &OutputSchema) -> Result<Value, LlmError> {
            self.structured_calls.fetch_add(1, Ordering::SeqCst);
            self.record(messages);
            self.structured
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or_else(|| Err(LlmError::ApiParse("no scripted structured reply".into())))
        }

        async fn complete_text(&self, messages: &[Message]) -> Result<String, LlmError> {
            self.text_calls.fetch_add(1, Ordering::SeqCst);
            self.record(messages);
            self.text
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or_else(|| Err(LlmError::ApiRequest("no scripted text reply".into())))
        }
    }

    /// The repository's real prompt directory.
    #[must_use]
    pub fn prompts_dir() -> PathBuf {
        PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("prompts")
    }

    /// Settings with defaults only (no API keys, default provider `openai`).
    #[must_use]
    pub fn test_settings() -> Settings {
        let mut settings = Settings::from_lookup(&|_: &str| None).expect("default settings parse");
        settings.prompts_dir = prompts_dir();
        settings
    }

    /// Summary service whose every provider resolves to `llm`.
    #[must_use]
    pub fn test_service(llm: Arc<MockLlm>) -> SummaryService {
        let prompts = Arc::new(PromptStore::new(prompts_dir()));
        let providers = Arc::new(ProviderRegistry::with_builder(move |_provider: ProviderKind| {
            Ok(Arc::clone(&llm) as Arc<dyn LlmChat>)
        }));
        SummaryService::new(prompts, providers, ProviderKind::OpenAi)
    }

    /// App state backed by a mock LLM.
    #[must_use]
    pub fn test_app_state(llm: Arc<MockLlm>) -> AppState {
        AppState::new(Arc::new(test_settings()), Arc::new(test_service(llm)))
    }
}
