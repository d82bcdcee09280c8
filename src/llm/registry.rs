//! Per-provider client cache.
//!
//! DESIGN
//! ======
//! Clients are built on first use and kept for the process lifetime. A failed
//! build is returned as [`LlmError::ProviderInit`] and never cached, so the
//! next request retries construction. Two requests racing on a cold provider
//! may both build a client; the last insert wins, which is harmless because
//! construction has no side effects beyond holding credentials.

use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};

use tracing::info;

use super::config::{LlmSettings, ProviderKind};
use super::types::{LlmChat, LlmError};
use super::LlmClient;

/// Builds a client for one provider.
pub type ClientBuilder = dyn Fn(ProviderKind) -> Result<Arc<dyn LlmChat>, LlmError> + Send + Sync;

pub struct ProviderRegistry {
    builder: Box<ClientBuilder>,
    clients: RwLock<HashMap<ProviderKind, Arc<dyn LlmChat>>>,
}

impl ProviderRegistry {
    /// Registry that builds real HTTP clients from `settings`.
    #[must_use]
    pub fn from_settings(settings: Arc<LlmSettings>) -> Self {
        Self::with_builder(move |provider| {
            let client = LlmClient::for_provider(provider, &settings)?;
            info!(%provider, model = client.model(), "llm: client initialized");
            Ok(Arc::new(client) as Arc<dyn LlmChat>)
        })
    }

    /// Registry with a custom construction function.
    pub fn with_builder<F>(builder: F) -> Self
    where
        F: Fn(ProviderKind) -> Result<Arc<dyn LlmChat>, LlmError> + Send + Sync + 'static,
    {
        Self { builder: Box::new(builder), clients: RwLock::new(HashMap::new()) }
    }

    /// Return the cached client for `provider`, building it on first use.
    ///
    /// # Errors
    ///
    /// Returns [`LlmError::ProviderInit`] wrapping the construction failure.
    pub fn get(&self, provider: ProviderKind) -> Result<Arc<dyn LlmChat>, LlmError> {
        if let Some(client) = self
            .clients
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&provider)
        {
            return Ok(Arc::clone(client));
        }

        let client = (self.builder)(provider).map_err(|e| LlmError::ProviderInit { provider, source: Box::new(e) })?;
        self.clients
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(provider, Arc::clone(&client));
        Ok(client)
    }

    /// Whether a client for `provider` is currently cached.
    #[cfg(test)]
    #[must_use]
    pub fn is_cached(&self, provider: ProviderKind) -> bool {
        self.clients
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .contains_key(&provider)
    }
}

#[cfg(test)]
#[path = "registry_test.rs"]
mod tests;
