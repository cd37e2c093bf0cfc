//! Shared application state.

use std::sync::Arc;

use reviewtalk_chat::{select_provider, ChatProvider, ChatSession, ConversationStore, LLMConfig};
use reviewtalk_core::{Error, Result, ServerConfig};
use tracing::error;

use crate::connections::ConnectionRegistry;

/// Shared application state accessible from all route handlers.
pub struct AppState {
    pub config: ServerConfig,
    pub llm_config: LLMConfig,
    pub store: Arc<ConversationStore>,
    pub connections: ConnectionRegistry,
    /// Provider chosen at startup, or the reason selection failed.
    provider: std::result::Result<Arc<dyn ChatProvider>, String>,
}

impl AppState {
    /// Build state, selecting the provider from `llm_config`.
    ///
    /// A selection failure does not abort startup; it is reported as a
    /// configuration error on every chat call instead.
    pub fn new(config: ServerConfig, llm_config: LLMConfig) -> Self {
        let provider = select_provider(None, &llm_config).map_err(|e| {
            error!("LLM provider unavailable: {}", e);
            match e {
                Error::Config(reason) => reason,
                other => other.to_string(),
            }
        });
        Self::build(config, llm_config, provider)
    }

    /// Build state around an already constructed provider.
    pub fn with_provider(
        config: ServerConfig,
        llm_config: LLMConfig,
        provider: Arc<dyn ChatProvider>,
    ) -> Self {
        Self::build(config, llm_config, Ok(provider))
    }

    fn build(
        config: ServerConfig,
        llm_config: LLMConfig,
        provider: std::result::Result<Arc<dyn ChatProvider>, String>,
    ) -> Self {
        Self {
            config,
            llm_config,
            store: Arc::new(ConversationStore::new()),
            connections: ConnectionRegistry::new(),
            provider,
        }
    }

    /// Session bound to the active provider and the shared store.
    pub fn session(&self) -> Result<ChatSession> {
        match &self.provider {
            Ok(provider) => Ok(ChatSession::new(
                provider.clone(),
                self.store.clone(),
                self.llm_config.request_timeout,
            )),
            Err(reason) => Err(Error::Config(reason.clone())),
        }
    }
}
