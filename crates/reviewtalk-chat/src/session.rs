//! Chat session orchestration shared by the HTTP and WebSocket transports.

use std::sync::Arc;
use std::time::Duration;

use reviewtalk_core::{Error, Result};
use tracing::{debug, warn};

use crate::providers::ChatProvider;
use crate::storage::ConversationStore;

/// Message → provider → transcript flow for one provider/store pair.
#[derive(Clone)]
pub struct ChatSession {
    provider: Arc<dyn ChatProvider>,
    store: Arc<ConversationStore>,
    timeout: Duration,
}

impl ChatSession {
    pub fn new(
        provider: Arc<dyn ChatProvider>,
        store: Arc<ConversationStore>,
        timeout: Duration,
    ) -> Self {
        Self {
            provider,
            store,
            timeout,
        }
    }

    /// Get an answer and record it under `conversation_id`.
    ///
    /// Nothing is written when the provider call fails or times out.
    pub async fn handle(&self, conversation_id: &str, user_message: &str) -> Result<String> {
        debug!("chat {}: message received", conversation_id);

        let answer = self.ask(user_message).await?;
        self.store.append(conversation_id, user_message, &answer);

        debug!(
            "chat {}: answer stored ({} total)",
            conversation_id,
            self.store.len(conversation_id)
        );
        Ok(answer)
    }

    /// Single provider call bounded by the session timeout; no transcript write.
    pub async fn ask(&self, user_message: &str) -> Result<String> {
        let provider = self.provider.provider();
        match tokio::time::timeout(self.timeout, self.provider.get_answer(user_message)).await {
            Ok(result) => result,
            Err(elapsed) => {
                warn!("{} call timed out after {:?}", provider, self.timeout);
                Err(Error::provider_call(provider.as_str(), elapsed))
            }
        }
    }

    pub fn store(&self) -> &Arc<ConversationStore> {
        &self.store
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{ChatResponse, LLMProvider};
    use async_trait::async_trait;

    struct EchoProvider;

    #[async_trait]
    impl ChatProvider for EchoProvider {
        fn provider(&self) -> LLMProvider {
            LLMProvider::OpenAI
        }

        async fn get_answer(&self, user_message: &str) -> Result<String> {
            Ok(format!("ECHO: {}", user_message))
        }
    }

    struct FailingProvider;

    #[async_trait]
    impl ChatProvider for FailingProvider {
        fn provider(&self) -> LLMProvider {
            LLMProvider::Gemini
        }

        async fn get_answer(&self, _user_message: &str) -> Result<String> {
            Err(Error::provider_call("gemini", "connection reset"))
        }
    }

    struct SlowProvider;

    #[async_trait]
    impl ChatProvider for SlowProvider {
        fn provider(&self) -> LLMProvider {
            LLMProvider::OpenAI
        }

        async fn get_answer(&self, _user_message: &str) -> Result<String> {
            tokio::time::sleep(Duration::from_secs(30)).await;
            Ok("too late".into())
        }
    }

    fn session(provider: Arc<dyn ChatProvider>, timeout: Duration) -> ChatSession {
        ChatSession::new(provider, Arc::new(ConversationStore::new()), timeout)
    }

    #[tokio::test]
    async fn test_handle_appends_answer() {
        let session = session(Arc::new(EchoProvider), Duration::from_secs(5));
        let answer = session.handle("c1", "hello").await.unwrap();
        assert_eq!(answer, "ECHO: hello");
        assert_eq!(session.store().read("c1"), vec![ChatResponse::new("ECHO: hello")]);
    }

    #[tokio::test]
    async fn test_provider_failure_leaves_transcript_unchanged() {
        let session = session(Arc::new(FailingProvider), Duration::from_secs(5));
        session.store().append("c1", "earlier", "kept");

        let err = session.handle("c1", "hello").await.unwrap_err();
        assert_eq!(err.kind(), "ProviderCallError");
        assert_eq!(session.store().read("c1"), vec![ChatResponse::new("kept")]);
    }

    #[tokio::test]
    async fn test_timeout_is_provider_call_error() {
        let session = session(Arc::new(SlowProvider), Duration::from_millis(50));
        let err = session.handle("c1", "hello").await.unwrap_err();
        assert_eq!(err.kind(), "ProviderCallError");
        assert!(session.store().read("c1").is_empty());
    }

    #[tokio::test]
    async fn test_ask_does_not_record() {
        let session = session(Arc::new(EchoProvider), Duration::from_secs(5));
        assert_eq!(session.ask("ping").await.unwrap(), "ECHO: ping");
        assert_eq!(session.store().conversation_count(), 0);
    }
}
