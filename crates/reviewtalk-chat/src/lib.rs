//! Chat core with external LLM providers (OpenAI/Gemini).
//!
//! A user message goes to the selected provider as a single stateless turn;
//! the answer is appended to an in-memory per-conversation transcript.

pub mod config;
pub mod providers;
pub mod session;
pub mod storage;
pub mod types;

pub use config::LLMConfig;
pub use providers::{select_provider, ChatProvider, GeminiProvider, OpenAIProvider};
pub use session::ChatSession;
pub use storage::ConversationStore;
pub use types::*;
