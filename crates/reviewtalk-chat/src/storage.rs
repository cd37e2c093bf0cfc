//! In-memory conversation transcripts.
//!
//! One coarse lock guards every conversation. Transcripts are append-only
//! and live until the process exits.

use std::collections::HashMap;

use parking_lot::Mutex;

use crate::types::ChatResponse;

/// Process-wide transcript store keyed by conversation id.
#[derive(Default)]
pub struct ConversationStore {
    history: Mutex<HashMap<String, Vec<ChatResponse>>>,
}

impl ConversationStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an answer to a conversation, creating the transcript on first use.
    ///
    /// The user message is accepted for parity with the session flow but only
    /// the answer is recorded.
    pub fn append(&self, conversation_id: &str, _user_message: &str, answer: &str) {
        self.history
            .lock()
            .entry(conversation_id.to_string())
            .or_default()
            .push(ChatResponse::new(answer));
    }

    /// Snapshot of a transcript. Unknown ids yield an empty list.
    pub fn read(&self, conversation_id: &str) -> Vec<ChatResponse> {
        self.history
            .lock()
            .get(conversation_id)
            .cloned()
            .unwrap_or_default()
    }

    /// Number of answers recorded for a conversation.
    pub fn len(&self, conversation_id: &str) -> usize {
        self.history
            .lock()
            .get(conversation_id)
            .map_or(0, Vec::len)
    }

    /// Number of conversations with at least one answer.
    pub fn conversation_count(&self) -> usize {
        self.history.lock().len()
    }
}
