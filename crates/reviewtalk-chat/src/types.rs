//! Chat types matching the HTTP/WebSocket API surface.

use std::str::FromStr;

use reviewtalk_core::Error;
use serde::{Deserialize, Serialize};

/// LLM provider identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LLMProvider {
    OpenAI,
    Gemini,
}

impl LLMProvider {
    /// Every provider the gateway knows how to talk to.
    pub const ALL: &'static [LLMProvider] = &[LLMProvider::OpenAI, LLMProvider::Gemini];

    pub fn as_str(&self) -> &'static str {
        match self {
            LLMProvider::OpenAI => "openai",
            LLMProvider::Gemini => "gemini",
        }
    }

    fn valid_names() -> String {
        Self::ALL
            .iter()
            .map(|p| p.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

impl std::fmt::Display for LLMProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LLMProvider {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let name = s.trim().to_ascii_lowercase();
        Self::ALL
            .iter()
            .copied()
            .find(|p| p.as_str() == name)
            .ok_or_else(|| {
                Error::Config(format!(
                    "Unsupported AI type '{}'; expected one of: {}",
                    s.trim(),
                    Self::valid_names()
                ))
            })
    }
}

/// Incoming chat request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatRequest {
    pub message: String,
}

/// One answer in a conversation transcript.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatResponse {
    pub answer: String,
}

impl ChatResponse {
    pub fn new(answer: impl Into<String>) -> Self {
        Self {
            answer: answer.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_is_case_insensitive() {
        assert_eq!("OpenAI".parse::<LLMProvider>().unwrap(), LLMProvider::OpenAI);
        assert_eq!("GEMINI".parse::<LLMProvider>().unwrap(), LLMProvider::Gemini);
        assert_eq!(" gemini ".parse::<LLMProvider>().unwrap(), LLMProvider::Gemini);
    }

    #[test]
    fn test_unknown_provider_names_valid_set() {
        let err = "llama".parse::<LLMProvider>().unwrap_err();
        assert_eq!(err.kind(), "ConfigurationError");
        let msg = err.to_string();
        assert!(msg.contains("llama"));
        assert!(msg.contains("openai, gemini"));
    }

    #[test]
    fn test_response_shape() {
        let json = serde_json::to_value(ChatResponse::new("hi")).unwrap();
        assert_eq!(json, serde_json::json!({ "answer": "hi" }));
        let req: ChatRequest = serde_json::from_str(r#"{"message":"hello"}"#).unwrap();
        assert_eq!(req.message, "hello");
    }
}
