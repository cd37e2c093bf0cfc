//! LLM configuration and provider resolution.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::types::LLMProvider;

pub const DEFAULT_PROVIDER: LLMProvider = LLMProvider::OpenAI;
pub const DEFAULT_OPENAI_MODEL: &str = "gpt-4o-mini";
pub const DEFAULT_GEMINI_MODEL: &str = "gemini-2.0-flash";
pub const DEFAULT_OPENAI_BASE_URL: &str = "https://api.openai.com/v1";
pub const DEFAULT_GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";
pub const DEFAULT_PERSONA: &str = "나는 상담가야.";
pub const DEFAULT_MAX_TOKENS: usize = 512;
pub const DEFAULT_TEMPERATURE: f64 = 0.7;
pub const DEFAULT_TIMEOUT_SECS: u64 = 60;

/// LLM configuration, resolved once at startup and passed explicitly.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LLMConfig {
    /// Provider name from `AI_TYPE`; `None` falls back to OpenAI.
    #[serde(default)]
    pub default_provider: Option<String>,
    #[serde(default, skip_serializing)]
    pub openai_api_key: Option<String>,
    #[serde(default, skip_serializing)]
    pub gemini_api_key: Option<String>,
    pub openai_model: String,
    pub gemini_model: String,
    pub openai_base_url: String,
    pub gemini_base_url: String,
    /// System persona prepended to every user message.
    pub persona: String,
    pub max_tokens: usize,
    pub temperature: f64,
    /// Upper bound for a single provider call.
    pub request_timeout: Duration,
}

impl Default for LLMConfig {
    fn default() -> Self {
        Self {
            default_provider: None,
            openai_api_key: None,
            gemini_api_key: None,
            openai_model: DEFAULT_OPENAI_MODEL.into(),
            gemini_model: DEFAULT_GEMINI_MODEL.into(),
            openai_base_url: DEFAULT_OPENAI_BASE_URL.into(),
            gemini_base_url: DEFAULT_GEMINI_BASE_URL.into(),
            persona: DEFAULT_PERSONA.into(),
            max_tokens: DEFAULT_MAX_TOKENS,
            temperature: DEFAULT_TEMPERATURE,
            request_timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }
}

impl LLMConfig {
    /// Load config from env vars, falling back to defaults.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build config from an arbitrary key lookup. Empty values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };
        let defaults = Self::default();

        let request_timeout = match get("LLM_TIMEOUT_SECS") {
            Some(raw) => match raw.parse::<u64>() {
                Ok(secs) if secs > 0 => Duration::from_secs(secs),
                _ => {
                    warn!(
                        "Invalid LLM_TIMEOUT_SECS '{}', using {:?}",
                        raw, defaults.request_timeout
                    );
                    defaults.request_timeout
                }
            },
            None => defaults.request_timeout,
        };

        let config = Self {
            default_provider: get("AI_TYPE"),
            openai_api_key: get("OPENAI_API_KEY"),
            gemini_api_key: get("GEMINI_API_KEY"),
            openai_model: get("OPENAI_MODEL").unwrap_or(defaults.openai_model),
            gemini_model: get("GEMINI_MODEL").unwrap_or(defaults.gemini_model),
            openai_base_url: get("OPENAI_BASE_URL").unwrap_or(defaults.openai_base_url),
            gemini_base_url: get("GEMINI_BASE_URL").unwrap_or(defaults.gemini_base_url),
            persona: get("CHAT_PERSONA").unwrap_or(defaults.persona),
            max_tokens: defaults.max_tokens,
            temperature: defaults.temperature,
            request_timeout,
        };

        tracing::debug!(
            "AI_TYPE={:?} openai key set: {} gemini key set: {}",
            config.default_provider,
            config.openai_api_key.is_some(),
            config.gemini_api_key.is_some(),
        );

        config
    }

    /// Provider name to use: explicit argument, then `AI_TYPE`, then OpenAI.
    pub fn provider_name<'a>(&'a self, explicit: Option<&'a str>) -> &'a str {
        explicit
            .or(self.default_provider.as_deref())
            .unwrap_or(DEFAULT_PROVIDER.as_str())
    }

    /// Whether a credential is present for the given provider.
    pub fn has_credential(&self, provider: LLMProvider) -> bool {
        match provider {
            LLMProvider::OpenAI => self.openai_api_key.is_some(),
            LLMProvider::Gemini => self.gemini_api_key.is_some(),
        }
    }
}
