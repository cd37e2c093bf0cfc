//! External LLM provider clients.
//!
//! Each client sends one stateless turn (persona + user message) and
//! extracts the answer text. OpenAI uses the chat completions format,
//! Gemini uses `generateContent` with a single flattened prompt.

use std::sync::Arc;

use async_trait::async_trait;
use reqwest::Client;
use reviewtalk_core::{Error, Result};
use serde_json::{json, Value};
use tracing::{debug, error, info};

use crate::config::LLMConfig;
use crate::types::LLMProvider;

/// A single language-model vendor's call contract.
#[async_trait]
pub trait ChatProvider: Send + Sync {
    /// Which vendor this client talks to.
    fn provider(&self) -> LLMProvider;

    /// Generate an answer for one user message.
    async fn get_answer(&self, user_message: &str) -> Result<String>;
}

/// Select and construct the provider client.
///
/// Resolution order is `explicit`, then `config.default_provider`, then
/// OpenAI. The name is validated before any client is built, and the
/// chosen client checks its credential at construction.
pub fn select_provider(
    explicit: Option<&str>,
    config: &LLMConfig,
) -> Result<Arc<dyn ChatProvider>> {
    let provider: LLMProvider = config.provider_name(explicit).parse()?;
    info!("Selected LLM provider: {}", provider);

    Ok(match provider {
        LLMProvider::OpenAI => Arc::new(OpenAIProvider::new(config)?),
        LLMProvider::Gemini => Arc::new(GeminiProvider::new(config)?),
    })
}

fn build_client(config: &LLMConfig) -> Result<Client> {
    Client::builder()
        .timeout(config.request_timeout)
        .build()
        .map_err(|e| Error::Config(format!("Failed to build HTTP client: {}", e)))
}

/// POST a JSON body and return the parsed JSON response.
async fn post_json(
    provider: LLMProvider,
    request: reqwest::RequestBuilder,
    body: &Value,
) -> Result<Value> {
    let response = request
        .header("Content-Type", "application/json")
        .json(body)
        .send()
        .await
        .map_err(|e| Error::provider_call(provider.as_str(), e))?;

    if !response.status().is_success() {
        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        error!("{} API error {}: {}", provider, status, body);
        return Err(Error::provider_call(
            provider.as_str(),
            format!("API error {}: {}", status, body),
        ));
    }

    response
        .json::<Value>()
        .await
        .map_err(|e| Error::provider_call(provider.as_str(), e))
}

fn non_empty_answer(provider: LLMProvider, text: Option<&str>) -> Result<String> {
    match text.map(str::trim) {
        Some(answer) if !answer.is_empty() => Ok(answer.to_string()),
        _ => Err(Error::provider_call(
            provider.as_str(),
            "response did not contain answer text",
        )),
    }
}

// ---------------------------------------------------------------
// OpenAI
// ---------------------------------------------------------------

/// OpenAI chat completions client.
pub struct OpenAIProvider {
    client: Client,
    api_key: String,
    url: String,
    model: String,
    persona: String,
    max_tokens: usize,
    temperature: f64,
}

impl OpenAIProvider {
    pub fn new(config: &LLMConfig) -> Result<Self> {
        let api_key = config
            .openai_api_key
            .clone()
            .ok_or_else(|| Error::Config("OPENAI_API_KEY environment variable not set".into()))?;

        Ok(Self {
            client: build_client(config)?,
            api_key,
            url: format!(
                "{}/chat/completions",
                config.openai_base_url.trim_end_matches('/')
            ),
            model: config.openai_model.clone(),
            persona: config.persona.clone(),
            max_tokens: config.max_tokens,
            temperature: config.temperature,
        })
    }
}

#[async_trait]
impl ChatProvider for OpenAIProvider {
    fn provider(&self) -> LLMProvider {
        LLMProvider::OpenAI
    }

    async fn get_answer(&self, user_message: &str) -> Result<String> {
        let body = json!({
            "model": self.model,
            "messages": [
                {"role": "system", "content": self.persona},
                {"role": "user", "content": user_message},
            ],
            "max_tokens": self.max_tokens,
            "temperature": self.temperature,
        });

        debug!("Requesting completion from {} with model {}", self.url, self.model);

        let request = self
            .client
            .post(&self.url)
            .header("Authorization", format!("Bearer {}", self.api_key));
        let parsed = post_json(LLMProvider::OpenAI, request, &body).await?;

        non_empty_answer(
            LLMProvider::OpenAI,
            parsed["choices"][0]["message"]["content"].as_str(),
        )
    }
}

// ---------------------------------------------------------------
// Gemini
// ---------------------------------------------------------------

/// Google Gemini `generateContent` client.
pub struct GeminiProvider {
    client: Client,
    api_key: String,
    url: String,
    model: String,
    persona: String,
    max_tokens: usize,
    temperature: f64,
}

impl GeminiProvider {
    pub fn new(config: &LLMConfig) -> Result<Self> {
        let api_key = config.gemini_api_key.clone().ok_or_else(|| {
            error!("GEMINI_API_KEY is not set");
            Error::Config("GEMINI_API_KEY environment variable not set".into())
        })?;

        Ok(Self {
            client: build_client(config)?,
            api_key,
            url: format!(
                "{}/models/{}:generateContent",
                config.gemini_base_url.trim_end_matches('/'),
                config.gemini_model
            ),
            model: config.gemini_model.clone(),
            persona: config.persona.clone(),
            max_tokens: config.max_tokens,
            temperature: config.temperature,
        })
    }

    /// Gemini takes a single text prompt: persona, then a speaker-labelled turn.
    fn prompt(&self, user_message: &str) -> String {
        format!("{}\n사용자: {}\n상담가:", self.persona, user_message)
    }
}

#[async_trait]
impl ChatProvider for GeminiProvider {
    fn provider(&self) -> LLMProvider {
        LLMProvider::Gemini
    }

    async fn get_answer(&self, user_message: &str) -> Result<String> {
        let body = json!({
            "contents": [
                {"parts": [{"text": self.prompt(user_message)}]}
            ],
            "generationConfig": {
                "maxOutputTokens": self.max_tokens,
                "temperature": self.temperature,
            },
        });

        debug!("Requesting completion from Gemini with model {}", self.model);

        let request = self
            .client
            .post(&self.url)
            .header("x-goog-api-key", &self.api_key);
        let parsed = post_json(LLMProvider::Gemini, request, &body).await?;

        non_empty_answer(
            LLMProvider::Gemini,
            parsed["candidates"][0]["content"]["parts"][0]["text"].as_str(),
        )
    }
}
