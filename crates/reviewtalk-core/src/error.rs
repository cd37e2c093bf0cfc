//! Error types for ReviewTalk.

use thiserror::Error;

/// Boxed underlying cause carried by [`Error::ProviderCall`].
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Provider call failed ({provider}): {source}")]
    ProviderCall {
        provider: String,
        #[source]
        source: BoxError,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl Error {
    /// Wrap a failed remote call to a language-model provider.
    pub fn provider_call(provider: impl Into<String>, cause: impl Into<BoxError>) -> Self {
        Self::ProviderCall {
            provider: provider.into(),
            source: cause.into(),
        }
    }

    /// Stable type name, echoed to API callers in debug mode.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Config(_) => "ConfigurationError",
            Self::ProviderCall { .. } => "ProviderCallError",
            Self::Io(_) => "IoError",
            Self::Json(_) => "JsonError",
            Self::Internal(_) => "InternalError",
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_provider_call_keeps_source() {
        let err = Error::provider_call("openai", "API error 502 Bad Gateway");
        assert_eq!(err.kind(), "ProviderCallError");
        assert_eq!(
            err.to_string(),
            "Provider call failed (openai): API error 502 Bad Gateway"
        );
        let source = std::error::Error::source(&err).unwrap();
        assert_eq!(source.to_string(), "API error 502 Bad Gateway");
    }

    #[test]
    fn test_kind_names() {
        assert_eq!(Error::Config("x".into()).kind(), "ConfigurationError");
        assert_eq!(Error::Internal("x".into()).kind(), "InternalError");
        let json_err = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        assert_eq!(Error::from(json_err).kind(), "JsonError");
    }
}
