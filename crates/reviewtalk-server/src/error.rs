//! Mapping of chat errors onto the JSON error envelope.

use axum::extract::rejection::JsonRejection;
use axum::extract::{FromRequest, Request};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use reviewtalk_core::Error;
use serde::de::DeserializeOwned;
use tracing::{debug, error};

/// A failed request. Always a 500 with a generic detail; error type and
/// message are included only when debug mode is on.
pub struct ApiError {
    error: Error,
    debug: bool,
}

impl ApiError {
    pub fn new(error: Error, debug: bool) -> Self {
        Self { error, debug }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        error!("Request failed: {} ({:?})", self.error, self.error);

        let body = if self.debug {
            serde_json::json!({
                "detail": "Internal Server Error",
                "error": self.error.kind(),
                "message": self.error.to_string(),
            })
        } else {
            serde_json::json!({ "detail": "Internal Server Error" })
        };

        (StatusCode::INTERNAL_SERVER_ERROR, Json(body)).into_response()
    }
}

/// `Json` body extractor whose rejections use the JSON envelope.
pub struct JsonBody<T>(pub T);

impl<T, S> FromRequest<S> for JsonBody<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = BodyRejection;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        match Json::<T>::from_request(req, state).await {
            Ok(Json(value)) => Ok(Self(value)),
            Err(rejection) => Err(BodyRejection(rejection)),
        }
    }
}

/// Unreadable request body. Keeps the rejection's status code.
pub struct BodyRejection(JsonRejection);

impl IntoResponse for BodyRejection {
    fn into_response(self) -> Response {
        debug!("Rejected request body: {}", self.0.body_text());
        (
            self.0.status(),
            Json(serde_json::json!({ "detail": self.0.body_text() })),
        )
            .into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn body_json(response: Response) -> serde_json::Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_generic_envelope() {
        let response =
            ApiError::new(Error::provider_call("openai", "timeout"), false).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(
            body_json(response).await,
            serde_json::json!({ "detail": "Internal Server Error" })
        );
    }

    #[tokio::test]
    async fn test_debug_envelope_echoes_detail() {
        let response =
            ApiError::new(Error::Config("GEMINI_API_KEY missing".into()), true).into_response();
        let body = body_json(response).await;
        assert_eq!(body["error"], "ConfigurationError");
        assert_eq!(body["message"], "Configuration error: GEMINI_API_KEY missing");
    }
}
