//! Completion client — the single point of entry for text-generation calls.
//!
//! No other module talks to the completions endpoint directly. The workflow
//! depends on the `TextGenerator` trait and receives this client at startup.

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;
use tracing::debug;

use crate::config::Config;

pub const DEFAULT_COMPLETIONS_URL: &str = "https://api.euron.one/api/v1/euri/chat/completions";
pub const DEFAULT_MODEL: &str = "gpt-4.1-nano";
/// Sampling temperature used for every call in the workflow.
pub const TEMPERATURE: f32 = 0.5;

#[derive(Debug, Error)]
pub enum CompletionError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Response lists choices but the first one has no message content")]
    MalformedChoices,
}

/// What a completion call produced.
///
/// Chat-shaped responses are reduced to the first choice's message content.
/// Any other response shape is handed back untouched as `Raw`.
#[derive(Debug, Clone, PartialEq)]
pub enum Completion {
    Text(String),
    Raw(Value),
}

impl Completion {
    pub fn from_response(value: Value) -> Result<Self, CompletionError> {
        if value.get("choices").is_none() {
            return Ok(Completion::Raw(value));
        }

        value
            .get("choices")
            .and_then(|choices| choices.get(0))
            .and_then(|choice| choice.pointer("/message/content"))
            .and_then(Value::as_str)
            .map(|content| Completion::Text(content.to_string()))
            .ok_or(CompletionError::MalformedChoices)
    }

    /// Text for display. A raw JSON string is unwrapped, other raw values are
    /// rendered as compact JSON.
    pub fn into_text(self) -> String {
        match self {
            Completion::Text(text) => text,
            Completion::Raw(Value::String(text)) => text,
            Completion::Raw(other) => other.to_string(),
        }
    }
}

/// Anything that can turn a prompt into generated text.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    async fn complete(&self, prompt: &str, max_tokens: u32) -> Result<Completion, CompletionError>;
}

#[derive(Debug, Serialize)]
struct CompletionRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    temperature: f32,
    max_tokens: u32,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ApiErrorEnvelope {
    error: ApiErrorBody,
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    message: String,
}

/// HTTP client for the chat-completions endpoint.
#[derive(Clone)]
pub struct CompletionClient {
    client: Client,
    api_url: String,
    api_key: String,
    model: String,
}

impl CompletionClient {
    pub fn from_config(config: &Config) -> Result<Self, CompletionError> {
        Ok(Self {
            client: Client::builder()
                .timeout(config.completion_timeout)
                .build()?,
            api_url: config.euri_api_url.clone(),
            api_key: config.euri_api_key.clone(),
            model: config.euri_model.clone(),
        })
    }

    pub fn model(&self) -> &str {
        &self.model
    }
}

#[async_trait]
impl TextGenerator for CompletionClient {
    async fn complete(&self, prompt: &str, max_tokens: u32) -> Result<Completion, CompletionError> {
        let request_body = CompletionRequest {
            model: &self.model,
            messages: vec![ChatMessage {
                role: "user",
                content: prompt,
            }],
            temperature: TEMPERATURE,
            max_tokens,
        };

        let response = self
            .client
            .post(&self.api_url)
            .bearer_auth(&self.api_key)
            .json(&request_body)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            let message = serde_json::from_str::<ApiErrorEnvelope>(&body)
                .map(|e| e.error.message)
                .unwrap_or(body);
            return Err(CompletionError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let value: Value = serde_json::from_str(&body)?;
        debug!(max_tokens, bytes = body.len(), "Completion call succeeded");

        Completion::from_response(value)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use axum::{extract::State, http::HeaderMap, http::StatusCode, routing::post, Json, Router};
    use serde_json::json;

    use super::*;
    use crate::test_support::{spawn_server, test_config};

    #[test]
    fn test_first_choice_content_is_returned() {
        let response = json!({
            "choices": [
                {"message": {"role": "assistant", "content": "X"}},
                {"message": {"role": "assistant", "content": "Y"}}
            ]
        });
        assert_eq!(
            Completion::from_response(response).unwrap(),
            Completion::Text("X".to_string())
        );
    }

    #[test]
    fn test_other_shapes_pass_through_unchanged() {
        for value in [
            json!("plain text"),
            json!({"output": "text"}),
            json!([1, 2, 3]),
            json!(null),
        ] {
            assert_eq!(
                Completion::from_response(value.clone()).unwrap(),
                Completion::Raw(value)
            );
        }
    }

    #[test]
    fn test_empty_choices_is_malformed() {
        let err = Completion::from_response(json!({"choices": []})).unwrap_err();
        assert!(matches!(err, CompletionError::MalformedChoices));
    }

    #[test]
    fn test_choice_without_content_is_malformed() {
        let err = Completion::from_response(json!({"choices": [{"message": {}}]})).unwrap_err();
        assert!(matches!(err, CompletionError::MalformedChoices));
    }

    #[test]
    fn test_into_text_unwraps_raw_strings() {
        assert_eq!(Completion::Raw(json!("hello")).into_text(), "hello");
        assert_eq!(Completion::Text("hi".into()).into_text(), "hi");
        assert_eq!(Completion::Raw(json!({"a": 1})).into_text(), r#"{"a":1}"#);
    }

    type Captured = Arc<Mutex<Vec<(Option<String>, Value)>>>;

    async fn record_and_reply(
        State(captured): State<Captured>,
        headers: HeaderMap,
        Json(body): Json<Value>,
    ) -> Json<Value> {
        let auth = headers
            .get("authorization")
            .and_then(|v| v.to_str().ok())
            .map(String::from);
        captured.lock().unwrap().push((auth, body));
        Json(json!({"choices": [{"message": {"content": "Generated summary"}}]}))
    }

    #[tokio::test]
    async fn test_complete_sends_chat_request_and_unwraps_choice() {
        let captured: Captured = Arc::default();
        let app = Router::new()
            .route("/chat", post(record_and_reply))
            .with_state(captured.clone());
        let base = spawn_server(app).await;

        let config = test_config(&format!("{base}/chat"), &base);
        let client = CompletionClient::from_config(&config).unwrap();
        let completion = client.complete("Summarize this", 500).await.unwrap();

        assert_eq!(completion, Completion::Text("Generated summary".to_string()));

        let calls = captured.lock().unwrap();
        assert_eq!(calls.len(), 1);
        let (auth, body) = &calls[0];
        assert_eq!(auth.as_deref(), Some("Bearer test-euri-key"));
        assert_eq!(body["model"], "gpt-4.1-nano");
        assert_eq!(body["max_tokens"], 500);
        assert_eq!(body["temperature"], 0.5);
        assert_eq!(body["messages"][0]["role"], "user");
        assert_eq!(body["messages"][0]["content"], "Summarize this");
    }

    #[tokio::test]
    async fn test_error_status_becomes_api_error() {
        let app = Router::new().route(
            "/chat",
            post(|| async {
                (
                    StatusCode::UNAUTHORIZED,
                    Json(json!({"error": {"message": "invalid api key"}})),
                )
            }),
        );
        let base = spawn_server(app).await;

        let client = CompletionClient::from_config(&test_config(&format!("{base}/chat"), &base))
            .unwrap();
        let err = client.complete("anything", 100).await.unwrap_err();

        match err {
            CompletionError::Api { status, message } => {
                assert_eq!(status, 401);
                assert_eq!(message, "invalid api key");
            }
            other => panic!("expected API error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_unexpected_shape_is_passed_through() {
        let app = Router::new().route(
            "/chat",
            post(|| async { Json(json!({"result": "free-form"})) }),
        );
        let base = spawn_server(app).await;

        let client = CompletionClient::from_config(&test_config(&format!("{base}/chat"), &base))
            .unwrap();
        let completion = client.complete("anything", 100).await.unwrap();

        assert_eq!(completion, Completion::Raw(json!({"result": "free-form"})));
    }
}
