use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, warn};

use crate::error::TransportError;
use crate::persona::{CONNECTION_FALLBACK, MODEL, NO_RESPONSE_FALLBACK};
use crate::state::Message;

/// Anything that can turn a conversation into the assistant's next reply.
///
/// `send` is infallible: failures come back as fallback text so the session
/// always has exactly one reply to record.
#[async_trait]
pub trait CompletionClient: Send + Sync {
    async fn send(&self, conversation: &[Message]) -> String;
}

#[derive(Serialize)]
struct CompletionRequest<'a> {
    messages: &'a [Message],
    model: &'a str,
}

/// Chat-completions client for a single JSON POST endpoint (typically a
/// worker that forwards to OpenAI).
#[derive(Clone)]
pub struct HttpCompletionClient {
    client: Client,
    endpoint: String,
    model: String,
}

impl HttpCompletionClient {
    pub fn new(endpoint: &str) -> Self {
        Self {
            client: Client::new(),
            endpoint: endpoint.to_string(),
            model: MODEL.to_string(),
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    /// One best-effort attempt. No retries, no timeout.
    pub async fn try_send(&self, conversation: &[Message]) -> Result<String, TransportError> {
        let request = CompletionRequest {
            messages: conversation,
            model: &self.model,
        };

        debug!(endpoint = %self.endpoint, messages = conversation.len(), "sending completion request");

        let response = self
            .client
            .post(&self.endpoint)
            .header("Content-Type", "application/json")
            .json(&request)
            .send()
            .await?;

        // The body is parsed whatever the status; error payloads simply lack a reply.
        let status = response.status();
        if !status.is_success() {
            warn!(%status, "completion endpoint returned an error status");
        }

        let body = response.text().await?;
        let value: Value = serde_json::from_str(&body)?;
        extract_reply(&value).ok_or(TransportError::MissingContent)
    }
}

#[async_trait]
impl CompletionClient for HttpCompletionClient {
    async fn send(&self, conversation: &[Message]) -> String {
        match self.try_send(conversation).await {
            Ok(reply) => reply,
            Err(TransportError::MissingContent) => {
                warn!("completion response had no reply content");
                NO_RESPONSE_FALLBACK.to_string()
            }
            Err(err) => {
                warn!(error = %err, "completion request failed");
                CONNECTION_FALLBACK.to_string()
            }
        }
    }
}

/// Pull `choices[0].message.content` out of a completion response, trimmed.
/// Missing segments, non-string content and blank content all yield `None`.
pub fn extract_reply(value: &Value) -> Option<String> {
    value
        .pointer("/choices/0/message/content")
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|text| !text.is_empty())
        .map(str::to_string)
}
