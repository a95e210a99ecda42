//! Error types for the chat core.

use thiserror::Error;

/// Misuse of the conversation or session.
#[derive(Debug, Error)]
pub enum ChatError {
    #[error("message cannot be empty")]
    EmptyMessage,
    #[error("the conversation already has its system message")]
    SystemMessage,
}

/// Failures talking to the completion endpoint. These never reach the user as
/// errors; the transport maps them to fallback replies.
#[derive(Debug, Error)]
pub enum TransportError {
    #[error("http: {0}")]
    Http(#[from] reqwest::Error),
    #[error("invalid json body: {0}")]
    Json(#[from] serde_json::Error),
    #[error("reply has no choices[0].message.content")]
    MissingContent,
}
