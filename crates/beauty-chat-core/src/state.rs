//! UI-agnostic conversation state
//!
//! The conversation is the context sent with every completion request. It is
//! seeded with a single system message and only ever grows at the end.

use serde::{Deserialize, Serialize};

use crate::error::ChatError;

/// A chat message in the conversation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub role: Role,
    pub content: String,
}

/// The role of a chat message sender
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
}

impl Message {
    pub fn system(content: impl Into<String>) -> Self {
        Self { role: Role::System, content: content.into() }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self { role: Role::User, content: content.into() }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self { role: Role::Assistant, content: content.into() }
    }
}

/// Ordered, append-only message history. `messages[0]` is always the system
/// instruction.
#[derive(Debug, Clone)]
pub struct Conversation {
    messages: Vec<Message>,
}

impl Conversation {
    pub fn new(system_prompt: impl Into<String>) -> Self {
        Self {
            messages: vec![Message::system(system_prompt)],
        }
    }

    /// Append a message to the end of the history.
    ///
    /// User messages must carry non-blank content. System messages are
    /// rejected: the seeded instruction is the only one.
    pub fn append(&mut self, message: Message) -> Result<(), ChatError> {
        match message.role {
            Role::System => return Err(ChatError::SystemMessage),
            Role::User if message.content.trim().is_empty() => {
                return Err(ChatError::EmptyMessage)
            }
            _ => {}
        }
        self.messages.push(message);
        Ok(())
    }

    /// The full ordered history, as sent to the completion endpoint.
    pub fn snapshot(&self) -> &[Message] {
        &self.messages
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn last(&self) -> Option<&Message> {
        self.messages.last()
    }
}
