//! One chat session: the conversation plus the per-submission state machine.
//!
//! A submission moves `Idle -> Submitted -> (ShortCircuit | AwaitingReply) -> Idle`.
//! Short-circuits answer locally with canned text. Everything else goes to the
//! completion endpoint, with a placeholder row shown until the reply settles.
//! Only one reply may be outstanding; submissions made meanwhile are refused.

use tracing::{debug, info, warn};

use crate::ai::CompletionClient;
use crate::normalize::is_brand_query;
use crate::persona::{self, BRAND_ANSWER, GREETING, REFUSAL, SYSTEM_PROMPT};
use crate::relevance::is_relevant;
use crate::state::{Conversation, Message};

/// Who a rendered row belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sender {
    User,
    Ai,
}

impl Sender {
    pub fn avatar(&self) -> &'static str {
        match self {
            Sender::User => persona::USER_AVATAR,
            Sender::Ai => persona::AI_AVATAR,
        }
    }
}

/// The narrow surface a session draws on. Implementations own scrolling:
/// every appended row should bring the newest entry into view.
pub trait RenderSink {
    fn append_row(&mut self, sender: Sender, text: &str);
    /// Show `question` as the single highlighted last question.
    fn replace_highlight(&mut self, question: &str);
    fn show_placeholder(&mut self);
    fn remove_placeholder(&mut self);
}

/// What happened to a submitted question.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Submission {
    /// Blank input; nothing rendered or recorded.
    Ignored,
    /// A reply is still outstanding; nothing rendered or recorded.
    Busy,
    /// Answered locally with the contained canned reply.
    Answered(String),
    /// Awaiting the endpoint. Carries the conversation to send; finish with
    /// [`ChatSession::complete`].
    Dispatched(Vec<Message>),
}

pub struct ChatSession {
    conversation: Conversation,
    awaiting_reply: bool,
}

impl ChatSession {
    /// Start a session and render the greeting.
    pub fn open(sink: &mut dyn RenderSink) -> Self {
        sink.append_row(Sender::Ai, GREETING);
        Self {
            conversation: Conversation::new(SYSTEM_PROMPT),
            awaiting_reply: false,
        }
    }

    pub fn conversation(&self) -> &Conversation {
        &self.conversation
    }

    pub fn is_awaiting_reply(&self) -> bool {
        self.awaiting_reply
    }

    /// Record and render the question, then either answer it locally or hand
    /// back the conversation to send.
    pub fn begin(&mut self, question: &str, sink: &mut dyn RenderSink) -> Submission {
        let question = question.trim();
        if question.is_empty() {
            return Submission::Ignored;
        }
        if self.awaiting_reply {
            debug!("submission refused while a reply is pending");
            return Submission::Busy;
        }
        if let Err(err) = self.conversation.append(Message::user(question)) {
            debug!(%err, "submission ignored");
            return Submission::Ignored;
        }

        sink.append_row(Sender::User, question);
        sink.replace_highlight(question);

        let canned = if is_brand_query(question) {
            Some(BRAND_ANSWER)
        } else if !is_relevant(question) {
            Some(REFUSAL)
        } else {
            None
        };

        if let Some(reply) = canned {
            let kind = if reply == BRAND_ANSWER { "brand" } else { "refusal" };
            info!(kind, "answered locally");
            self.record_reply(reply, sink);
            return Submission::Answered(reply.to_string());
        }

        self.awaiting_reply = true;
        sink.show_placeholder();
        debug!(messages = self.conversation.len(), "dispatching to completion endpoint");
        Submission::Dispatched(self.conversation.snapshot().to_vec())
    }

    /// Settle the outstanding request: drop the placeholder, then render and
    /// record `reply`. Returns false if nothing was outstanding.
    pub fn complete(&mut self, reply: &str, sink: &mut dyn RenderSink) -> bool {
        if !self.awaiting_reply {
            warn!("reply arrived with no request outstanding");
            return false;
        }
        self.awaiting_reply = false;
        sink.remove_placeholder();
        self.record_reply(reply, sink);
        true
    }

    /// Run a whole submission, waiting on `client` inline when needed.
    /// Returns the assistant reply that was recorded, if any.
    pub async fn submit(
        &mut self,
        question: &str,
        client: &dyn CompletionClient,
        sink: &mut dyn RenderSink,
    ) -> Option<String> {
        match self.begin(question, sink) {
            Submission::Ignored | Submission::Busy => None,
            Submission::Answered(reply) => Some(reply),
            Submission::Dispatched(messages) => {
                let reply = client.send(&messages).await;
                self.complete(&reply, sink);
                Some(reply)
            }
        }
    }

    fn record_reply(&mut self, reply: &str, sink: &mut dyn RenderSink) {
        sink.append_row(Sender::Ai, reply);
        if let Err(err) = self.conversation.append(Message::assistant(reply)) {
            warn!(%err, "failed to record assistant reply");
        }
    }
}
