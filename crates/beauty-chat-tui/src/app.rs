use std::sync::Arc;

use beauty_chat_core::persona::CONNECTION_FALLBACK;
use beauty_chat_core::{ChatSession, CompletionClient, RenderSink, Sender, Submission};
use ratatui::layout::Rect;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputMode {
    Normal,
    Editing,
}

/// One line-group in the chat window.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChatEntry {
    Row { sender: Sender, text: String },
    Highlight(String),
    Placeholder,
}

/// What the chat window shows. The session draws into it through
/// [`RenderSink`]; the UI reads it back when rendering.
#[derive(Debug, Default)]
pub struct ChatView {
    entries: Vec<ChatEntry>,
    follow: bool,
}

impl ChatView {
    pub fn entries(&self) -> &[ChatEntry] {
        &self.entries
    }

    /// True once after anything was appended, so the window can jump to the end.
    pub fn take_follow(&mut self) -> bool {
        std::mem::take(&mut self.follow)
    }
}

#[cfg(test)]
impl ChatView {
    pub fn has_placeholder(&self) -> bool {
        self.entries.contains(&ChatEntry::Placeholder)
    }
}

impl RenderSink for ChatView {
    fn append_row(&mut self, sender: Sender, text: &str) {
        self.entries.push(ChatEntry::Row { sender, text: text.to_string() });
        self.follow = true;
    }

    fn replace_highlight(&mut self, question: &str) {
        self.entries.retain(|e| !matches!(e, ChatEntry::Highlight(_)));
        self.entries.push(ChatEntry::Highlight(question.to_string()));
        self.follow = true;
    }

    fn show_placeholder(&mut self) {
        self.entries.push(ChatEntry::Placeholder);
        self.follow = true;
    }

    fn remove_placeholder(&mut self) {
        self.entries.retain(|e| *e != ChatEntry::Placeholder);
    }
}

pub struct App {
    pub should_quit: bool,
    pub input_mode: InputMode,

    // Input box
    pub input: String,
    pub cursor: usize, // cursor position in input, in chars

    // Chat window
    pub session: ChatSession,
    pub view: ChatView,
    pub scroll: u16,
    pub chat_height: u16,      // inner height, set during render
    pub content_height: usize, // wrapped chat lines, set during render
    pub chat_area: Option<Rect>,

    // Completion endpoint
    pub client: Arc<dyn CompletionClient>,
    pub endpoint: String,
    pub reply_task: Option<JoinHandle<String>>,
}

impl App {
    pub fn new(client: Arc<dyn CompletionClient>, endpoint: impl Into<String>) -> Self {
        let mut view = ChatView::default();
        let session = ChatSession::open(&mut view);

        Self {
            should_quit: false,
            input_mode: InputMode::Editing,

            input: String::new(),
            cursor: 0,

            session,
            view,
            scroll: 0,
            chat_height: 0,
            content_height: 0,
            chat_area: None,

            client,
            endpoint: endpoint.into(),
            reply_task: None,
        }
    }

    /// Submit the input box. Blank input and input typed while a reply is
    /// outstanding stay in the box.
    pub fn submit_input(&mut self) {
        match self.session.begin(&self.input, &mut self.view) {
            Submission::Ignored | Submission::Busy => {}
            Submission::Answered(_) => self.clear_input(),
            Submission::Dispatched(messages) => {
                self.clear_input();
                let client = Arc::clone(&self.client);
                self.reply_task = Some(tokio::spawn(async move { client.send(&messages).await }));
            }
        }
    }

    /// Hand a finished reply to the session. Called from the run loop.
    pub async fn poll_reply(&mut self) {
        let finished = self.reply_task.as_ref().is_some_and(|task| task.is_finished());
        if !finished {
            return;
        }
        let Some(task) = self.reply_task.take() else {
            return;
        };

        let reply = match task.await {
            Ok(reply) => reply,
            Err(err) => {
                warn!(error = %err, "reply task failed");
                CONNECTION_FALLBACK.to_string()
            }
        };
        debug!(chars = reply.chars().count(), "reply received");
        self.session.complete(&reply, &mut self.view);
    }

    pub fn is_waiting(&self) -> bool {
        self.session.is_awaiting_reply()
    }

    fn clear_input(&mut self) {
        self.input.clear();
        self.cursor = 0;
    }

    // Scrolling
    fn max_scroll(&self) -> u16 {
        let hidden = self.content_height.saturating_sub(self.chat_height as usize);
        u16::try_from(hidden).unwrap_or(u16::MAX)
    }

    pub fn scroll_to_bottom(&mut self) {
        self.scroll = self.max_scroll();
    }

    pub fn scroll_down(&mut self, lines: u16) {
        self.scroll = self.scroll.saturating_add(lines).min(self.max_scroll());
    }

    pub fn scroll_up(&mut self, lines: u16) {
        self.scroll = self.scroll.saturating_sub(lines);
    }

    pub fn half_page(&self) -> u16 {
        (self.chat_height / 2).max(1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use beauty_chat_core::persona::{BRAND_ANSWER, GREETING, REFUSAL};
    use beauty_chat_core::Message;

    struct EchoClient;

    #[async_trait]
    impl CompletionClient for EchoClient {
        async fn send(&self, conversation: &[Message]) -> String {
            format!("echo: {}", conversation.last().map(|m| m.content.as_str()).unwrap_or(""))
        }
    }

    fn app() -> App {
        App::new(Arc::new(EchoClient), "http://localhost:8787/")
    }

    fn rows(view: &ChatView) -> Vec<(Sender, &str)> {
        view.entries()
            .iter()
            .filter_map(|e| match e {
                ChatEntry::Row { sender, text } => Some((*sender, text.as_str())),
                _ => None,
            })
            .collect()
    }

    async fn wait_for_reply(app: &mut App) {
        while app.reply_task.is_some() {
            tokio::task::yield_now().await;
            app.poll_reply().await;
        }
    }

    #[test]
    fn test_app_opens_with_greeting() {
        let mut app = app();
        assert_eq!(rows(&app.view), vec![(Sender::Ai, GREETING)]);
        assert!(app.view.take_follow());
        assert!(!app.view.take_follow());
    }

    #[test]
    fn test_view_keeps_single_highlight() {
        let mut view = ChatView::default();
        view.replace_highlight("first");
        view.append_row(Sender::Ai, "reply");
        view.replace_highlight("second");

        let highlights: Vec<&ChatEntry> = view
            .entries()
            .iter()
            .filter(|e| matches!(e, ChatEntry::Highlight(_)))
            .collect();
        assert_eq!(highlights, vec![&ChatEntry::Highlight("second".to_string())]);
        assert_eq!(view.entries().last(), Some(&ChatEntry::Highlight("second".to_string())));
    }

    #[test]
    fn test_placeholder_comes_and_goes() {
        let mut view = ChatView::default();
        view.append_row(Sender::User, "short");
        view.show_placeholder();
        assert!(view.has_placeholder());
        assert!(view.take_follow());

        view.remove_placeholder();
        assert!(!view.has_placeholder());
        assert!(!view.take_follow());
        assert_eq!(view.entries().len(), 1);
    }

    #[tokio::test]
    async fn test_canned_answer_clears_input() {
        let mut app = app();
        app.input = "What is L'Oréal?".to_string();
        app.cursor = app.input.chars().count();

        app.submit_input();

        assert!(app.input.is_empty());
        assert_eq!(app.cursor, 0);
        assert!(app.reply_task.is_none());
        assert_eq!(rows(&app.view).last(), Some(&(Sender::Ai, BRAND_ANSWER)));

        app.input = "Who won the game?".to_string();
        app.submit_input();
        assert_eq!(rows(&app.view).last(), Some(&(Sender::Ai, REFUSAL)));
    }

    #[tokio::test]
    async fn test_relevant_question_spawns_reply_task() {
        let mut app = app();
        app.input = "Recommend a moisturizer".to_string();

        app.submit_input();
        assert!(app.input.is_empty());
        assert!(app.is_waiting());
        assert!(app.view.has_placeholder());

        wait_for_reply(&mut app).await;

        assert!(!app.is_waiting());
        assert!(!app.view.has_placeholder());
        assert_eq!(rows(&app.view).last(), Some(&(Sender::Ai, "echo: Recommend a moisturizer")));
    }

    #[tokio::test]
    async fn test_input_kept_while_busy() {
        let mut app = app();
        app.input = "Best serum?".to_string();
        app.submit_input();

        app.input = "Best mascara?".to_string();
        app.submit_input();
        assert_eq!(app.input, "Best mascara?");

        wait_for_reply(&mut app).await;
        app.submit_input();
        assert!(app.input.is_empty());
        wait_for_reply(&mut app).await;
        assert_eq!(rows(&app.view).last(), Some(&(Sender::Ai, "echo: Best mascara?")));
    }

    #[test]
    fn test_blank_input_is_left_alone() {
        let mut app = app();
        app.input = "   ".to_string();
        app.submit_input();
        assert_eq!(app.input, "   ");
        assert_eq!(rows(&app.view).len(), 1);
    }

    #[test]
    fn test_scroll_is_clamped() {
        let mut app = app();
        app.chat_height = 2;
        app.content_height = 3;
        app.scroll_down(100);
        // greeting: avatar + text + blank = 3 lines, 2 visible
        assert_eq!(app.scroll, 1);
        app.scroll_up(5);
        assert_eq!(app.scroll, 0);
        app.scroll_to_bottom();
        assert_eq!(app.scroll, 1);
    }

    #[test]
    fn test_scroll_clamps_to_u16_for_huge_histories() {
        let mut app = app();
        app.chat_height = 10;
        app.content_height = 100_000;
        app.scroll_to_bottom();
        assert_eq!(app.scroll, u16::MAX);
        app.scroll_down(10);
        assert_eq!(app.scroll, u16::MAX);
    }
}
