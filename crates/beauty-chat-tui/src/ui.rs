use beauty_chat_core::persona::{self, PLACEHOLDER};
use beauty_chat_core::Sender;
use ratatui::{
    Frame,
    layout::{Constraint, Layout, Rect},
    style::{Color, Modifier, Style, Stylize},
    text::{Line, Span, Text},
    widgets::{Block, Borders, Paragraph, Wrap},
};
use crate::app::{App, ChatEntry, InputMode};

/// Parse a line of text and convert **bold** markdown to styled spans
fn parse_markdown_line(text: &str) -> Line<'static> {
    let mut spans: Vec<Span<'static>> = Vec::new();
    let mut chars = text.chars().peekable();
    let mut current_text = String::new();

    while let Some(c) = chars.next() {
        if c == '*' && chars.peek() == Some(&'*') {
            chars.next();

            if !current_text.is_empty() {
                spans.push(Span::raw(std::mem::take(&mut current_text)));
            }

            // Find closing **
            let mut bold_text = String::new();
            let mut found_close = false;
            while let Some(c) = chars.next() {
                if c == '*' && chars.peek() == Some(&'*') {
                    chars.next();
                    found_close = true;
                    break;
                }
                bold_text.push(c);
            }

            if found_close && !bold_text.is_empty() {
                spans.push(Span::styled(bold_text, Style::default().add_modifier(Modifier::BOLD)));
            } else {
                // No closing **, treat as literal
                current_text.push_str("**");
                current_text.push_str(&bold_text);
            }
        } else {
            current_text.push(c);
        }
    }

    if !current_text.is_empty() {
        spans.push(Span::raw(current_text));
    }

    Line::from(spans)
}

fn avatar_style(sender: Sender) -> Style {
    let color = match sender {
        Sender::User => Color::Cyan,
        Sender::Ai => Color::Yellow,
    };
    Style::default().fg(color).add_modifier(Modifier::BOLD)
}

fn avatar_line(sender: Sender) -> Line<'static> {
    Line::from(Span::styled(format!("[{}]", sender.avatar()), avatar_style(sender)))
}

fn chat_lines(entries: &[ChatEntry]) -> Vec<Line<'static>> {
    let mut lines: Vec<Line> = Vec::new();

    for entry in entries {
        match entry {
            ChatEntry::Row { sender: Sender::User, text } => {
                lines.push(avatar_line(Sender::User));
                lines.extend(text.lines().map(|l| Line::from(l.to_string())));
                lines.push(Line::default());
            }
            ChatEntry::Row { sender: Sender::Ai, text } => {
                lines.push(avatar_line(Sender::Ai));
                lines.extend(text.lines().map(parse_markdown_line));
                lines.push(Line::default());
            }
            ChatEntry::Highlight(question) => {
                lines.push(Line::from(Span::styled(
                    persona::highlight_text(question),
                    Style::default().fg(Color::Magenta).add_modifier(Modifier::ITALIC),
                )));
                lines.push(Line::default());
            }
            ChatEntry::Placeholder => {
                lines.push(avatar_line(Sender::Ai));
                lines.push(Line::from(Span::styled(
                    PLACEHOLDER,
                    Style::default().fg(Color::DarkGray).add_modifier(Modifier::ITALIC),
                )));
                lines.push(Line::default());
            }
        }
    }

    lines
}

pub fn render(app: &mut App, frame: &mut Frame) {
    let area = frame.area();

    // Main layout: header, chat, input, footer
    let [header_area, chat_area, input_area, footer_area] = Layout::vertical([
        Constraint::Length(1),
        Constraint::Min(0),
        Constraint::Length(3),
        Constraint::Length(1),
    ])
    .areas(area);

    render_header(app, frame, header_area);
    render_chat(app, frame, chat_area);
    render_input(app, frame, input_area);
    render_footer(app, frame, footer_area);
}

fn render_header(app: &App, frame: &mut Frame, area: Rect) {
    let title = Line::from(vec![
        Span::styled(" L'Oréal Beauty Assistant ", Style::default().fg(Color::Cyan).bold()),
        Span::styled(format!("{} ", app.endpoint), Style::default().fg(Color::Gray)),
        Span::styled(
            format!("v{}", env!("CARGO_PKG_VERSION")),
            Style::default().fg(Color::Gray),
        ),
    ]);

    let header = Paragraph::new(title).style(Style::default().bg(Color::DarkGray));
    frame.render_widget(header, area);
}

fn render_chat(app: &mut App, frame: &mut Frame, area: Rect) {
    // Inner size minus borders, for scroll calculations
    app.chat_area = Some(area);
    app.chat_height = area.height.saturating_sub(2);

    let chat = Paragraph::new(Text::from(chat_lines(app.view.entries()))).wrap(Wrap { trim: true });
    // Measured before the block is attached, so borders are not counted
    app.content_height = chat.line_count(area.width.saturating_sub(2));

    if app.view.take_follow() {
        app.scroll_to_bottom();
    }

    let border_color = if app.input_mode == InputMode::Normal { Color::Cyan } else { Color::DarkGray };
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(border_color))
        .title(" Chat ");

    frame.render_widget(chat.block(block).scroll((app.scroll, 0)), area);
}

fn render_input(app: &App, frame: &mut Frame, area: Rect) {
    let editing = app.input_mode == InputMode::Editing;
    let border_color = if editing { Color::Yellow } else { Color::DarkGray };
    let title = if app.is_waiting() { " Ask (waiting for reply) " } else { " Ask " };

    let input_block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(border_color))
        .title(title);

    // Horizontal scrolling keeps the cursor visible
    let inner_width = area.width.saturating_sub(2) as usize;
    let scroll_offset = if inner_width > 0 && app.cursor >= inner_width {
        app.cursor - inner_width + 1
    } else {
        0
    };

    let visible_text: String = app.input
        .chars()
        .skip(scroll_offset)
        .take(inner_width)
        .collect();

    let input = Paragraph::new(visible_text)
        .style(Style::default().fg(Color::Cyan))
        .block(input_block);
    frame.render_widget(input, area);

    if editing {
        let cursor_x = (app.cursor - scroll_offset) as u16;
        frame.set_cursor_position((area.x + cursor_x + 1, area.y + 1));
    }
}

fn render_footer(app: &App, frame: &mut Frame, area: Rect) {
    let (mode_text, mode_style, hints) = match app.input_mode {
        InputMode::Editing => (
            " ASK ",
            Style::default().bg(Color::Yellow).fg(Color::Black),
            " Enter: send  Esc: scroll mode  PgUp/PgDn: scroll  Ctrl-C: quit",
        ),
        InputMode::Normal => (
            " SCROLL ",
            Style::default().bg(Color::Blue).fg(Color::White),
            " j/k: scroll  g/G: top/bottom  i: ask  q: quit",
        ),
    };

    let footer = Line::from(vec![
        Span::styled(mode_text, mode_style),
        Span::styled(hints, Style::default().fg(Color::DarkGray)),
    ]);
    frame.render_widget(Paragraph::new(footer), area);
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use beauty_chat_core::{CompletionClient, Message, RenderSink};
    use ratatui::backend::TestBackend;
    use ratatui::Terminal;
    use std::sync::Arc;

    struct NoClient;

    #[async_trait]
    impl CompletionClient for NoClient {
        async fn send(&self, _conversation: &[Message]) -> String {
            String::new()
        }
    }

    fn line_text(line: &Line) -> String {
        line.spans.iter().map(|s| s.content.as_ref()).collect()
    }

    #[test]
    fn test_parse_markdown_bold() {
        let line = parse_markdown_line("Try **Revitalift** tonight");
        assert_eq!(line.spans.len(), 3);
        assert_eq!(line.spans[1].content, "Revitalift");
        assert!(line.spans[1].style.add_modifier.contains(Modifier::BOLD));
        assert_eq!(line_text(&line), "Try Revitalift tonight");
    }

    #[test]
    fn test_parse_markdown_unclosed_is_literal() {
        let line = parse_markdown_line("a **b");
        assert_eq!(line_text(&line), "a **b");
        let line = parse_markdown_line("5 * 3");
        assert_eq!(line_text(&line), "5 * 3");
    }

    #[test]
    fn test_chat_lines_layout() {
        let entries = vec![
            ChatEntry::Row { sender: Sender::User, text: "Best serum?".to_string() },
            ChatEntry::Highlight("Best serum?".to_string()),
            ChatEntry::Placeholder,
        ];
        let text: Vec<String> = chat_lines(&entries).iter().map(line_text).collect();
        assert_eq!(
            text,
            vec![
                "[You]",
                "Best serum?",
                "",
                "You asked: \"Best serum?\"",
                "",
                "[L]",
                "Thinking...",
                "",
            ]
        );
    }

    #[test]
    fn test_render_draws_greeting() {
        let mut app = App::new(Arc::new(NoClient), "http://localhost:8787/");
        let mut terminal = Terminal::new(TestBackend::new(60, 16)).unwrap();
        terminal.draw(|frame| render(&mut app, frame)).unwrap();

        let buffer = terminal.backend().buffer();
        let screen: String = buffer.content().iter().map(|cell| cell.symbol()).collect();
        assert!(screen.contains("[L]"));
        assert!(screen.contains("Hello!"));
        assert_eq!(app.chat_height, 16 - 1 - 3 - 1 - 2);
    }

    fn screen_text(terminal: &Terminal<TestBackend>) -> String {
        let buffer = terminal.backend().buffer();
        let width = buffer.area.width as usize;
        buffer
            .content()
            .chunks(width)
            .map(|row| row.iter().map(|cell| cell.symbol()).collect::<String>())
            .collect::<Vec<_>>()
            .join("\n")
    }

    #[test]
    fn test_follow_keeps_newest_wrapped_row_visible() {
        let mut app = App::new(Arc::new(NoClient), "http://localhost:8787/");
        let long = "aaaaaaa bbbbbbb ccccccc ddddddd eeeeeee fffffff ggggggg";
        for _ in 0..4 {
            app.view.append_row(Sender::Ai, long);
        }
        app.view.append_row(Sender::Ai, "NEWEST");

        let mut terminal = Terminal::new(TestBackend::new(22, 16)).unwrap();
        terminal.draw(|frame| render(&mut app, frame)).unwrap();

        // Word wrapping at 20 columns puts each long row on 4 lines
        assert!(app.content_height >= 3 + 4 * (1 + 4 + 1) + 3);
        assert!(screen_text(&terminal).contains("NEWEST"));
    }

    #[test]
    fn test_huge_reply_scrolls_without_overflow() {
        let mut app = App::new(Arc::new(NoClient), "http://localhost:8787/");
        app.view.append_row(Sender::Ai, &"x\n".repeat(70_000));

        let mut terminal = Terminal::new(TestBackend::new(60, 16)).unwrap();
        terminal.draw(|frame| render(&mut app, frame)).unwrap();

        assert!(app.content_height > u16::MAX as usize);
        assert_eq!(app.scroll, u16::MAX);
    }
}
