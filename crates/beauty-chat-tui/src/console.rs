//! Plain stdout rendering for one-shot `ask` runs.

use beauty_chat_core::persona::{self, PLACEHOLDER};
use beauty_chat_core::{RenderSink, Sender};
use colored::*;
use std::io::{self, Write};

pub struct ConsoleSink<W: Write> {
    out: W,
    placeholder_shown: bool,
}

impl ConsoleSink<io::Stdout> {
    pub fn stdout() -> Self {
        Self::new(io::stdout())
    }
}

impl<W: Write> ConsoleSink<W> {
    pub fn new(out: W) -> Self {
        Self { out, placeholder_shown: false }
    }

    #[cfg(test)]
    fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> RenderSink for ConsoleSink<W> {
    fn append_row(&mut self, sender: Sender, text: &str) {
        let avatar = format!("[{}]", sender.avatar());
        let avatar = match sender {
            Sender::User => avatar.cyan().bold(),
            Sender::Ai => avatar.yellow().bold(),
        };
        let _ = writeln!(self.out, "{} {}\n", avatar, text);
    }

    fn replace_highlight(&mut self, question: &str) {
        let _ = writeln!(self.out, "{}\n", persona::highlight_text(question).magenta().italic());
    }

    fn show_placeholder(&mut self) {
        // Printed without a newline so removal can rub it out
        let _ = write!(self.out, "{}", PLACEHOLDER.dimmed());
        let _ = self.out.flush();
        self.placeholder_shown = true;
    }

    fn remove_placeholder(&mut self) {
        if std::mem::take(&mut self.placeholder_shown) {
            let _ = write!(self.out, "\r{}\r", " ".repeat(PLACEHOLDER.len()));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_console_rows_and_highlight() {
        colored::control::set_override(false);
        let mut sink = ConsoleSink::new(Vec::new());
        sink.append_row(Sender::User, "Best serum?");
        sink.replace_highlight("Best serum?");
        sink.append_row(Sender::Ai, "Try X serum");

        let out = String::from_utf8(sink.into_inner()).unwrap();
        assert_eq!(out, "[You] Best serum?\n\nYou asked: \"Best serum?\"\n\n[L] Try X serum\n\n");
    }

    #[test]
    fn test_console_placeholder_is_rubbed_out() {
        colored::control::set_override(false);
        let mut sink = ConsoleSink::new(Vec::new());
        sink.show_placeholder();
        sink.remove_placeholder();
        sink.remove_placeholder();

        let out = String::from_utf8(sink.into_inner()).unwrap();
        assert_eq!(out, "Thinking...\r           \r");
    }
}
