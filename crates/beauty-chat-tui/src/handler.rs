use crossterm::event::{KeyCode, KeyEvent, KeyModifiers, MouseEvent, MouseEventKind};
use ratatui::layout::Rect;
use crate::app::{App, InputMode};
use crate::tui::AppEvent;

/// Convert a character index to a byte index for UTF-8 safe string operations
fn char_to_byte_index(s: &str, char_idx: usize) -> usize {
    s.char_indices()
        .nth(char_idx)
        .map(|(i, _)| i)
        .unwrap_or(s.len())
}

pub fn handle_event(app: &mut App, event: AppEvent) {
    match event {
        AppEvent::Key(key) => handle_key(app, key),
        AppEvent::Mouse(mouse) => handle_mouse(app, mouse),
        // Redraw happens every loop iteration; the reply is polled there too
        AppEvent::Resize | AppEvent::Tick => {}
    }
}

fn handle_key(app: &mut App, key: KeyEvent) {
    // Global keys that work in any mode
    if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
        app.should_quit = true;
        return;
    }

    match app.input_mode {
        InputMode::Normal => handle_normal_mode(app, key),
        InputMode::Editing => handle_editing_mode(app, key),
    }
}

fn handle_normal_mode(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Char('q') => app.should_quit = true,

        KeyCode::Char('i') | KeyCode::Enter => app.input_mode = InputMode::Editing,

        // Chat scrolling
        KeyCode::Char('j') | KeyCode::Down => app.scroll_down(1),
        KeyCode::Char('k') | KeyCode::Up => app.scroll_up(1),
        KeyCode::Char('d') if key.modifiers.contains(KeyModifiers::CONTROL) => {
            app.scroll_down(app.half_page());
        }
        KeyCode::Char('u') if key.modifiers.contains(KeyModifiers::CONTROL) => {
            app.scroll_up(app.half_page());
        }
        KeyCode::PageDown => app.scroll_down(app.chat_height.max(1)),
        KeyCode::PageUp => app.scroll_up(app.chat_height.max(1)),
        KeyCode::Char('g') => app.scroll = 0,
        KeyCode::Char('G') => app.scroll_to_bottom(),

        _ => {}
    }
}

fn handle_editing_mode(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Esc => {
            app.input_mode = InputMode::Normal;
        }
        KeyCode::Enter => {
            app.submit_input();
        }
        KeyCode::Backspace => {
            if app.cursor > 0 {
                app.cursor -= 1;
                let byte_pos = char_to_byte_index(&app.input, app.cursor);
                app.input.remove(byte_pos);
            }
        }
        KeyCode::Delete => {
            let char_count = app.input.chars().count();
            if app.cursor < char_count {
                let byte_pos = char_to_byte_index(&app.input, app.cursor);
                app.input.remove(byte_pos);
            }
        }
        KeyCode::Left => {
            app.cursor = app.cursor.saturating_sub(1);
        }
        KeyCode::Right => {
            let char_count = app.input.chars().count();
            app.cursor = (app.cursor + 1).min(char_count);
        }
        KeyCode::Home => {
            app.cursor = 0;
        }
        KeyCode::End => {
            app.cursor = app.input.chars().count();
        }
        KeyCode::PageDown => app.scroll_down(app.chat_height.max(1)),
        KeyCode::PageUp => app.scroll_up(app.chat_height.max(1)),
        KeyCode::Char(c) => {
            let byte_pos = char_to_byte_index(&app.input, app.cursor);
            app.input.insert(byte_pos, c);
            app.cursor += 1;
        }
        _ => {}
    }
}

/// Check if a point is within a rectangle
fn point_in_rect(x: u16, y: u16, rect: Rect) -> bool {
    x >= rect.x && x < rect.x + rect.width && y >= rect.y && y < rect.y + rect.height
}

fn handle_mouse(app: &mut App, mouse: MouseEvent) {
    let in_chat = app
        .chat_area
        .map(|r| point_in_rect(mouse.column, mouse.row, r))
        .unwrap_or(false);
    if !in_chat {
        return;
    }

    match mouse.kind {
        MouseEventKind::ScrollDown => app.scroll_down(3),
        MouseEventKind::ScrollUp => app.scroll_up(3),
        _ => {}
    }
}
