use std::io::{self, Stderr};
use std::time::Duration;
use anyhow::Result;
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyEvent, KeyEventKind, MouseEvent},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use futures_util::StreamExt;
use tokio::sync::mpsc;

pub type Tui = Terminal<CrosstermBackend<Stderr>>;

/// How often the run loop wakes to check on an outstanding reply.
const TICK_RATE: Duration = Duration::from_millis(200);

#[derive(Debug)]
pub enum AppEvent {
    Key(KeyEvent),
    Mouse(MouseEvent),
    Resize,
    Tick,
}

pub struct EventHandler {
    rx: mpsc::UnboundedReceiver<AppEvent>,
}

impl EventHandler {
    pub fn new() -> Self {
        let (tx, rx) = mpsc::unbounded_channel();

        tokio::spawn(async move {
            let mut reader = event::EventStream::new();
            let mut ticker = tokio::time::interval(TICK_RATE);

            loop {
                let app_event = tokio::select! {
                    _ = ticker.tick() => Some(AppEvent::Tick),
                    maybe = reader.next() => match maybe {
                        // Key release/repeat events are dropped
                        Some(Ok(Event::Key(key))) if key.kind == KeyEventKind::Press => Some(AppEvent::Key(key)),
                        Some(Ok(Event::Mouse(mouse))) => Some(AppEvent::Mouse(mouse)),
                        Some(Ok(Event::Resize(_, _))) => Some(AppEvent::Resize),
                        Some(Ok(_)) => None,
                        Some(Err(err)) => {
                            tracing::warn!(error = %err, "terminal event stream error");
                            None
                        }
                        None => break,
                    },
                };

                if let Some(event) = app_event {
                    if tx.send(event).is_err() {
                        break;
                    }
                }
            }
        });

        Self { rx }
    }

    pub async fn next(&mut self) -> Option<AppEvent> {
        self.rx.recv().await
    }
}

pub fn init() -> Result<Tui> {
    enable_raw_mode()?;
    execute!(io::stderr(), EnterAlternateScreen, EnableMouseCapture)?;

    let backend = CrosstermBackend::new(io::stderr());
    let terminal = Terminal::new(backend)?;

    Ok(terminal)
}

pub fn restore() -> Result<()> {
    execute!(io::stderr(), DisableMouseCapture, LeaveAlternateScreen)?;
    disable_raw_mode()?;
    Ok(())
}

/// Install panic hook to restore terminal on panic
pub fn install_panic_hook() {
    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic_info| {
        let _ = restore();
        original_hook(panic_info);
    }));
}
