// tokio-scrollbar/src/tui/tui_app.rs
use anyhow::Result;
use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture, KeyEvent, MouseEvent},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{Terminal, prelude::CrosstermBackend};
use std::{
    io::stdout,
    time::{Duration, Instant},
};
use tracing::{debug, warn};

use crate::tui::input_backend::InputHandler;

pub trait TuiApp {
    fn render(&mut self, frame: &mut TerminalFrame);
    #[allow(unused)]
    fn handle_mouse_events(&mut self, mouse_events: Vec<MouseEvent>) {}
    fn handle_key_events(&mut self, key_events: Vec<KeyEvent>);
    fn should_quit(&self) -> bool;
    fn should_draw(&mut self) -> bool {
        true
    }
}
pub use ratatui::{buffer::Buffer, layout::Rect};

// Widget trait that all renderable components must implement
pub trait TuiWidget: Send + Sync {
    fn draw(&mut self, area: Rect, buf: &mut Buffer);
    fn key_event(&mut self, event: KeyEvent) -> bool; // Return true if handled
    #[allow(unused)]
    fn mouse_event(&mut self, event: MouseEvent) -> bool {
        false
    }
    fn focus(&mut self);
    fn unfocus(&mut self);
    fn is_focused(&self) -> bool;
    fn need_draw(&self) -> bool {
        true
    }
}

pub type TerminalFrame<'a> = ratatui::Frame<'a>;

const DEFAULT_FRAME_TIME: Duration = Duration::from_millis(16);

/// Terminal runner: raw mode, alternate screen and mouse capture around a
/// frame loop.
pub struct Tui {
    input: Option<InputHandler>,
    frame_sync: bool,
    frame_length: Duration,
}

impl Tui {
    pub fn new() -> Result<Self> {
        Ok(Tui {
            input: Some(InputHandler::new()),
            frame_sync: true,
            frame_length: DEFAULT_FRAME_TIME,
        })
    }

    pub fn without_input_capture(mut self) -> Self {
        self.input = None;
        self
    }

    pub fn without_frame_sync(mut self) -> Self {
        self.frame_sync = false;
        self
    }

    pub fn with_frame_length(mut self, frame_time: Duration) -> Self {
        self.frame_length = frame_time;
        self
    }

    /// Run `app` until it asks to quit. Must be called inside a tokio runtime.
    pub fn run<A: TuiApp>(mut self, mut app: A) -> Result<A> {
        enable_raw_mode()?;
        execute!(stdout(), EnterAlternateScreen, EnableMouseCapture)?;
        let mut terminal = Terminal::new(CrosstermBackend::new(stdout()))?;

        if let Some(input) = &mut self.input {
            input.start()?;
        }
        debug!(frame_length = ?self.frame_length, "terminal loop started");

        let result = self.event_loop(&mut terminal, &mut app);

        if let Some(input) = &mut self.input {
            input.stop();
        }

        // Restore the terminal even when the loop failed.
        disable_raw_mode()?;
        execute!(
            terminal.backend_mut(),
            LeaveAlternateScreen,
            DisableMouseCapture
        )?;

        if let Err(err) = &result {
            warn!("terminal loop failed: {err:#}");
        }
        result.map(|()| app)
    }

    fn event_loop<A: TuiApp>(
        &mut self,
        terminal: &mut Terminal<CrosstermBackend<std::io::Stdout>>,
        app: &mut A,
    ) -> Result<()> {
        let mut last_size = ratatui::layout::Size::default();
        while !app.should_quit() {
            let frame_start = Instant::now();

            if let Some((key_events, mouse_events)) =
                self.input.as_mut().and_then(InputHandler::flush_events)
            {
                if let Some(events) = key_events {
                    app.handle_key_events(events);
                }
                if let Some(events) = mouse_events {
                    app.handle_mouse_events(events);
                }
            }

            let size = terminal.size().unwrap_or(last_size);
            let resized = size != last_size;
            if app.should_draw() || resized {
                last_size = size;
                terminal.draw(|frame| app.render(frame))?;
            }

            if self.frame_sync {
                let elapsed = frame_start.elapsed();
                if elapsed < self.frame_length {
                    std::thread::sleep(self.frame_length - elapsed);
                }
            }
        }
        Ok(())
    }
}
