// tokio-scrollbar/demos/scroll_view.rs
use std::{
    fs::OpenOptions,
    path::PathBuf,
    sync::{
        Arc,
        atomic::{AtomicUsize, Ordering},
    },
};

use anyhow::{Result, anyhow};
use clap::Parser;
use ratatui::{
    crossterm::event::{KeyCode, KeyEvent, KeyModifiers, MouseEvent},
    layout::{Constraint, Layout},
    style::Style,
    text::{Line, Span},
    widgets::{Paragraph, Widget},
};
use tokio_scrollbar::{
    ScrollTarget, ScrollView, ScrollbarArgs, TerminalFrame, Tui, TuiApp, TuiWidget as _,
    tui_theme,
};

const TITLE: &str = "Scrollbar Demo";

#[derive(Debug, Parser)]
#[command(about = "Scroll through generated lines with a skinned scrollbar")]
struct Cli {
    #[command(flatten)]
    scrollbar: ScrollbarArgs,
    /// Number of lines to generate
    #[arg(long, default_value_t = 200)]
    lines: usize,
    /// Start at the end and stay there while lines are appended
    #[arg(long)]
    follow: bool,
    /// Write diagnostics to this file
    #[arg(long)]
    log_file: Option<PathBuf>,
    /// Tracing filter, falls back to RUST_LOG
    #[arg(long)]
    log_filter: Option<String>,
}

struct ScrollDemoApp {
    view: ScrollView,
    moves: Arc<AtomicUsize>,
    appended: usize,
    quit: bool,
}

impl ScrollDemoApp {
    fn new(cli: &Cli) -> Result<Self> {
        let options = cli.scrollbar.resolve()?;
        let mut view = ScrollView::new(TITLE, options).follow(cli.follow);
        view.extend_lines((1..=cli.lines).map(demo_line));
        view.focus();

        let moves = Arc::new(AtomicUsize::new(0));
        let counter = moves.clone();
        view.on_move(move |_| {
            counter.fetch_add(1, Ordering::Relaxed);
        });

        Ok(Self {
            view,
            moves,
            appended: 0,
            quit: false,
        })
    }

    fn append_line(&mut self) {
        self.appended += 1;
        let line = demo_line(self.view.line_count() + 1);
        self.view.push_line(line);
        self.view
            .set_title(format!("{TITLE} [+{} appended]", self.appended));
    }

    fn status_line(&self) -> Line<'static> {
        let geometry = self.view.geometry();
        Line::from(vec![
            Span::styled(
                format!(
                    " offset {:.0}/{:.0}  thumb {:.1}  moves {} ",
                    geometry.content_position,
                    geometry.max_content_position(),
                    geometry.thumb_position,
                    self.moves.load(Ordering::Relaxed),
                ),
                Style::default().fg(tui_theme::TEXT_FG),
            ),
            Span::styled(
                " ^A append  ^T top  ^B bottom  ^Q quit",
                Style::default().fg(tui_theme::HINT_FG),
            ),
        ])
    }
}

impl TuiApp for ScrollDemoApp {
    fn should_draw(&mut self) -> bool {
        self.view.need_draw()
    }

    fn render(&mut self, frame: &mut TerminalFrame) {
        let area = frame.area();
        let [main_area, status_area] =
            Layout::vertical([Constraint::Fill(1), Constraint::Length(1)]).areas(area);
        let buf = frame.buffer_mut();
        self.view.draw(main_area, buf);
        Paragraph::new(self.status_line()).render(status_area, buf);
    }

    fn handle_mouse_events(&mut self, mouse_events: Vec<MouseEvent>) {
        for event in mouse_events {
            self.view.mouse_event(event);
        }
    }

    fn handle_key_events(&mut self, keys: Vec<KeyEvent>) {
        for key in keys {
            if self.view.key_event(key) {
                continue;
            }
            let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
            match key.code {
                KeyCode::Char('a') if ctrl => self.append_line(),
                KeyCode::Char('t') if ctrl => self.view.scroll_to(ScrollTarget::Offset(0.0)),
                KeyCode::Char('b') if ctrl => self.view.scroll_to(ScrollTarget::Bottom),
                KeyCode::Char('q') if ctrl => self.quit = true,
                KeyCode::Esc => self.quit = true,
                _ => {}
            }
        }
    }

    fn should_quit(&self) -> bool {
        self.quit
    }
}

fn demo_line(n: usize) -> String {
    let filler = "lorem ipsum dolor sit amet ".repeat(n % 7);
    format!("{n:>5}  {filler}")
}

fn init_tracing(cli: &Cli) -> Result<()> {
    let Some(path) = cli.log_file.as_ref() else {
        return Ok(());
    };

    let directives = cli
        .log_filter
        .clone()
        .or_else(|| std::env::var("RUST_LOG").ok())
        .unwrap_or_else(|| "debug".to_owned());
    let filter = tracing_subscriber::EnvFilter::try_new(directives.as_str())
        .map_err(|e| anyhow!("invalid tracing filter `{directives}`: {e}"))?;

    let file = OpenOptions::new()
        .create(true)
        .write(true)
        .truncate(true)
        .open(path)
        .map_err(|e| anyhow!("failed to open log file {}: {e}", path.display()))?;

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(file)
        .with_ansi(false)
        .with_target(true)
        .try_init()
        .map_err(|e| anyhow!("failed to initialize tracing subscriber: {e}"))?;

    tracing::info!(log_file = %path.display(), log_filter = %directives, "tracing enabled");
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(&cli)?;

    let app = ScrollDemoApp::new(&cli)?;
    let app = Tui::new()?.run(app)?;
    tracing::info!(moves = app.moves.load(Ordering::Relaxed), "demo finished");

    Ok(())
}
