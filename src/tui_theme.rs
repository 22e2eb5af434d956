// tokio-scrollbar/src/tui_theme.rs
use ratatui::style::Color;

#[cfg(windows)]
pub const THUMB_SYMBOL: &str = "▃";
#[cfg(not(windows))]
pub const THUMB_SYMBOL: &str = "🬋";

pub const THUMB_SYMBOL_VERTICAL: &str = "█";

pub const BORDER_DEFAULT: Color = Color::Rgb(100, 100, 100);
pub const SCROLLBAR_DEFAULT: Color = Color::Rgb(200, 200, 200);
pub const BORDER_FOCUSED: Color = Color::Yellow;
pub const BORDER_ACTIVE: Color = Color::White;

pub const TEXT_FG: Color = Color::White;
pub const HINT_FG: Color = Color::Rgb(70, 70, 70);
