// tokio-scrollbar/src/lib.rs
extern crate self as tokio_scrollbar;

mod widgets;
pub use widgets::*;

mod tui;
pub use tui::*;

pub mod tui_theme;

pub use ratatui;
