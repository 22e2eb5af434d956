// tokio-scrollbar/src/widgets/scroll_view/mod.rs
mod terminal_host;
pub use terminal_host::*;

mod scroll_view_widget;
pub use scroll_view_widget::*;
