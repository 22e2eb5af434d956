// tokio-scrollbar/src/widgets/mod.rs
mod scrollbar;
pub use scrollbar::*;

mod scroll_view;
pub use scroll_view::*;
