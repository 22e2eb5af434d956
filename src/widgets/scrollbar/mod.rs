// tokio-scrollbar/src/widgets/scrollbar/mod.rs
mod config;
pub use config::*;

mod geometry;
pub use geometry::*;

mod interaction;
pub use interaction::*;

mod input;
pub use input::*;

mod flasher;
pub use flasher::*;

mod host;
pub use host::*;

mod controller;
pub use controller::*;
