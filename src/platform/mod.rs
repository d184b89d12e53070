//! Platform layer: window, event loop, keyboard and frame pacing

mod app;
pub mod clock;
pub mod input;

pub use app::run;
pub use clock::{FpsCounter, FrameClock};
pub use input::InputState;
