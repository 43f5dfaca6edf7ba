//! Relief Runtime - Tick loop building blocks
//!
//! - `GameClock` - per-tick delta time and frame rate
//! - `FramePacer` - holds ticks to the source video's frame rate
//! - `CaptureSchedule` - decides which ticks capture a new frame
//! - `InputState` - keyboard and mouse tracking with action bindings
//! - `LiveControls` - values the overlay widgets adjust while running

mod clock;
mod controls;
mod input;
mod schedule;

pub use clock::{FramePacer, GameClock};
pub use controls::LiveControls;
pub use input::InputState;
pub use schedule::CaptureSchedule;
