//! Relief Physics - First-person movement inside the room
//!
//! A kinematic controller with gravity, jumping, optional flight and
//! axis-separated sliding against the room walls. No physics engine is
//! involved: the room is four planes and a floor.

mod character;
mod mouse;

pub use character::{ControllerInput, PlayerController};
pub use mouse::MouseMode;
