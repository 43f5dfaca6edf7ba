//! Relief Audio - the video's soundtrack
//!
//! Extracts the audio track of a video file once and plays it back looped
//! through Kira.

mod extract;
mod soundtrack;

pub use extract::{extract_audio, soundtrack_path};
pub use soundtrack::{amplitude_to_db, SoundtrackPlayer};
