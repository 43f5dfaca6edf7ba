//! Relief Video - frame sources
//!
//! Video files and cameras are decoded by an ffmpeg subprocess; a directory
//! of still images can stand in for either.

mod ffmpeg;
mod probe;
mod sequence;
mod source;

pub use ffmpeg::{output_args, FfmpegSource, RawFrameReader};
pub use probe::{parse_frame_rate, probe_frame_rate};
pub use sequence::ImageSequenceSource;
pub use source::{open_source, FrameSource, SourceSpec};
