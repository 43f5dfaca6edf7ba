//! Frame source abstraction and selection

use image::RgbImage;
use relief_core::config::CaptureConfig;
use relief_core::{ReliefError, Result};
use std::path::{Path, PathBuf};

use crate::ffmpeg::FfmpegSource;
use crate::sequence::ImageSequenceSource;

/// Anything that yields frames one at a time
pub trait FrameSource {
    /// Next frame, or `None` once the source is exhausted
    fn read(&mut self) -> Result<Option<RgbImage>>;

    /// Frame rate the source was recorded at, if known
    fn native_fps(&self) -> Option<f64> {
        None
    }

    /// Human-readable description for logs
    fn describe(&self) -> String;
}

/// Where frames come from, as chosen on the command line
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SourceSpec {
    /// The default capture device
    Camera,
    /// A video file decoded by ffmpeg
    File(PathBuf),
    /// A directory of still images played in name order
    ImageSequence(PathBuf),
}

impl SourceSpec {
    /// No argument selects the camera; a directory selects an image sequence
    pub fn from_arg(arg: Option<&Path>) -> Self {
        match arg {
            None => SourceSpec::Camera,
            Some(path) if path.is_dir() => SourceSpec::ImageSequence(path.to_path_buf()),
            Some(path) => SourceSpec::File(path.to_path_buf()),
        }
    }

    /// The video file, when audio can be taken from it
    pub fn video_file(&self) -> Option<&Path> {
        match self {
            SourceSpec::File(path) => Some(path),
            _ => None,
        }
    }
}

/// Open the source described by `spec`, producing frames of `width × height`
pub fn open_source(
    spec: &SourceSpec,
    capture: &CaptureConfig,
    width: u32,
    height: u32,
) -> Result<Box<dyn FrameSource>> {
    let source: Box<dyn FrameSource> = match spec {
        SourceSpec::Camera => Box::new(FfmpegSource::open_camera(capture, width, height)?),
        SourceSpec::File(path) => {
            if !path.exists() {
                return Err(ReliefError::CaptureError(format!(
                    "video file not found: {}",
                    path.display()
                )));
            }
            Box::new(FfmpegSource::open_file(capture, path, width, height)?)
        }
        SourceSpec::ImageSequence(dir) => Box::new(ImageSequenceSource::open(dir)?),
    };
    log::info!("Frame source: {}", source.describe());
    Ok(source)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_argument_selects_camera() {
        assert_eq!(SourceSpec::from_arg(None), SourceSpec::Camera);
        assert_eq!(SourceSpec::Camera.video_file(), None);
    }

    #[test]
    fn directory_selects_image_sequence() {
        let dir = std::env::temp_dir();
        assert_eq!(
            SourceSpec::from_arg(Some(&dir)),
            SourceSpec::ImageSequence(dir.clone())
        );
    }

    #[test]
    fn other_paths_select_file() {
        let path = Path::new("clips/does_not_exist.mp4");
        let spec = SourceSpec::from_arg(Some(path));
        assert_eq!(spec, SourceSpec::File(path.to_path_buf()));
        assert_eq!(spec.video_file(), Some(path));
    }

    #[test]
    fn missing_file_is_capture_error() {
        let spec = SourceSpec::File(PathBuf::from("/nonexistent/relief.mp4"));
        let err = open_source(&spec, &CaptureConfig::default(), 64, 48)
            .err()
            .unwrap();
        assert!(matches!(err, ReliefError::CaptureError(_)));
    }
}
