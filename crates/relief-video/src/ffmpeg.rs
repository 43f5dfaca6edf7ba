//! Video file and camera capture through an ffmpeg subprocess
//!
//! ffmpeg scales every frame to the fixed capture size and writes packed
//! RGB24 to stdout, so each frame is exactly `width * height * 3` bytes.

use ffmpeg_sidecar::child::FfmpegChild;
use ffmpeg_sidecar::command::FfmpegCommand;
use image::RgbImage;
use relief_core::config::CaptureConfig;
use relief_core::{ReliefError, Result};
use std::io::{BufRead, BufReader, ErrorKind, Read};
use std::path::Path;
use std::process::ChildStdout;

use crate::probe::probe_frame_rate;
use crate::source::FrameSource;

/// Splits a raw RGB24 byte stream into frames
pub struct RawFrameReader<R> {
    reader: R,
    width: u32,
    height: u32,
    buffer: Vec<u8>,
}

impl<R: Read> RawFrameReader<R> {
    pub fn new(reader: R, width: u32, height: u32) -> Self {
        Self {
            reader,
            width,
            height,
            buffer: vec![0; (width * height * 3) as usize],
        }
    }

    /// Next full frame; `None` at end of stream, including a truncated last frame
    pub fn next_frame(&mut self) -> Result<Option<RgbImage>> {
        match self.reader.read_exact(&mut self.buffer) {
            Ok(()) => {}
            Err(e) if e.kind() == ErrorKind::UnexpectedEof => return Ok(None),
            Err(e) => {
                return Err(ReliefError::CaptureError(format!(
                    "failed to read frame: {}",
                    e
                )))
            }
        }

        RgbImage::from_raw(self.width, self.height, self.buffer.clone())
            .map(Some)
            .ok_or_else(|| ReliefError::CaptureError("frame buffer size mismatch".into()))
    }
}

/// Arguments that make ffmpeg emit scaled raw RGB24 frames on stdout
pub fn output_args(width: u32, height: u32) -> Vec<String> {
    vec![
        "-an".into(),
        "-vf".into(),
        format!("scale={}:{}", width, height),
        "-f".into(),
        "rawvideo".into(),
        "-pix_fmt".into(),
        "rgb24".into(),
        "-".into(),
    ]
}

/// Frames decoded by a child ffmpeg process
pub struct FfmpegSource {
    child: FfmpegChild,
    frames: RawFrameReader<ChildStdout>,
    native_fps: Option<f64>,
    label: String,
    frames_read: u64,
}

impl FfmpegSource {
    /// Decode a video file. The native frame rate comes from ffprobe; if that
    /// fails the source is unpaced.
    pub fn open_file(capture: &CaptureConfig, path: &Path, width: u32, height: u32) -> Result<Self> {
        let native_fps = match probe_frame_rate(&capture.ffprobe, path) {
            Ok(fps) => Some(fps),
            Err(e) => {
                log::warn!("Could not determine frame rate, playing unpaced: {}", e);
                None
            }
        };

        let mut command = Self::base_command(capture);
        command.input(path.to_string_lossy().as_ref());
        command.args(output_args(width, height));

        Self::spawn(command, format!("file {}", path.display()), width, height, native_fps)
    }

    /// Capture from the configured camera device
    pub fn open_camera(capture: &CaptureConfig, width: u32, height: u32) -> Result<Self> {
        let mut command = Self::base_command(capture);
        command.format(&capture.camera_format);
        command.input(&capture.camera_device);
        command.args(output_args(width, height));

        Self::spawn(
            command,
            format!("camera {} ({})", capture.camera_device, capture.camera_format),
            width,
            height,
            None,
        )
    }

    fn base_command(capture: &CaptureConfig) -> FfmpegCommand {
        let mut command = FfmpegCommand::new_with_path(&capture.ffmpeg);
        command.hide_banner();
        command.args(["-loglevel", "error"]);
        command
    }

    fn spawn(
        mut command: FfmpegCommand,
        label: String,
        width: u32,
        height: u32,
        native_fps: Option<f64>,
    ) -> Result<Self> {
        let mut child = command
            .spawn()
            .map_err(|e| ReliefError::CaptureError(format!("failed to start ffmpeg: {}", e)))?;

        let stdout = child
            .take_stdout()
            .ok_or_else(|| ReliefError::CaptureError("ffmpeg stdout unavailable".into()))?;

        // Forward ffmpeg's complaints to the log; also keeps the pipe from filling
        if let Some(stderr) = child.take_stderr() {
            std::thread::spawn(move || {
                for line in BufReader::new(stderr).lines().map_while(|l| l.ok()) {
                    log::warn!("ffmpeg: {}", line);
                }
            });
        }

        log::debug!("Started ffmpeg for {} at {}x{}", label, width, height);

        Ok(Self {
            child,
            frames: RawFrameReader::new(stdout, width, height),
            native_fps,
            label,
            frames_read: 0,
        })
    }
}

impl FrameSource for FfmpegSource {
    fn read(&mut self) -> Result<Option<RgbImage>> {
        let frame = self.frames.next_frame()?;
        match &frame {
            Some(_) => self.frames_read += 1,
            None => log::info!("{} ended after {} frames", self.label, self.frames_read),
        }
        Ok(frame)
    }

    fn native_fps(&self) -> Option<f64> {
        self.native_fps
    }

    fn describe(&self) -> String {
        match self.native_fps {
            Some(fps) => format!("{} @ {:.2} fps", self.label, fps),
            None => self.label.clone(),
        }
    }
}

impl Drop for FfmpegSource {
    fn drop(&mut self) {
        if let Err(e) = self.child.kill() {
            log::debug!("ffmpeg already exited: {}", e);
        }
        let _ = self.child.wait();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn output_args_scale_to_capture_size() {
        let args = output_args(640, 480);
        assert!(args.windows(2).any(|w| w == ["-vf", "scale=640:480"]));
        assert!(args.windows(2).any(|w| w == ["-pix_fmt", "rgb24"]));
        assert_eq!(args.last().map(String::as_str), Some("-"));
    }

    #[test]
    fn reads_consecutive_frames() {
        let mut bytes = vec![10u8; 2 * 2 * 3];
        bytes.extend(vec![200u8; 2 * 2 * 3]);
        let mut reader = RawFrameReader::new(Cursor::new(bytes), 2, 2);

        let first = reader.next_frame().unwrap().unwrap();
        assert_eq!(first.dimensions(), (2, 2));
        assert_eq!(first.get_pixel(1, 1).0, [10, 10, 10]);

        let second = reader.next_frame().unwrap().unwrap();
        assert_eq!(second.get_pixel(0, 0).0, [200, 200, 200]);

        assert!(reader.next_frame().unwrap().is_none());
    }

    #[test]
    fn truncated_frame_ends_stream() {
        let mut reader = RawFrameReader::new(Cursor::new(vec![1u8; 7]), 2, 2);
        assert!(reader.next_frame().unwrap().is_none());
    }

    #[test]
    fn empty_stream_has_no_frames() {
        let mut reader = RawFrameReader::new(Cursor::new(Vec::new()), 4, 3);
        assert!(reader.next_frame().unwrap().is_none());
    }
}
