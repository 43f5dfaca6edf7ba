//! Pulls the audio track out of a video file with ffmpeg

use ffmpeg_sidecar::command::FfmpegCommand;
use relief_core::{ReliefError, Result};
use std::io::Read;
use std::path::{Path, PathBuf};

/// Where the extracted soundtrack for `video` lives: next to it, as `.ogg`
pub fn soundtrack_path(video: &Path) -> PathBuf {
    video.with_extension("ogg")
}

/// Transcode the first audio stream of `video` to Ogg Vorbis.
///
/// An existing soundtrack file is reused as-is.
pub fn extract_audio(ffmpeg: &str, video: &Path) -> Result<PathBuf> {
    let output = soundtrack_path(video);
    if output.exists() {
        log::debug!("Reusing soundtrack {}", output.display());
        return Ok(output);
    }

    log::info!("Extracting soundtrack to {}", output.display());

    let mut command = FfmpegCommand::new_with_path(ffmpeg);
    command
        .hide_banner()
        .args(["-nostdin", "-loglevel", "error"])
        .input(video.to_string_lossy().as_ref())
        .args(["-map", "0:a", "-vn", "-c:a", "libvorbis"])
        .output(output.to_string_lossy().as_ref());

    let mut child = command
        .spawn()
        .map_err(|e| ReliefError::AudioError(format!("failed to start ffmpeg: {}", e)))?;

    let mut errors = String::new();
    if let Some(mut stderr) = child.take_stderr() {
        stderr.read_to_string(&mut errors).ok();
    }

    let status = child
        .wait()
        .map_err(|e| ReliefError::AudioError(format!("ffmpeg did not finish: {}", e)))?;

    if !status.success() || !output.exists() {
        // Partial output must not be reused on the next run
        std::fs::remove_file(&output).ok();
        return Err(ReliefError::AudioError(format!(
            "could not extract audio from {} ({}): {}",
            video.display(),
            status,
            errors.trim()
        )));
    }

    Ok(output)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn soundtrack_sits_next_to_video() {
        assert_eq!(
            soundtrack_path(Path::new("clips/surf.mp4")),
            PathBuf::from("clips/surf.ogg")
        );
        assert_eq!(
            soundtrack_path(Path::new("clips/no_extension")),
            PathBuf::from("clips/no_extension.ogg")
        );
    }

    #[test]
    fn existing_soundtrack_is_reused() {
        let dir = std::env::temp_dir().join(format!("relief_audio_{}", uuid::Uuid::new_v4()));
        std::fs::create_dir_all(&dir).unwrap();
        let video = dir.join("clip.mp4");
        std::fs::write(dir.join("clip.ogg"), b"already extracted").unwrap();

        // The ffmpeg binary is never consulted when the file exists
        let path = extract_audio("/nonexistent/ffmpeg", &video).unwrap();
        assert_eq!(path, dir.join("clip.ogg"));

        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn missing_ffmpeg_is_audio_error() {
        let dir = std::env::temp_dir().join(format!("relief_audio_{}", uuid::Uuid::new_v4()));
        std::fs::create_dir_all(&dir).unwrap();

        let result = extract_audio("/nonexistent/ffmpeg", &dir.join("clip.mp4"));
        assert!(matches!(result, Err(ReliefError::AudioError(_))));

        std::fs::remove_dir_all(&dir).ok();
    }
}
