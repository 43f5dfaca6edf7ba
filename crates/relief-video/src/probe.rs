//! Frame rate probing with ffprobe

use relief_core::{ReliefError, Result};
use std::path::Path;
use std::process::{Command, Stdio};

/// Parse an ffprobe rate such as `30000/1001` or `25`
pub fn parse_frame_rate(raw: &str) -> Option<f64> {
    let raw = raw.trim();
    let rate = match raw.split_once('/') {
        Some((num, den)) => {
            let num: f64 = num.trim().parse().ok()?;
            let den: f64 = den.trim().parse().ok()?;
            if den == 0.0 {
                return None;
            }
            num / den
        }
        None => raw.parse().ok()?,
    };
    (rate.is_finite() && rate > 0.0).then_some(rate)
}

/// Ask ffprobe for the first video stream's frame rate
pub fn probe_frame_rate(ffprobe: &str, video: &Path) -> Result<f64> {
    let output = Command::new(ffprobe)
        .args([
            "-v",
            "error",
            "-select_streams",
            "v:0",
            "-show_entries",
            "stream=r_frame_rate",
            "-of",
            "default=noprint_wrappers=1:nokey=1",
        ])
        .arg(video)
        .stdin(Stdio::null())
        .output()
        .map_err(|e| ReliefError::CaptureError(format!("failed to run {}: {}", ffprobe, e)))?;

    if !output.status.success() {
        return Err(ReliefError::CaptureError(format!(
            "{} exited with {}: {}",
            ffprobe,
            output.status,
            String::from_utf8_lossy(&output.stderr).trim()
        )));
    }

    let stdout = String::from_utf8_lossy(&output.stdout);
    stdout
        .lines()
        .find_map(parse_frame_rate)
        .ok_or_else(|| {
            ReliefError::CaptureError(format!(
                "no frame rate reported for {}",
                video.display()
            ))
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_fractions_and_integers() {
        assert_eq!(parse_frame_rate("25/1"), Some(25.0));
        assert_eq!(parse_frame_rate("30"), Some(30.0));
        assert_eq!(parse_frame_rate(" 24 / 1 \n"), Some(24.0));
        let ntsc = parse_frame_rate("30000/1001").unwrap();
        assert!((ntsc - 29.97).abs() < 0.01);
    }

    #[test]
    fn rejects_degenerate_rates() {
        assert_eq!(parse_frame_rate("0/0"), None);
        assert_eq!(parse_frame_rate("0"), None);
        assert_eq!(parse_frame_rate("-5"), None);
        assert_eq!(parse_frame_rate("N/A"), None);
        assert_eq!(parse_frame_rate(""), None);
    }

    #[test]
    fn missing_ffprobe_is_capture_error() {
        let err = probe_frame_rate("relief-no-such-ffprobe", Path::new("a.mp4")).unwrap_err();
        assert!(matches!(err, ReliefError::CaptureError(_)));
    }
}
