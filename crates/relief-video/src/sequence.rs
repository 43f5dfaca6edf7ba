//! Still images played back as a frame source

use image::RgbImage;
use relief_core::{ReliefError, Result};
use std::path::{Path, PathBuf};

use crate::source::FrameSource;

const IMAGE_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "bmp"];

/// Plays every image in a directory once, in file name order
pub struct ImageSequenceSource {
    dir: PathBuf,
    frames: Vec<PathBuf>,
    next: usize,
}

impl ImageSequenceSource {
    pub fn open(dir: &Path) -> Result<Self> {
        let mut frames: Vec<PathBuf> = std::fs::read_dir(dir)?
            .filter_map(|entry| entry.ok().map(|e| e.path()))
            .filter(|path| path.is_file() && is_image(path))
            .collect();
        frames.sort();

        if frames.is_empty() {
            return Err(ReliefError::CaptureError(format!(
                "no images found in {}",
                dir.display()
            )));
        }

        Ok(Self {
            dir: dir.to_path_buf(),
            frames,
            next: 0,
        })
    }

    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }
}

fn is_image(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| IMAGE_EXTENSIONS.contains(&ext.to_ascii_lowercase().as_str()))
}

impl FrameSource for ImageSequenceSource {
    fn read(&mut self) -> Result<Option<RgbImage>> {
        let Some(path) = self.frames.get(self.next) else {
            return Ok(None);
        };
        self.next += 1;

        let image = image::open(path).map_err(|e| {
            ReliefError::ImageError(format!("failed to decode {}: {}", path.display(), e))
        })?;
        Ok(Some(image.to_rgb8()))
    }

    fn describe(&self) -> String {
        format!("{} images in {}", self.frames.len(), self.dir.display())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgb;

    fn temp_dir() -> PathBuf {
        let dir = std::env::temp_dir().join(format!("relief_seq_{}", uuid::Uuid::new_v4()));
        std::fs::create_dir_all(&dir).unwrap();
        dir
    }

    fn write_frame(dir: &Path, name: &str, value: u8) {
        RgbImage::from_pixel(4, 3, Rgb([value, value, value]))
            .save(dir.join(name))
            .unwrap();
    }

    #[test]
    fn plays_images_in_name_order() {
        let dir = temp_dir();
        write_frame(&dir, "frame_002.png", 200);
        write_frame(&dir, "frame_001.png", 100);
        std::fs::write(dir.join("notes.txt"), "not a frame").unwrap();

        let mut source = ImageSequenceSource::open(&dir).unwrap();
        assert_eq!(source.len(), 2);

        let first = source.read().unwrap().unwrap();
        assert_eq!(first.dimensions(), (4, 3));
        assert_eq!(first.get_pixel(0, 0).0, [100, 100, 100]);
        let second = source.read().unwrap().unwrap();
        assert_eq!(second.get_pixel(0, 0).0, [200, 200, 200]);
        assert!(source.read().unwrap().is_none());

        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn undecodable_frame_is_an_image_error() {
        let dir = temp_dir();
        std::fs::write(dir.join("frame_001.png"), b"not a png").unwrap();

        let mut source = ImageSequenceSource::open(&dir).unwrap();
        assert!(matches!(source.read(), Err(ReliefError::ImageError(_))));

        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn empty_directory_is_rejected() {
        let dir = temp_dir();
        let result = ImageSequenceSource::open(&dir);
        assert!(matches!(result, Err(ReliefError::CaptureError(_))));
        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn extension_matching_ignores_case() {
        assert!(is_image(Path::new("a/B.PNG")));
        assert!(is_image(Path::new("shot.jpeg")));
        assert!(!is_image(Path::new("clip.mp4")));
        assert!(!is_image(Path::new("README")));
    }
}
