//! Frame to terrain surface conversion

use image::imageops::{self, FilterType};
use image::{DynamicImage, RgbImage, RgbaImage};
use relief_core::config::{ElevationMode, ResampleFilter, TerrainSettings};
use relief_core::{ReliefError, Result};

use crate::heightmap::Heightmap;
use crate::mesh::{HeightfieldMesh, MeshLayout};

/// The image and the mesh derived from it. The image is both the texture and
/// the elevation source, so the two always agree.
#[derive(Debug, Clone)]
pub struct TerrainSurface {
    pub image: RgbaImage,
    pub mesh: HeightfieldMesh,
}

/// Converts captured frames into terrain surfaces at a fixed resolution
#[derive(Debug, Clone)]
pub struct HeightfieldGenerator {
    image_width: u32,
    image_height: u32,
    filter: ResampleFilter,
    invert_colors: bool,
    elevation: ElevationMode,
    layout: MeshLayout,
}

impl HeightfieldGenerator {
    pub fn new(settings: &TerrainSettings) -> Self {
        Self {
            image_width: settings.image_width.max(2),
            image_height: settings.image_height.max(2),
            filter: settings.filter,
            invert_colors: settings.invert_colors,
            elevation: settings.elevation,
            layout: MeshLayout {
                width: settings.image_width as f32,
                depth: settings.image_height as f32,
                grid_x: settings.grid_x,
                grid_z: settings.grid_z,
            },
        }
    }

    /// Footprint and grid of every mesh this generator builds
    pub fn layout(&self) -> MeshLayout {
        self.layout
    }

    /// Resample `frame`, optionally invert it, and build the heightfield.
    /// `frame` itself is left untouched.
    pub fn generate(&self, frame: &RgbImage, max_height: f32) -> Result<TerrainSurface> {
        if frame.width() == 0 || frame.height() == 0 {
            return Err(ReliefError::TerrainError(format!(
                "cannot build terrain from an empty {}x{} frame",
                frame.width(),
                frame.height()
            )));
        }

        let filter = match self.filter {
            ResampleFilter::Nearest => FilterType::Nearest,
            ResampleFilter::Bilinear => FilterType::Triangle,
        };
        let mut resized = if frame.dimensions() == (self.image_width, self.image_height) {
            frame.clone()
        } else {
            imageops::resize(frame, self.image_width, self.image_height, filter)
        };

        if self.invert_colors {
            imageops::invert(&mut resized);
        }

        let image = DynamicImage::ImageRgb8(resized).into_rgba8();
        let heightmap = Heightmap::from_image(&image, self.elevation);
        let mesh = HeightfieldMesh::build(&heightmap, self.layout, max_height);

        Ok(TerrainSurface { image, mesh })
    }
}
