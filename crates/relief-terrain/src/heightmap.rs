//! Luminance heightmap extraction and sampling

use image::RgbaImage;
use relief_core::config::ElevationMode;

/// A grayscale heightmap with bilinear sampling
#[derive(Debug, Clone, PartialEq)]
pub struct Heightmap {
    /// Row-major height values normalized to [0..1]
    heights: Vec<f32>,
    /// Width in pixels
    pub width: u32,
    /// Depth (image height) in pixels
    pub depth: u32,
}

/// Average of the three colour channels, normalized to [0..1]
pub fn luminance(rgb: [u8; 3]) -> f32 {
    (rgb[0] as f32 + rgb[1] as f32 + rgb[2] as f32) / 3.0 / 255.0
}

impl Heightmap {
    /// Build a heightmap from the colour image the terrain is textured with.
    /// Alpha is ignored.
    pub fn from_image(image: &RgbaImage, mode: ElevationMode) -> Self {
        let heights = image
            .pixels()
            .map(|p| {
                let l = luminance([p.0[0], p.0[1], p.0[2]]);
                match mode {
                    ElevationMode::Bright => l,
                    ElevationMode::Dark => 1.0 - l,
                }
            })
            .collect();

        Self {
            heights,
            width: image.width(),
            depth: image.height(),
        }
    }

    /// Create a heightmap from raw float data (for testing)
    pub fn from_raw(heights: Vec<f32>, width: u32, depth: u32) -> Self {
        assert_eq!(heights.len(), (width * depth) as usize);
        assert!(width >= 2 && depth >= 2, "heightmap must be at least 2x2");
        Self {
            heights,
            width,
            depth,
        }
    }

    /// Bilinear sample at normalized UV coordinates (0..1, 0..1).
    /// Returns interpolated height in [0..1].
    pub fn sample(&self, u: f32, v: f32) -> f32 {
        let u = u.clamp(0.0, 1.0);
        let v = v.clamp(0.0, 1.0);

        let fx = u * (self.width - 1) as f32;
        let fz = v * (self.depth - 1) as f32;

        let x0 = (fx as u32).min(self.width - 2);
        let z0 = (fz as u32).min(self.depth - 2);
        let x1 = x0 + 1;
        let z1 = z0 + 1;

        let tx = fx - x0 as f32;
        let tz = fz - z0 as f32;

        let h0 = self.get(x0, z0) * (1.0 - tx) + self.get(x1, z0) * tx;
        let h1 = self.get(x0, z1) * (1.0 - tx) + self.get(x1, z1) * tx;

        // Interpolation can overshoot by an ulp
        (h0 * (1.0 - tz) + h1 * tz).clamp(0.0, 1.0)
    }

    /// Compute the surface normal at a UV position using finite differences.
    pub fn compute_normal(
        &self,
        u: f32,
        v: f32,
        world_width: f32,
        world_depth: f32,
        height_scale: f32,
    ) -> [f32; 3] {
        let eps_u = 1.0 / (self.width as f32);
        let eps_v = 1.0 / (self.depth as f32);

        let h_left = self.sample((u - eps_u).max(0.0), v) * height_scale;
        let h_right = self.sample((u + eps_u).min(1.0), v) * height_scale;
        let h_down = self.sample(u, (v - eps_v).max(0.0)) * height_scale;
        let h_up = self.sample(u, (v + eps_v).min(1.0)) * height_scale;

        let dx = (h_right - h_left) / (2.0 * eps_u * world_width);
        let dz = (h_up - h_down) / (2.0 * eps_v * world_depth);

        // Normal = normalize(-dh/dx, 1, -dh/dz)
        let (nx, ny, nz) = (-dx, 1.0, -dz);
        let len = (nx * nx + ny * ny + nz * nz).sqrt();

        [nx / len, ny / len, nz / len]
    }

    fn get(&self, x: u32, z: u32) -> f32 {
        self.heights[(z * self.width + x) as usize]
    }
}
