//! GPU textures and the decal texture source

use crate::context::RenderError;
use image::{Rgba, RgbaImage};
use std::path::Path;
use wgpu::util::DeviceExt;

/// A GPU-resident texture with its view and sampler
pub struct GpuTexture {
    pub texture: wgpu::Texture,
    pub view: wgpu::TextureView,
    pub sampler: wgpu::Sampler,
}

impl GpuTexture {
    /// Upload an RGBA image as an sRGB texture
    pub fn from_image(
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        image: &RgbaImage,
        label: &str,
        address_mode: wgpu::AddressMode,
    ) -> Self {
        let texture = device.create_texture_with_data(
            queue,
            &wgpu::TextureDescriptor {
                label: Some(label),
                size: wgpu::Extent3d {
                    width: image.width().max(1),
                    height: image.height().max(1),
                    depth_or_array_layers: 1,
                },
                mip_level_count: 1,
                sample_count: 1,
                dimension: wgpu::TextureDimension::D2,
                format: wgpu::TextureFormat::Rgba8UnormSrgb,
                usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
                view_formats: &[],
            },
            wgpu::util::TextureDataOrder::LayerMajor,
            image.as_raw(),
        );

        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
        let sampler = device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some(&format!("{} Sampler", label)),
            address_mode_u: address_mode,
            address_mode_v: address_mode,
            mag_filter: wgpu::FilterMode::Linear,
            min_filter: wgpu::FilterMode::Linear,
            mipmap_filter: wgpu::FilterMode::Nearest,
            ..Default::default()
        });

        Self {
            texture,
            view,
            sampler,
        }
    }

    /// Bind group for a `texture_2d` + `sampler` pair at bindings 0 and 1
    pub fn bind_group(&self, device: &wgpu::Device, layout: &wgpu::BindGroupLayout) -> wgpu::BindGroup {
        device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Texture Bind Group"),
            layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: wgpu::BindingResource::TextureView(&self.view),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::Sampler(&self.sampler),
                },
            ],
        })
    }

    /// Free the GPU memory now rather than when the handle drops
    pub fn destroy(self) {
        self.texture.destroy();
    }
}

/// A two-tone checkerboard used when no decal image is configured
pub fn checkerboard(size: u32, tiles: u32) -> RgbaImage {
    let size = size.max(1);
    let tile = (size / tiles.max(1)).max(1);
    let light = Rgba([200, 200, 200, 255]);
    let dark = Rgba([90, 90, 110, 255]);
    RgbaImage::from_fn(size, size, |x, y| {
        if (x / tile + y / tile) % 2 == 0 {
            light
        } else {
            dark
        }
    })
}

/// Load the decal image, falling back to a checkerboard when `path` is `None`
pub fn load_decal_image(path: Option<&Path>, checker_tiles: u32) -> Result<RgbaImage, RenderError> {
    match path {
        Some(path) => image::open(path)
            .map(|img| img.into_rgba8())
            .map_err(|e| RenderError::TextureLoad {
                path: path.display().to_string(),
                reason: e.to_string(),
            }),
        None => Ok(checkerboard(256, checker_tiles)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn checkerboard_alternates_tiles() {
        let board = checkerboard(64, 8);
        assert_eq!(board.dimensions(), (64, 64));
        assert_eq!(board.get_pixel(0, 0), board.get_pixel(16, 0));
        assert_ne!(board.get_pixel(0, 0), board.get_pixel(8, 0));
        assert_ne!(board.get_pixel(0, 0), board.get_pixel(0, 8));
        assert_eq!(board.get_pixel(0, 0), board.get_pixel(8, 8));
    }

    #[test]
    fn checkerboard_handles_degenerate_sizes() {
        assert_eq!(checkerboard(0, 0).dimensions(), (1, 1));
        assert_eq!(checkerboard(4, 100).dimensions(), (4, 4));
    }

    #[test]
    fn missing_decal_path_falls_back() {
        let image = load_decal_image(None, 8).unwrap();
        assert_eq!(image.dimensions(), (256, 256));
    }

    #[test]
    fn decal_loads_from_disk() {
        let path = std::env::temp_dir().join(format!("relief_decal_{}.png", uuid::Uuid::new_v4()));
        RgbaImage::from_pixel(3, 2, Rgba([1, 2, 3, 255])).save(&path).unwrap();

        let image = load_decal_image(Some(&path), 8).unwrap();
        assert_eq!(image.dimensions(), (3, 2));
        assert_eq!(image.get_pixel(2, 1).0, [1, 2, 3, 255]);

        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn unreadable_decal_is_an_error() {
        let err = load_decal_image(Some(Path::new("/nonexistent/decal.png")), 8).unwrap_err();
        assert!(matches!(err, RenderError::TextureLoad { .. }));
    }
}
