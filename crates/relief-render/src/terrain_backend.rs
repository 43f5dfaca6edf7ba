//! Uploads terrain surfaces to the GPU for the snapshot manager

use crate::gpu_mesh::GpuMesh;
use crate::primitives::Mesh;
use crate::texture::GpuTexture;
use relief_core::Result;
use relief_terrain::{SnapshotBackend, TerrainSurface};
use std::sync::Arc;

/// GPU side of one terrain snapshot: the mesh and the texture made from the same surface
pub struct TerrainGpuResources {
    pub mesh: GpuMesh,
    pub texture: GpuTexture,
    pub bind_group: wgpu::BindGroup,
}

/// `SnapshotBackend` over a wgpu device
pub struct GpuTerrainBackend {
    device: Arc<wgpu::Device>,
    queue: Arc<wgpu::Queue>,
    texture_layout: Arc<wgpu::BindGroupLayout>,
}

impl GpuTerrainBackend {
    pub fn new(
        device: Arc<wgpu::Device>,
        queue: Arc<wgpu::Queue>,
        texture_layout: Arc<wgpu::BindGroupLayout>,
    ) -> Self {
        Self {
            device,
            queue,
            texture_layout,
        }
    }
}

impl SnapshotBackend for GpuTerrainBackend {
    type Resources = TerrainGpuResources;

    fn upload(&mut self, surface: &TerrainSurface) -> Result<TerrainGpuResources> {
        let mesh = GpuMesh::upload(
            &self.device,
            "Terrain",
            &Mesh::from_heightfield(&surface.mesh),
        );
        let texture = GpuTexture::from_image(
            &self.device,
            &self.queue,
            &surface.image,
            "Terrain Texture",
            wgpu::AddressMode::ClampToEdge,
        );
        let bind_group = texture.bind_group(&self.device, &self.texture_layout);

        Ok(TerrainGpuResources {
            mesh,
            texture,
            bind_group,
        })
    }

    fn release(&mut self, resources: TerrainGpuResources) {
        let TerrainGpuResources {
            mesh,
            texture,
            bind_group,
        } = resources;
        drop(bind_group);
        mesh.destroy();
        texture.destroy();
    }
}
