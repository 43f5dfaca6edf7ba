//! Draws the room: four terrain walls plus the decal floor and ceiling

use crate::camera::Camera;
use crate::context::RenderContext;
use crate::gpu_mesh::GpuMesh;
use crate::layout::{RoomLayout, Wall};
use crate::pipeline::{TexturedPipeline, TransformUniforms};
use crate::primitives::create_plane_mesh;
use crate::terrain_backend::TerrainGpuResources;
use crate::texture::GpuTexture;
use glam::Mat4;
use image::RgbaImage;
use relief_core::RoomBoundary;
use relief_terrain::MeshLayout;
use std::sync::Arc;
use wgpu::util::DeviceExt;

/// Convert an sRGB channel in [0, 1] to linear
pub fn srgb_to_linear(c: f64) -> f64 {
    if c <= 0.04045 {
        c / 12.92
    } else {
        ((c + 0.055) / 1.055).powf(2.4)
    }
}

/// Background colour (102, 191, 255), in linear space for the sRGB surface
pub fn sky_blue() -> wgpu::Color {
    wgpu::Color {
        r: srgb_to_linear(102.0 / 255.0),
        g: srgb_to_linear(191.0 / 255.0),
        b: srgb_to_linear(1.0),
        a: 1.0,
    }
}

/// Uniform buffer and bind group for one fixed draw
struct DrawSlot {
    buffer: wgpu::Buffer,
    bind_group: wgpu::BindGroup,
}

const FLOOR_SLOT: usize = 4;
const CEILING_SLOT: usize = 5;

/// Renders the static room around the current terrain snapshot
pub struct RoomRenderer {
    pipeline: TexturedPipeline,
    layout: RoomLayout,
    slots: Vec<DrawSlot>,
    decal_mesh: GpuMesh,
    decal_texture: GpuTexture,
    decal_bind_group: wgpu::BindGroup,
}

impl RoomRenderer {
    pub fn new(
        context: &RenderContext,
        room: &RoomBoundary,
        mesh_layout: MeshLayout,
        decal_image: &RgbaImage,
        decal_subdivisions: u32,
    ) -> Self {
        let device = &context.device;
        let pipeline = TexturedPipeline::new(device, context.config.format);
        let layout = RoomLayout::new(room, mesh_layout.width, mesh_layout.depth);

        let slots = (0..6)
            .map(|i| {
                let buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
                    label: Some(&format!("Room Transform Buffer {}", i)),
                    contents: bytemuck::bytes_of(&TransformUniforms::new(
                        Mat4::IDENTITY,
                        Mat4::IDENTITY,
                    )),
                    usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
                });
                let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
                    label: Some(&format!("Room Transform Bind Group {}", i)),
                    layout: &pipeline.transform_bind_group_layout,
                    entries: &[wgpu::BindGroupEntry {
                        binding: 0,
                        resource: buffer.as_entire_binding(),
                    }],
                });
                DrawSlot { buffer, bind_group }
            })
            .collect();

        let decal_mesh = GpuMesh::upload(
            device,
            "Decal",
            &create_plane_mesh(room.width(), decal_subdivisions),
        );
        let decal_texture = GpuTexture::from_image(
            device,
            &context.queue,
            decal_image,
            "Decal Texture",
            wgpu::AddressMode::Repeat,
        );
        let decal_bind_group =
            decal_texture.bind_group(device, &pipeline.texture_bind_group_layout);

        Self {
            pipeline,
            layout,
            slots,
            decal_mesh,
            decal_texture,
            decal_bind_group,
        }
    }

    /// Layout for terrain texture bind groups
    pub fn texture_layout(&self) -> Arc<wgpu::BindGroupLayout> {
        Arc::clone(&self.pipeline.texture_bind_group_layout)
    }

    pub fn layout(&self) -> &RoomLayout {
        &self.layout
    }

    /// Record the room pass into `encoder`. Without a terrain snapshot only
    /// the floor and ceiling are drawn.
    pub fn render(
        &self,
        queue: &wgpu::Queue,
        encoder: &mut wgpu::CommandEncoder,
        target: &wgpu::TextureView,
        depth: &wgpu::TextureView,
        camera: &Camera,
        terrain: Option<&TerrainGpuResources>,
    ) {
        let view_proj = camera.view_projection_matrix();
        for wall in Wall::ALL {
            self.write_slot(queue, wall.index(), view_proj, self.layout.wall(wall));
        }
        self.write_slot(queue, FLOOR_SLOT, view_proj, self.layout.floor);
        self.write_slot(queue, CEILING_SLOT, view_proj, self.layout.ceiling);

        let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("Room Render Pass"),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view: target,
                resolve_target: None,
                ops: wgpu::Operations {
                    load: wgpu::LoadOp::Clear(sky_blue()),
                    store: wgpu::StoreOp::Store,
                },
            })],
            depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                view: depth,
                depth_ops: Some(wgpu::Operations {
                    load: wgpu::LoadOp::Clear(1.0),
                    store: wgpu::StoreOp::Store,
                }),
                stencil_ops: None,
            }),
            timestamp_writes: None,
            occlusion_query_set: None,
        });

        pass.set_pipeline(&self.pipeline.pipeline);

        if let Some(terrain) = terrain {
            pass.set_bind_group(1, &terrain.bind_group, &[]);
            pass.set_vertex_buffer(0, terrain.mesh.vertex_buffer.slice(..));
            pass.set_index_buffer(terrain.mesh.index_buffer.slice(..), wgpu::IndexFormat::Uint32);
            for wall in Wall::ALL {
                pass.set_bind_group(0, &self.slots[wall.index()].bind_group, &[]);
                pass.draw_indexed(0..terrain.mesh.index_count, 0, 0..1);
            }
        }

        pass.set_bind_group(1, &self.decal_bind_group, &[]);
        pass.set_vertex_buffer(0, self.decal_mesh.vertex_buffer.slice(..));
        pass.set_index_buffer(self.decal_mesh.index_buffer.slice(..), wgpu::IndexFormat::Uint32);
        for slot in [FLOOR_SLOT, CEILING_SLOT] {
            pass.set_bind_group(0, &self.slots[slot].bind_group, &[]);
            pass.draw_indexed(0..self.decal_mesh.index_count, 0, 0..1);
        }
    }

    fn write_slot(&self, queue: &wgpu::Queue, slot: usize, view_proj: Mat4, model: Mat4) {
        queue.write_buffer(
            &self.slots[slot].buffer,
            0,
            bytemuck::bytes_of(&TransformUniforms::new(view_proj, model)),
        );
    }

    /// Release the decal resources
    pub fn destroy(self) {
        let Self {
            decal_mesh,
            decal_texture,
            ..
        } = self;
        decal_mesh.destroy();
        decal_texture.destroy();
    }
}
