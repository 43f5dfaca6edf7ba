//! Relief Render - wgpu renderer for the video room
//!
//! Draws the current terrain snapshot on all four walls of the room and a
//! static decal texture on the floor and ceiling. Terrain uploads go through
//! `GpuTerrainBackend`, which plugs into relief-terrain's snapshot manager.

mod camera;
mod context;
mod gpu_mesh;
pub mod layout;
mod pipeline;
mod primitives;
mod room_renderer;
mod terrain_backend;
mod texture;

pub use camera::Camera;
pub use context::{RenderContext, RenderError};
pub use gpu_mesh::GpuMesh;
pub use layout::{RoomLayout, Wall};
pub use pipeline::{TexturedPipeline, TransformUniforms};
pub use primitives::{create_plane_mesh, Mesh, Vertex};
pub use room_renderer::{sky_blue, srgb_to_linear, RoomRenderer};
pub use terrain_backend::{GpuTerrainBackend, TerrainGpuResources};
pub use texture::{checkerboard, load_decal_image, GpuTexture};

#[cfg(test)]
mod tests {
    #[test]
    fn relief_shader_wgsl_parses() {
        let source = include_str!("relief_shader.wgsl");
        naga::front::wgsl::parse_str(source).expect("relief_shader.wgsl failed to parse");
    }

    #[test]
    fn relief_shader_validates() {
        let source = include_str!("relief_shader.wgsl");
        let module = naga::front::wgsl::parse_str(source).expect("parse");
        naga::valid::Validator::new(
            naga::valid::ValidationFlags::all(),
            naga::valid::Capabilities::empty(),
        )
        .validate(&module)
        .expect("relief_shader.wgsl failed validation");
    }
}
