//! Vertex format and CPU-side meshes

use bytemuck::{Pod, Zeroable};
use relief_terrain::HeightfieldMesh;

/// A vertex with position, normal, and UV coordinates
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub struct Vertex {
    pub position: [f32; 3],
    pub normal: [f32; 3],
    pub uv: [f32; 2],
}

impl Vertex {
    const ATTRIBS: [wgpu::VertexAttribute; 3] = wgpu::vertex_attr_array![
        0 => Float32x3,
        1 => Float32x3,
        2 => Float32x2,
    ];

    pub fn desc() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<Vertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &Self::ATTRIBS,
        }
    }
}

/// Mesh data ready for GPU upload
#[derive(Debug, Clone, Default)]
pub struct Mesh {
    pub vertices: Vec<Vertex>,
    pub indices: Vec<u32>,
}

impl Mesh {
    /// Interleave a heightfield into the GPU vertex format
    pub fn from_heightfield(mesh: &HeightfieldMesh) -> Self {
        let vertices = mesh
            .positions
            .iter()
            .zip(&mesh.normals)
            .zip(&mesh.uvs)
            .map(|((&position, &normal), &uv)| Vertex {
                position,
                normal,
                uv,
            })
            .collect();

        Self {
            vertices,
            indices: mesh.indices.clone(),
        }
    }
}

/// Create a flat `size × size` plane centred on the origin in XZ, facing +Y,
/// with `subdivisions` quads per edge and UVs covering the texture once.
pub fn create_plane_mesh(size: f32, subdivisions: u32) -> Mesh {
    let res = subdivisions.max(1);
    let verts_per_edge = res + 1;
    let half = size / 2.0;

    let mut vertices = Vec::with_capacity((verts_per_edge * verts_per_edge) as usize);
    for vz in 0..verts_per_edge {
        for vx in 0..verts_per_edge {
            let u = vx as f32 / res as f32;
            let v = vz as f32 / res as f32;
            vertices.push(Vertex {
                position: [u * size - half, 0.0, v * size - half],
                normal: [0.0, 1.0, 0.0],
                uv: [u, v],
            });
        }
    }

    let mut indices = Vec::with_capacity((res * res * 6) as usize);
    for qz in 0..res {
        for qx in 0..res {
            let tl = qz * verts_per_edge + qx;
            let tr = tl + 1;
            let bl = tl + verts_per_edge;
            let br = bl + 1;
            indices.extend_from_slice(&[tl, bl, br, tl, br, tr]);
        }
    }

    Mesh { vertices, indices }
}

#[cfg(test)]
mod tests {
    use super::*;
    use relief_terrain::{Heightmap, MeshLayout};

    #[test]
    fn vertex_layout_matches_struct() {
        let desc = Vertex::desc();
        assert_eq!(desc.array_stride, 32);
        assert_eq!(desc.attributes.len(), 3);
        assert_eq!(desc.attributes[2].offset, 24);
    }

    #[test]
    fn plane_is_centred_and_subdivided() {
        let plane = create_plane_mesh(640.0, 10);
        assert_eq!(plane.vertices.len(), 11 * 11);
        assert_eq!(plane.indices.len(), 10 * 10 * 6);
        assert_eq!(plane.vertices[0].position, [-320.0, 0.0, -320.0]);
        assert_eq!(plane.vertices[120].position, [320.0, 0.0, 320.0]);
        assert!(plane.vertices.iter().all(|v| v.normal == [0.0, 1.0, 0.0]));
    }

    #[test]
    fn heightfield_conversion_keeps_attributes() {
        let hm = Heightmap::from_raw(vec![0.0, 1.0, 0.5, 0.25], 2, 2);
        let layout = MeshLayout {
            width: 4.0,
            depth: 2.0,
            grid_x: 2,
            grid_z: 2,
        };
        let heightfield = HeightfieldMesh::build(&hm, layout, 8.0);
        let mesh = Mesh::from_heightfield(&heightfield);

        assert_eq!(mesh.vertices.len(), heightfield.vertex_count());
        assert_eq!(mesh.indices, heightfield.indices);
        for (i, vertex) in mesh.vertices.iter().enumerate() {
            assert_eq!(vertex.position, heightfield.positions[i]);
            assert_eq!(vertex.uv, heightfield.uvs[i]);
        }
    }
}
