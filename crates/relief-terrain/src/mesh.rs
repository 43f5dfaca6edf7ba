//! Heightfield mesh generation

use crate::heightmap::Heightmap;

/// Footprint and grid parameters of a heightfield mesh
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MeshLayout {
    /// World-space X extent
    pub width: f32,
    /// World-space Z extent
    pub depth: f32,
    /// Quads along X (vertices = grid_x + 1)
    pub grid_x: u32,
    /// Quads along Z (vertices = grid_z + 1)
    pub grid_z: u32,
}

/// CPU-side heightfield geometry. Vertex (i, j) is stored at `j * (grid_x + 1) + i`.
#[derive(Debug, Clone)]
pub struct HeightfieldMesh {
    pub layout: MeshLayout,
    /// Vertex positions; the footprint spans [0, width] × [0, depth]
    pub positions: Vec<[f32; 3]>,
    pub normals: Vec<[f32; 3]>,
    /// Texture coordinates covering the full image once
    pub uvs: Vec<[f32; 2]>,
    /// Triangle indices (CCW winding)
    pub indices: Vec<u32>,
}

impl HeightfieldMesh {
    /// Build the mesh from a heightmap. Heights are `sample × max_height`;
    /// a negative `max_height` is treated as 0.
    pub fn build(heightmap: &Heightmap, layout: MeshLayout, max_height: f32) -> Self {
        let max_height = max_height.max(0.0);
        let grid_x = layout.grid_x.max(1);
        let grid_z = layout.grid_z.max(1);
        let verts_x = grid_x + 1;
        let verts_z = grid_z + 1;
        let vert_count = (verts_x * verts_z) as usize;

        let mut positions = Vec::with_capacity(vert_count);
        let mut normals = Vec::with_capacity(vert_count);
        let mut uvs = Vec::with_capacity(vert_count);

        for vz in 0..verts_z {
            for vx in 0..verts_x {
                let u = vx as f32 / grid_x as f32;
                let v = vz as f32 / grid_z as f32;

                let height = heightmap.sample(u, v) * max_height;
                positions.push([u * layout.width, height, v * layout.depth]);
                normals.push(heightmap.compute_normal(
                    u,
                    v,
                    layout.width,
                    layout.depth,
                    max_height,
                ));
                uvs.push([u, v]);
            }
        }

        let mut indices = Vec::with_capacity((grid_x * grid_z * 6) as usize);
        for qz in 0..grid_z {
            for qx in 0..grid_x {
                let tl = qz * verts_x + qx;
                let tr = tl + 1;
                let bl = tl + verts_x;
                let br = bl + 1;

                indices.extend_from_slice(&[tl, bl, br, tl, br, tr]);
            }
        }

        Self {
            layout: MeshLayout {
                grid_x,
                grid_z,
                ..layout
            },
            positions,
            normals,
            uvs,
            indices,
        }
    }

    /// Number of vertices
    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    /// Per-vertex elevation
    pub fn heights(&self) -> impl Iterator<Item = f32> + '_ {
        self.positions.iter().map(|p| p[1])
    }

    /// Elevation of grid vertex (i, j)
    pub fn height_at(&self, i: u32, j: u32) -> Option<f32> {
        if i > self.layout.grid_x || j > self.layout.grid_z {
            return None;
        }
        let index = (j * (self.layout.grid_x + 1) + i) as usize;
        self.positions.get(index).map(|p| p[1])
    }
}
