//! Relief Terrain - Video frame heightfields
//!
//! Turns captured frames into textured heightfield meshes and manages the
//! lifecycle of the uploaded snapshot. Does not depend on relief-render;
//! uploading goes through the `SnapshotBackend` trait.

pub mod generator;
pub mod heightmap;
pub mod mesh;
pub mod snapshot;

pub use generator::{HeightfieldGenerator, TerrainSurface};
pub use heightmap::Heightmap;
pub use mesh::{HeightfieldMesh, MeshLayout};
pub use snapshot::{SnapshotBackend, SnapshotStats, TerrainResourceManager, TerrainSnapshot};
