//! Triangle mesh containers and the per-feature mesh generators.
//!
//! Meshes are plain growable buffers: a vertex array and an index array
//! where every three consecutive indices form one triangle. Indices are
//! local to the owning mesh. Generators produce positions in local meters
//! (computed in `f64`, stored as `f32` at emission, matching the on-disk
//! precision).

pub mod building;
pub mod road;
pub mod triangulate;

pub use building::BuildingMeshGenerator;
pub use road::RoadMeshGenerator;

/// One mesh vertex: position, unit normal and texture coordinates.
///
/// Serialized as eight consecutive little-endian `f32` values (32 bytes).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Vertex {
    pub position: [f32; 3],
    pub normal: [f32; 3],
    pub texcoord: [f32; 2],
}

impl Vertex {
    pub fn new(position: [f32; 3], normal: [f32; 3], texcoord: [f32; 2]) -> Self {
        Self {
            position,
            normal,
            texcoord,
        }
    }
}

/// An indexed triangle list.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Mesh {
    pub vertices: Vec<Vertex>,
    pub indices: Vec<u32>,
}

impl Mesh {
    pub fn new() -> Self {
        Self::default()
    }

    /// A mesh with no vertices carries no geometry and is never serialized.
    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    pub fn index_count(&self) -> usize {
        self.indices.len()
    }
}
