//! Rendering interface for the voxel engine.
//!
//! The world never talks to a graphics API directly. Each chunk hands its cached
//! [`meshing::mesh::ChunkMesh`] and world transform to a [`RenderBackend`], which
//! owns whatever GPU resources it needs. [`MeshStatistics`] is a headless back end
//! that only counts what it is asked to draw.

use cgmath::Matrix4;

use meshing::mesh::ChunkMesh;

pub mod meshing;
mod vertex;

// Re-export commonly used types
pub use vertex::Vertex;

/// A graphics back end that can draw chunk meshes.
pub trait RenderBackend {
    /// Draws a mesh whose vertices are local to `transform`.
    fn draw_mesh(&mut self, mesh: &ChunkMesh, transform: Matrix4<f32>);
}

/// Counts draw calls and geometry without drawing anything.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct MeshStatistics {
    pub draw_calls: usize,
    pub quads: usize,
    pub vertex_bytes: usize,
    pub index_bytes: usize,
}

impl MeshStatistics {
    pub fn reset(&mut self) {
        *self = MeshStatistics::default();
    }
}

impl RenderBackend for MeshStatistics {
    fn draw_mesh(&mut self, mesh: &ChunkMesh, _transform: Matrix4<f32>) {
        self.draw_calls += 1;
        self.quads += mesh.quad_count();
        self.vertex_bytes += mesh.vertex_bytes().len();
        self.index_bytes += mesh.index_bytes().len();
    }
}
