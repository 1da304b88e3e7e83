//! Vertex data structures for voxel rendering.
//!
//! This module defines the vertex format chunk meshes are built from. Vertices are
//! plain old data so a mesh can be handed to any graphics back end as raw bytes.

use cgmath::{Point3, Vector3};

/// A vertex of a chunk mesh.
///
/// Positions are local to the owning chunk; the chunk's world transform is passed
/// to the back end alongside the mesh.
///
/// # Memory Layout
/// - Position: 3x f32 (12 bytes)
/// - Texture Coordinates: [f32; 2] (8 bytes)
/// - Normal: 3x f32 (12 bytes)
/// - Light: f32 (4 bytes)
///
/// Total size: 36 bytes
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct Vertex {
    position: [f32; 3],
    /// UV texture coordinates within the block atlas (normalized 0.0-1.0)
    tex_coords: [f32; 2],
    normal: [f32; 3],
    /// Emitted light of the block the face belongs to (normalized 0.0-1.0)
    light: f32,
}

impl Vertex {
    pub fn new(position: Point3<f32>, tex_coords: [f32; 2], normal: Vector3<f32>, light: f32) -> Self {
        Vertex {
            position: position.into(),
            tex_coords,
            normal: normal.into(),
            light,
        }
    }

    pub fn position(&self) -> Point3<f32> {
        self.position.into()
    }

    pub fn tex_coords(&self) -> [f32; 2] {
        self.tex_coords
    }

    pub fn normal(&self) -> Vector3<f32> {
        self.normal.into()
    }

    pub fn light(&self) -> f32 {
        self.light
    }

    /// Bytes between consecutive vertices in a vertex buffer.
    pub const fn stride() -> usize {
        std::mem::size_of::<Vertex>()
    }
}
