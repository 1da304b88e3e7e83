//! Mesh data structures and operations for voxel rendering.
//!
//! This module turns a chunk's blocks into a vertex and index buffer. Meshing is
//! simple per-face culling: every face of a meshed block is emitted unless the block
//! across that face is opaque. A neighbor that cannot be resolved counts as not
//! opaque, so the edge of the loaded world stays visible.

use cgmath::Point3;

use crate::engine_state::voxels::{
    block::{
        block_side::BlockSide,
        registry::{BlockTypeInfo, BlockTypeRegistry},
    },
    chunk::{Chunk, ChunkMap},
    locator::BlockLocator,
};

use super::face::Face;
use crate::engine_state::rendering::Vertex;

/// Highest indoor light level a block can emit.
const MAX_LIGHT_LEVEL: f32 = 15.0;

/// The renderable geometry of one chunk.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ChunkMesh {
    vertices: Vec<Vertex>,
    indices: Vec<u32>,
}

impl ChunkMesh {
    /// Builds the mesh of `chunk`, resolving seam faces through `chunks`.
    pub fn build(chunk: &Chunk, chunks: &ChunkMap, registry: &BlockTypeRegistry) -> Self {
        let mut mesh = ChunkMesh::default();
        let coordinate = chunk.coordinate();
        let layout = chunk.layout();

        for (index, block) in chunk.blocks().iter().enumerate() {
            let block_type = block.get_type();
            if !registry.is_meshed(block_type) {
                continue;
            }

            let locator = BlockLocator::new(coordinate, index);
            let local = layout.decode(index);
            let info = registry.get(block_type);

            for side in BlockSide::all() {
                if locator.neighbor(side, chunks).is_opaque(chunks, registry) {
                    continue;
                }
                mesh.add_face(&Face::new(local.x, local.y, local.z, block_type, side), info);
            }
        }

        mesh
    }

    /// Appends one quad (four vertices, two triangles).
    pub fn add_face(&mut self, face: &Face, info: &BlockTypeInfo) {
        let num_faces_generated = self.quad_count() as u32;
        self.vertices
            .extend_from_slice(&Self::generate_face_vertices(face, info));
        self.indices
            .extend_from_slice(&Self::generate_face_indices(num_faces_generated));
    }

    /// Generates vertex data for a single face of a block.
    ///
    /// The vertices are ordered `[ll, lr, ul, ur]`, matching the triangles from
    /// `generate_face_indices`.
    pub fn generate_face_vertices(face: &Face, info: &BlockTypeInfo) -> [Vertex; 4] {
        let region = info.region_for(face.block_side);
        let normal = face.block_side.normal();
        let light = info.indoor_light_level as f32 / MAX_LIGHT_LEVEL;
        let corner = |p: Point3<u32>| Point3::new(p.x as f32, p.y as f32, p.z as f32);

        [
            Vertex::new(corner(face.ll), [region.u0, region.v1], normal, light),
            Vertex::new(corner(face.lr), [region.u1, region.v1], normal, light),
            Vertex::new(corner(face.ul), [region.u0, region.v0], normal, light),
            Vertex::new(corner(face.ur), [region.u1, region.v0], normal, light),
        ]
    }

    /// Generates index data for a face, adjusted by the number of previously generated faces.
    pub fn generate_face_indices(num_faces_generated: u32) -> [u32; 6] {
        [
            (num_faces_generated * 4),
            1 + num_faces_generated * 4,
            3 + num_faces_generated * 4,
            (num_faces_generated * 4),
            3 + num_faces_generated * 4,
            2 + num_faces_generated * 4,
        ]
    }

    pub fn vertices(&self) -> &[Vertex] {
        &self.vertices
    }

    pub fn indices(&self) -> &[u32] {
        &self.indices
    }

    pub fn quad_count(&self) -> usize {
        self.vertices.len() / 4
    }

    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    /// Number of quads whose normal points toward `side`.
    pub fn quads_facing(&self, side: BlockSide) -> usize {
        self.vertices
            .chunks_exact(4)
            .filter(|quad| quad[0].normal() == side.normal())
            .count()
    }

    /// The vertex buffer as raw bytes.
    pub fn vertex_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.vertices)
    }

    /// The index buffer as raw bytes.
    pub fn index_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.indices)
    }
}
