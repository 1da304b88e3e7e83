//! Mesh generation for voxel rendering.
//!
//! This module converts chunk block data into GPU-friendly vertex and index buffers.
//!
//! # Architecture
//! - [`ChunkMesh`]: The vertex and index buffers of one chunk
//! - [`Face`]: A single quad on one side of a block
//!
//! # Usage
//! ```no_run
//! use streaming_voxel_world::engine_state::rendering::meshing::mesh::ChunkMesh;
//! # use streaming_voxel_world::engine_state::voxels::{block::registry::*, chunk::*};
//! # let layout = ChunkLayout::new(16, 16, 64).unwrap();
//! # let registry = BlockTypeRegistry::load(AtlasLayout::default()).unwrap();
//! let mut chunks = ChunkMap::new(layout);
//! chunks.insert_and_link(Chunk::empty(cgmath::Point2::new(0, 0), layout));
//! let chunk = chunks.get(cgmath::Point2::new(0, 0)).unwrap();
//! let mesh = ChunkMesh::build(chunk, &chunks, &registry);
//! ```

mod face;
mod mesh;

pub use face::Face;
pub use mesh::*;
