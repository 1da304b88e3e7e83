//! Mesh generation for chunk rendering.
//!
//! Chunks are meshed one at a time on the caller's thread, nearest first, by the
//! world's streaming update. Each rebuild produces a fresh [`mesh::ChunkMesh`] that
//! replaces the chunk's previous one.

pub mod mesh;
