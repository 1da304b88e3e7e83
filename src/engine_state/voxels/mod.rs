//! # Voxel World Core
//!
//! This module contains the data model of the streaming world: blocks, chunks, the
//! locator that walks between them and the world that activates and meshes them.
//!
//! ## Architecture
//!
//! * **Block**: block types, faces and the per-type registry
//! * **Chunk**: fixed-size columns of blocks, their layout and terrain generation
//! * **Locator**: a copyable cursor naming one block, able to step across chunk seams
//! * **World**: the per-frame streaming loop, raycasting and block edits
//! * **Storage**: where edited chunks wait while they are inactive
//!
//! ## Data Flow
//!
//! 1. `World::update` activates chunks near the focus from storage or noise
//! 2. New chunks are linked to their active neighbors, which marks both dirty
//! 3. Dirty chunks with four neighbors get their mesh rebuilt, nearest first
//! 4. `World::render` hands each cached mesh to the render back end
//!
//! Everything runs on the caller's thread; the only throttle is the budget of one
//! activation, one deactivation and one rebuild per update.

pub mod block;
pub mod chunk;
pub mod locator;
pub mod raycast;
pub mod storage;
pub mod terrain_noise;
pub mod world;
