//! # Chunk Storage
//!
//! Chunks that were modified after generation are saved when they are deactivated
//! and restored in place of fresh terrain when they are activated again. Chunks
//! nobody touched are simply regenerated from noise.
//!
//! Loading hands the saved chunk back to the world and removes it from the store,
//! so a chunk is held either by the world or by the store, never by both. A store
//! can then only drop edits of chunks that are not active.
//!
//! [`MemoryChunkStore`] keeps saved chunks in a bounded LRU cache; when it is full
//! the least recently saved chunk is dropped and its edits are lost.

use std::num::NonZeroUsize;

use log::warn;
use lru::LruCache;

use super::chunk::{ChunkCoordinate, SavedChunk};

/// Where deactivated chunks go and where reactivated chunks come from.
pub trait ChunkStore {
    /// Takes the saved contents of a chunk out of the store, if any.
    fn load(&mut self, coordinate: ChunkCoordinate) -> Option<SavedChunk>;

    fn save(&mut self, chunk: SavedChunk);
}

/// An in-memory, capacity-bounded chunk store.
pub struct MemoryChunkStore {
    chunks: LruCache<ChunkCoordinate, SavedChunk>,
}

impl MemoryChunkStore {
    pub fn new(capacity: NonZeroUsize) -> Self {
        MemoryChunkStore {
            chunks: LruCache::new(capacity),
        }
    }

    pub fn len(&self) -> usize {
        self.chunks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chunks.is_empty()
    }

    pub fn contains(&self, coordinate: ChunkCoordinate) -> bool {
        self.chunks.contains(&coordinate)
    }
}

impl ChunkStore for MemoryChunkStore {
    fn load(&mut self, coordinate: ChunkCoordinate) -> Option<SavedChunk> {
        self.chunks.pop(&coordinate)
    }

    fn save(&mut self, chunk: SavedChunk) {
        let coordinate = chunk.coordinate();
        if let Some((evicted, _)) = self.chunks.push(coordinate, chunk) {
            if evicted != coordinate {
                warn!(
                    "Chunk store full, dropped saved chunk ({}, {})",
                    evicted.x, evicted.y
                );
            }
        }
    }
}
