mod common;

use std::cell::RefCell;
use std::collections::{HashMap, HashSet};
use std::rc::Rc;

use cgmath::{Point2, Point3, Vector2};
use streaming_voxel_world::config::WorldConfig;
use streaming_voxel_world::engine_state::voxels::{
    block::{block_side::BlockSide, block_type::BlockType},
    chunk::{Chunk, ChunkCoordinate, ChunkMap, SavedChunk},
    locator::BlockLocator,
    storage::ChunkStore,
    terrain_noise::{ConstantNoise, FbmNoise},
    world::World,
};

use common::*;

fn active_set(world: &World) -> HashSet<ChunkCoordinate> {
    world.chunks().coordinates().collect()
}

fn in_disk(coordinate: ChunkCoordinate, center: ChunkCoordinate, radius: i32) -> bool {
    let d = coordinate - center;
    d.x * d.x + d.y * d.y <= radius * radius
}

#[test]
fn stationary_focus_activates_and_links_the_disk() {
    let mut world = flat_world();
    let focus = Point3::new(2.0, 2.0, 12.0);
    let disk_size = world.activation_priority().len();
    assert_eq!(disk_size, 29);

    for _ in 0..disk_size {
        world.update(focus);
    }

    let center = Point2::new(0, 0);
    assert_eq!(world.chunks().len(), disk_size);
    for offset in world.activation_priority() {
        let coordinate = center + *offset;
        let chunk = world.chunks().get(coordinate).unwrap();
        let interior = BlockSide::HORIZONTAL.iter().all(|side| {
            let step: Vector2<i32> = side.chunk_offset().unwrap();
            in_disk(coordinate + step, center, 3)
        });
        assert_eq!(chunk.has_all_neighbors(), interior, "{:?}", coordinate);
    }
}

#[test]
fn update_activates_and_deactivates_at_most_one_chunk() {
    let mut world = flat_world();
    let mut before = active_set(&world);

    let path = (0..300).map(|frame| Point3::new(frame as f32 * 0.4, (frame % 50) as f32 * -0.3, 12.0));
    for focus in path {
        let work = world.update(focus);
        let after = active_set(&world);

        let added: Vec<_> = after.difference(&before).copied().collect();
        let removed: Vec<_> = before.difference(&after).copied().collect();
        assert!(added.len() <= 1);
        assert!(removed.len() <= 1);
        assert_eq!(added.first().copied(), work.activated);
        assert_eq!(removed.first().copied(), work.deactivated);

        before = after;
    }
}

#[test]
fn nothing_outside_the_deactivation_radius_survives_settling() {
    let mut world = flat_world();
    settle(&mut world, Point3::new(0.0, 0.0, 12.0));
    settle(&mut world, Point3::new(30.0, -9.0, 12.0));

    let focus_chunk = world.focus_chunk();
    assert_eq!(focus_chunk, Point2::new(7, -3));
    for coordinate in world.chunks().coordinates() {
        assert!(in_disk(coordinate, focus_chunk, 5), "{:?}", coordinate);
    }
    for offset in world.activation_priority() {
        assert!(world.chunks().contains(focus_chunk + *offset));
    }
}

#[test]
fn links_never_point_at_inactive_chunks() {
    let mut world = flat_world();
    for frame in 0..400 {
        world.update(Point3::new(frame as f32 * 0.3, frame as f32 * 0.2, 12.0));
        for chunk in world.chunks().iter() {
            for neighbor in chunk.linked_neighbors() {
                assert!(world.chunks().contains(neighbor));
            }
            for side in BlockSide::HORIZONTAL {
                let step = side.chunk_offset().unwrap();
                let expected = world.chunks().contains(chunk.coordinate() + step);
                assert_eq!(chunk.neighbor(side).is_some(), expected);
            }
        }
    }
}

#[test]
fn deactivation_unlinks_and_dirties_every_neighbor() {
    let layout = small_config().chunk_layout().unwrap();
    let registry = registry();
    let mut chunks = ChunkMap::new(layout);
    let center = Point2::new(0, 0);
    chunks.insert_and_link(Chunk::empty(center, layout));
    for side in BlockSide::HORIZONTAL {
        chunks.insert_and_link(Chunk::empty(center + side.chunk_offset().unwrap(), layout));
    }
    for side in BlockSide::HORIZONTAL {
        let coordinate = center + side.chunk_offset().unwrap();
        assert!(chunks.rebuild_mesh(coordinate, &registry));
        assert!(!chunks.get(coordinate).unwrap().is_dirty());
    }

    chunks.remove_and_unlink(center).unwrap();

    for side in BlockSide::HORIZONTAL {
        let neighbor = chunks.get(center + side.chunk_offset().unwrap()).unwrap();
        assert_eq!(neighbor.neighbor(side.opposite()), None);
        assert!(neighbor.is_dirty());
    }
}

#[test]
fn settled_chunks_have_no_holes_and_no_overdraw() {
    let config = small_config();
    let mut world = world_with(config, FbmNoise::new(11));
    settle(&mut world, Point3::new(5.0, 5.0, 12.0));

    let chunks = world.chunks();
    let registry = world.registry();
    let layout = chunks.layout();
    let mut checked = 0;

    for chunk in chunks.iter() {
        if !chunk.has_all_neighbors() {
            continue;
        }
        assert!(!chunk.is_dirty());
        let mesh = chunk.mesh().unwrap();

        for side in BlockSide::all() {
            let expected = (0..layout.volume())
                .filter(|index| registry.is_meshed(chunk.blocks()[*index].get_type()))
                .filter(|index| {
                    !BlockLocator::new(chunk.coordinate(), *index)
                        .neighbor(side, chunks)
                        .is_opaque(chunks, registry)
                })
                .count();
            assert_eq!(mesh.quads_facing(side), expected, "{:?} {:?}", chunk.coordinate(), side);
        }
        checked += 1;
    }
    assert!(checked > 0);
}

#[test]
fn seam_edit_repaints_both_chunks() {
    let mut world = flat_world();
    settle(&mut world, Point3::new(2.0, 2.0, 12.0));

    // x = 3 is the east edge of chunk (0, 0).
    let edge = world.locator_at(Point3::new(3.5, 1.5, 10.5));
    assert!(world.change_block_type(edge, BlockType::AIR));
    assert!(world.chunks().get(Point2::new(0, 0)).unwrap().is_dirty());
    assert!(world.chunks().get(Point2::new(1, 0)).unwrap().is_dirty());
    assert!(!world.chunks().get(Point2::new(-1, 0)).unwrap().is_dirty());

    settle(&mut world, Point3::new(2.0, 2.0, 12.0));
    assert!(!world.chunks().get(Point2::new(1, 0)).unwrap().is_dirty());
}

#[derive(Default)]
struct SharedStore {
    saved: Rc<RefCell<HashMap<ChunkCoordinate, SavedChunk>>>,
    loads: Rc<RefCell<Vec<ChunkCoordinate>>>,
}

impl ChunkStore for SharedStore {
    fn load(&mut self, coordinate: ChunkCoordinate) -> Option<SavedChunk> {
        let saved = self.saved.borrow_mut().remove(&coordinate);
        if saved.is_some() {
            self.loads.borrow_mut().push(coordinate);
        }
        saved
    }

    fn save(&mut self, chunk: SavedChunk) {
        self.saved.borrow_mut().insert(chunk.coordinate(), chunk);
    }
}

#[test]
fn edited_chunks_round_trip_through_the_store() {
    init_logger();
    let store = SharedStore::default();
    let saved = store.saved.clone();
    let loads = store.loads.clone();
    let mut world = World::with_store(
        small_config(),
        registry(),
        Box::new(ConstantNoise(0.0)),
        Box::new(store),
    )
    .unwrap();

    let home = Point3::new(2.0, 2.0, 12.0);
    settle(&mut world, home);
    let spot = Point3::new(1.5, 2.5, 10.5);
    let locator = world.locator_at(spot);
    assert!(world.change_block_type(locator, BlockType::STONE));

    settle(&mut world, Point3::new(100.0, 2.0, 12.0));
    assert_eq!(saved.borrow().len(), 1);
    assert!(saved.borrow().contains_key(&Point2::new(0, 0)));

    settle(&mut world, home);
    assert_eq!(*loads.borrow(), vec![Point2::new(0, 0)]);
    assert_eq!(world.locator_at(spot).get_type(world.chunks()), BlockType::STONE);
    let untouched = world.locator_at(Point3::new(5.5, 2.5, 10.5));
    assert_eq!(untouched.get_type(world.chunks()), BlockType::GRASS);
}

#[test]
fn restored_chunks_outlive_store_eviction() {
    let config = WorldConfig {
        saved_chunk_capacity: 1,
        ..small_config()
    };
    let mut world = world_with(config, ConstantNoise(0.0));
    let home = Point3::new(2.0, 2.0, 12.0);
    let far = Point3::new(100.0, 2.0, 12.0);
    let lamp = Point3::new(1.5, 2.5, 10.5);
    let rock = Point3::new(9.5, 2.5, 10.5);

    settle(&mut world, home);
    assert!(world.change_block_type(world.locator_at(lamp), BlockType::GLOWSTONE));
    settle(&mut world, far);
    settle(&mut world, home);
    assert!(world.chunks().get(Point2::new(0, 0)).unwrap().needs_saving());

    // Chunk (2, 0) leaves and fills the single store slot while (0, 0) stays active.
    assert!(world.change_block_type(world.locator_at(rock), BlockType::STONE));
    settle(&mut world, Point3::new(-14.0, 2.0, 12.0));
    assert_eq!(world.focus_chunk(), Point2::new(-4, 0));
    assert!(world.chunks().contains(Point2::new(0, 0)));
    assert!(!world.chunks().contains(Point2::new(2, 0)));

    settle(&mut world, far);
    settle(&mut world, home);
    assert_eq!(world.locator_at(lamp).get_type(world.chunks()), BlockType::GLOWSTONE);
    // The store only had room for one chunk, so the older edit was dropped.
    assert_eq!(world.locator_at(rock).get_type(world.chunks()), BlockType::GRASS);
}

#[test]
fn saved_chunks_serialize_as_json() {
    let layout = small_config().chunk_layout().unwrap();
    let mut chunk = Chunk::empty(Point2::new(-3, 8), layout);
    chunk.set_block_type(layout.encode(1, 2, 3), BlockType::GLOWSTONE);

    let json = chunk.to_saved().to_json().unwrap();
    let restored = Chunk::from_saved(&SavedChunk::from_json(&json).unwrap(), layout).unwrap();

    assert_eq!(restored.coordinate(), Point2::new(-3, 8));
    assert_eq!(restored.blocks(), chunk.blocks());
    assert!(restored.is_dirty());
    assert!(!restored.needs_saving());
}
