use loam_blocks::VoxelId;
use loam_chunk::{CHUNK_DEPTH, CHUNK_WIDTH, Chunk, ChunkCoord, SLICE_SIZE, SLICE_VOLUME, Slice};
use proptest::prelude::*;

fn slices() -> impl Strategy<Value = usize> {
    1usize..=4
}

fn small_i32() -> impl Strategy<Value = i32> {
    -1_000_000i32..=1_000_000
}

fn solid_id() -> impl Strategy<Value = VoxelId> {
    prop_oneof![Just(VoxelId::Dirt), Just(VoxelId::Stone), Just(VoxelId::Grass)]
}

#[test]
fn slice_idx_is_unique_and_in_range() {
    let mut seen = vec![false; SLICE_VOLUME];
    let n = SLICE_SIZE as i32;
    for z in 0..n { for y in 0..n { for x in 0..n {
        let i = Slice::idx(x, y, z).unwrap();
        assert!(i < SLICE_VOLUME);
        assert!(!seen[i]);
        seen[i] = true;
    }}}
    assert!(seen.into_iter().all(|b| b));
}

proptest! {
    // Any y outside [0, height) reads as the out-of-bounds sentinel
    #[test]
    fn vertical_bounds_sentinel(n in slices(), x in -40i32..40, z in -40i32..40, dy in 0i32..10_000) {
        let chunk = Chunk::new(ChunkCoord::default(), n).unwrap();
        let h = chunk.height() as i32;
        prop_assert_eq!(chunk.get(x, h + dy, z), VoxelId::OutOfBounds);
        prop_assert_eq!(chunk.get(x, -1 - dy, z), VoxelId::OutOfBounds);
    }

    // Writes inside the chunk read back; writes outside are ignored
    #[test]
    fn set_then_get(n in slices(), x in -4i32..36, y in -4i32..132, z in -4i32..36, id in solid_id()) {
        let mut chunk = Chunk::new(ChunkCoord::default(), n).unwrap();
        chunk.set(x, y, z, id);
        let inside = x >= 0 && x < CHUNK_WIDTH as i32
            && z >= 0 && z < CHUNK_DEPTH as i32
            && y >= 0 && y < chunk.height() as i32;
        if inside {
            prop_assert_eq!(chunk.get(x, y, z), id);
            prop_assert_eq!(chunk.solid_count(), 1);
        } else {
            prop_assert_eq!(chunk.get(x, y, z), VoxelId::OutOfBounds);
            prop_assert!(chunk.is_empty());
        }
    }

    // contains_world and get_world agree with local addressing
    #[test]
    fn contains_world_and_get_world_agree(cx in small_i32(), cz in small_i32(), n in slices()) {
        let coord = ChunkCoord::new(cx / 64, cz / 64);
        let mut chunk = Chunk::new(coord, n).unwrap();
        chunk.set(0, 0, 0, VoxelId::Stone);
        let (x0, _, z0) = coord.world_origin();
        let w = CHUNK_WIDTH as i32;
        let d = CHUNK_DEPTH as i32;
        let h = chunk.height() as i32;
        let candidates = [
            (x0, 0, z0),
            (x0 + w - 1, h - 1, z0 + d - 1),
            (x0 - 1, 0, z0),
            (x0 + w, 0, z0),
            (x0, -1, z0),
            (x0, h, z0),
            (x0, 0, z0 - 1),
            (x0, 0, z0 + d),
        ];
        for (wx, wy, wz) in candidates {
            let expect = wy >= 0 && wy < h && wx >= x0 && wx < x0 + w && wz >= z0 && wz < z0 + d;
            prop_assert_eq!(chunk.contains_world(wx, wy, wz), expect);
            match chunk.get_world(wx, wy, wz) {
                None => prop_assert!(!expect),
                Some(v) => prop_assert_eq!(v, chunk.get(wx - x0, wy, wz - z0)),
            }
        }
        prop_assert_eq!(chunk.get_world(x0, 0, z0), Some(VoxelId::Stone));
    }

    // containing() inverts world_origin() for every cell in the chunk footprint
    #[test]
    fn containing_inverts_origin(cx in -10_000i32..10_000, cz in -10_000i32..10_000, lx in 0i32..32, lz in 0i32..32) {
        let c = ChunkCoord::new(cx, cz);
        let (x0, _, z0) = c.world_origin();
        prop_assert_eq!(ChunkCoord::containing(x0 + lx, z0 + lz), c);
    }
}
