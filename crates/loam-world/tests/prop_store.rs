use loam_blocks::VoxelId;
use loam_chunk::{ChunkCoord, NeighborQuery};
use loam_world::{ChunkStore, MissingNeighbor, TerrainGen, WorldGenParams};
use proptest::prelude::*;

fn small_world() -> ChunkStore {
    let params = WorldGenParams {
        chunks_x: 2,
        chunks_z: 2,
        slices: 2,
        ..WorldGenParams::default()
    };
    ChunkStore::generate(&TerrainGen::with_surface(params)).unwrap()
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    // Store lookups agree with the owning chunk's local storage
    #[test]
    fn resolve_matches_chunk(wx in 0i32..64, wy in 0i32..64, wz in 0i32..64) {
        let store = small_world();
        let coord = ChunkCoord::containing(wx, wz);
        let chunk = store.get(coord).unwrap();
        prop_assert_eq!(Some(store.resolve(wx, wy, wz)), chunk.get_world(wx, wy, wz));
    }

    // Writes are visible through neighbor queries
    #[test]
    fn set_then_resolve(wx in 0i32..64, wy in 0i32..64, wz in 0i32..64) {
        let mut store = small_world();
        let dirty = store.set_voxel(wx, wy, wz, VoxelId::Grass).unwrap();
        prop_assert_eq!(store.resolve(wx, wy, wz), VoxelId::Grass);
        prop_assert!(dirty.contains(&ChunkCoord::containing(wx, wz)));
        prop_assert!(dirty.len() <= 3);
    }

    #[test]
    fn unloaded_columns_use_stand_in(wx in 64i32..1000, wy in 0i32..64, wz in -1000i32..1000) {
        let mut store = small_world();
        prop_assert_eq!(store.resolve(wx, wy, wz), VoxelId::Empty);
        store.set_policy(MissingNeighbor::Sealed);
        prop_assert_eq!(store.resolve(wx, wy, wz), VoxelId::Stone);
    }
}

#[test]
fn generated_grid_has_expected_shape() {
    let store = small_world();
    assert_eq!(store.len(), 4);
    assert_eq!(store.height(), 64);
    assert_eq!(
        store.coords(),
        vec![
            ChunkCoord::new(0, 0),
            ChunkCoord::new(0, 1),
            ChunkCoord::new(1, 0),
            ChunkCoord::new(1, 1),
        ]
    );
}
