use std::sync::{Arc, RwLock};
use std::time::Duration;

use loam_blocks::VoxelId;
use loam_chunk::ChunkCoord;
use loam_mesh_cpu::build_chunk_mesh;
use loam_runtime::{JobKind, Runtime};
use loam_world::{ChunkStore, TerrainGen, WorldGenParams};

fn params() -> WorldGenParams {
    WorldGenParams {
        chunks_x: 3,
        chunks_z: 2,
        slices: 2,
        ..WorldGenParams::default()
    }
}

fn shared_world() -> (Runtime, TerrainGen) {
    let terrain = TerrainGen::with_surface(params());
    let store = ChunkStore::generate(&terrain).unwrap();
    let rt = Runtime::new(Arc::new(RwLock::new(store)), 3).unwrap();
    (rt, terrain)
}

#[test]
fn parallel_generation_matches_sequential() {
    let (rt, terrain) = shared_world();
    let par = rt.generate_world(&terrain).unwrap();
    let seq = ChunkStore::generate(&terrain).unwrap();
    assert_eq!(par.coords(), seq.coords());
    for c in seq.coords() {
        assert_eq!(par.get(c).unwrap().slices(), seq.get(c).unwrap().slices());
    }
}

#[test]
fn mesh_all_matches_direct_meshing() {
    let (rt, _) = shared_world();
    let world = rt.world().clone();
    let store = world.read().unwrap();
    let meshes = rt.mesh_all(&store);
    assert_eq!(meshes.len(), 6);
    for mesh in &meshes {
        let direct = build_chunk_mesh(store.get(mesh.coord).unwrap(), &*store);
        assert_eq!(mesh.solid, direct.solid);
        assert_eq!(mesh.foliage, direct.foliage);
    }
}

#[test]
fn queued_jobs_match_direct_meshing() {
    let (rt, _) = shared_world();
    let n = rt.submit_all_bg();
    assert_eq!(n, 6);
    let mut got = Vec::new();
    while got.len() < n {
        let out = rt
            .recv_result(Duration::from_secs(30))
            .expect("worker result");
        assert_eq!(out.kind, JobKind::Bg);
        got.push(out);
    }
    let store = rt.world().read().unwrap();
    for out in got {
        let mesh = out.mesh.as_ref().unwrap();
        let direct = build_chunk_mesh(store.get(out.coord).unwrap(), &*store);
        assert_eq!(mesh.solid, direct.solid);
        assert!(out.is_current(&store));
    }
}

#[test]
fn border_edit_remeshes_both_chunks_and_drops_stale_results() {
    let (rt, _) = shared_world();
    // Queue a background mesh, then edit before accepting it.
    rt.submit_bg(ChunkCoord::new(1, 0));
    let stale = rt.recv_result(Duration::from_secs(30)).expect("bg result");

    let dirty = rt.apply_edit(31, 60, 5, VoxelId::Stone).unwrap();
    assert!(dirty.contains(&ChunkCoord::new(0, 0)));
    assert!(dirty.contains(&ChunkCoord::new(1, 0)));
    assert!(rt.accept(stale).is_none());

    let mut fresh = Vec::new();
    while fresh.len() < dirty.len() {
        let out = rt.recv_result(Duration::from_secs(30)).expect("edit result");
        assert_eq!(out.kind, JobKind::Edit);
        fresh.push(out);
    }
    for out in fresh {
        let coord = out.coord;
        assert!(rt.accept(out).is_some());
        assert!(!rt.world().read().unwrap().edits().needs_rebuild(coord));
    }
}

#[test]
fn jobs_for_unloaded_chunks_report_no_mesh() {
    let (rt, _) = shared_world();
    rt.submit_edit(ChunkCoord::new(40, 40));
    let out = rt.recv_result(Duration::from_secs(30)).expect("result");
    assert!(out.mesh.is_none());
    assert_eq!(rt.queue_debug_counts().0, 0);
}
