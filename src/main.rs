mod cli;

use std::error::Error;
use std::sync::{Arc, RwLock};
use std::time::Duration;

use clap::Parser;
use loam_blocks::VoxelId;
use loam_chunk::{ChunkCoord, SLICE_SIZE};
use loam_geom::Aabb;
use loam_octree::SparseVoxelIndex;
use loam_render::{ChunkRenderer, DrawCall, HeadlessDevice, HeadlessFactory, VertexBufferPool};
use loam_runtime::Runtime;
use loam_world::{ChunkStore, TerrainGen, WorldGenParams, load_params_from_path};

use crate::cli::Cli;

fn summarize(frame: &str, calls: &[DrawCall], dev: &HeadlessDevice) {
    let elements: u64 = calls.iter().map(|c| c.element_count as u64).sum();
    log::info!(
        "{}: {} draw calls, {} triangles, {} KiB uploaded so far",
        frame,
        calls.len(),
        elements / 3,
        dev.uploaded_bytes() / 1024
    );
}

fn octree_report(store: &ChunkStore) {
    let Some(chunk) = store.get(ChunkCoord::new(0, 0)) else {
        log::warn!("octree report skipped: chunk (0, 0) not loaded");
        return;
    };
    let height = chunk.height();
    let mut index = SparseVoxelIndex::with_bounds(Aabb::from_size(32.0, height as f32, 32.0));
    let mut rejected = 0usize;
    for z in 0..32 {
        for y in 0..height as i32 {
            for x in 0..32 {
                let id = chunk.get(x, y, z);
                if id == VoxelId::Empty {
                    continue;
                }
                if index.insert_voxel(x, y, z, id).is_err() {
                    rejected += 1;
                }
            }
        }
    }
    let stats = index.stats();
    log::info!(
        "octree for chunk (0, 0): {} nodes, {} leaves ({} occupied), depth {} of {}, {} rejected; dense volume holds {} cells",
        stats.nodes,
        stats.leaves,
        stats.occupied_leaves,
        stats.max_depth,
        index.depth_limit(),
        rejected,
        height * SLICE_SIZE * SLICE_SIZE
    );
}

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let cli = Cli::parse();

    let params = match &cli.config {
        Some(path) => load_params_from_path(path)?,
        None => WorldGenParams::default(),
    };
    let params = cli.apply(params);
    params.validate()?;
    log::info!(
        "world {}x{} chunks, {} slices, seed {}, missing neighbors {:?}",
        params.chunks_x,
        params.chunks_z,
        params.slices,
        params.seed,
        params.missing_neighbor
    );

    let terrain = TerrainGen::with_surface(params.clone());
    let placeholder = ChunkStore::new(params.slices, params.missing_neighbor)?;
    let rt = Runtime::new(Arc::new(RwLock::new(placeholder)), cli.workers)?;
    let store = rt.generate_world(&terrain)?;
    if cli.octree_report {
        octree_report(&store);
    }
    let meshes = rt.mesh_all(&store);
    *rt.world().write().map_err(|e| e.to_string())? = store;

    let mut pool = VertexBufferPool::new(HeadlessFactory::default());
    let mut device = HeadlessDevice::new();
    let mut renderer = ChunkRenderer::new();
    for mesh in meshes {
        renderer.update(mesh);
    }
    let calls = renderer.render_frame(&mut pool, &mut device)?;
    summarize("frame 1", &calls, &device);

    let digs = cli.digs();
    if !digs.is_empty() {
        let mut pending = 0usize;
        for (x, y, z) in digs {
            match rt.apply_edit(x, y, z, VoxelId::Empty) {
                Ok(dirty) => pending += dirty.len(),
                Err(e) => log::warn!("dig at ({x}, {y}, {z}) failed: {e}"),
            }
        }
        while pending > 0 {
            let Some(out) = rt.recv_result(Duration::from_secs(10)) else {
                log::warn!("timed out waiting for {pending} remesh result(s)");
                break;
            };
            pending -= 1;
            if let Some(mesh) = rt.accept(out) {
                renderer.update(mesh);
            }
        }
        let calls = renderer.render_frame(&mut pool, &mut device)?;
        summarize("frame 2", &calls, &device);
    }

    renderer.dispose_all(&mut pool);
    log::info!(
        "buffers: {} created, {} in use after shutdown",
        pool.total(),
        pool.in_use()
    );
    Ok(())
}
