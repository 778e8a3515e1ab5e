//! Runtime job queues and mesh worker orchestration.
#![forbid(unsafe_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, PoisonError, RwLock};
use std::time::{Duration, Instant};

use crossbeam_channel::{Receiver, RecvTimeoutError, Sender, TryRecvError, select, unbounded};
use loam_blocks::VoxelId;
use loam_chunk::ChunkCoord;
use loam_mesh_cpu::{ChunkMesh, build_chunk_mesh, elapsed_ms};
use loam_world::{ChunkStore, TerrainGen, WorldError};
use rayon::prelude::*;
use rayon::{ThreadPool, ThreadPoolBuildError, ThreadPoolBuilder};
use thiserror::Error;

/// World shared between the owner thread (writes) and mesh workers (reads).
pub type SharedWorld = Arc<RwLock<ChunkStore>>;

#[derive(Debug, Error)]
pub enum RuntimeError {
    #[error("failed to start worker pool: {0}")]
    Pool(#[from] ThreadPoolBuildError),
    #[error(transparent)]
    World(#[from] WorldError),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum JobKind {
    /// Remesh after an edit; served first.
    Edit,
    /// Initial or background meshing.
    Bg,
}

#[derive(Clone, Debug)]
pub struct MeshJob {
    pub coord: ChunkCoord,
    /// Edit revision of the chunk when the job was queued.
    pub rev: u64,
    pub job_id: u64,
}

pub struct MeshJobOut {
    pub coord: ChunkCoord,
    /// `None` when the chunk was not loaded by the time the job ran.
    pub mesh: Option<ChunkMesh>,
    pub rev: u64,
    pub job_id: u64,
    pub kind: JobKind,
    pub t_mesh_ms: u32,
}

impl MeshJobOut {
    /// Whether no edit reached the chunk after this job was queued.
    pub fn is_current(&self, store: &ChunkStore) -> bool {
        self.rev >= store.edits().get_rev(self.coord)
    }
}

fn process_mesh_job(job: MeshJob, kind: JobKind, world: &RwLock<ChunkStore>, tx: &Sender<MeshJobOut>) {
    let t0 = Instant::now();
    // A panicking writer cannot leave a chunk half-written, so keep reading.
    let store = world.read().unwrap_or_else(PoisonError::into_inner);
    let mesh = store.get(job.coord).map(|chunk| build_chunk_mesh(chunk, &*store));
    drop(store);
    if mesh.is_none() {
        log::debug!("mesh job {} skipped: chunk {} not loaded", job.job_id, job.coord);
    }
    let _ = tx.send(MeshJobOut {
        coord: job.coord,
        mesh,
        rev: job.rev,
        job_id: job.job_id,
        kind,
        t_mesh_ms: elapsed_ms(t0),
    });
}

struct Lanes {
    edit: Receiver<MeshJob>,
    bg: Receiver<MeshJob>,
    q_edit: Arc<AtomicUsize>,
    q_bg: Arc<AtomicUsize>,
    inflight: Arc<AtomicUsize>,
}

impl Lanes {
    fn run(&self, kind: JobKind, job: MeshJob, world: &RwLock<ChunkStore>, tx: &Sender<MeshJobOut>) {
        match kind {
            JobKind::Edit => self.q_edit.fetch_sub(1, Ordering::Relaxed),
            JobKind::Bg => self.q_bg.fetch_sub(1, Ordering::Relaxed),
        };
        self.inflight.fetch_add(1, Ordering::Relaxed);
        process_mesh_job(job, kind, world, tx);
        self.inflight.fetch_sub(1, Ordering::Relaxed);
    }

    /// Edit jobs only.
    fn edit_loop(&self, world: &RwLock<ChunkStore>, tx: &Sender<MeshJobOut>) {
        while let Ok(job) = self.edit.recv() {
            self.run(JobKind::Edit, job, world, tx);
        }
    }

    /// Background jobs, stealing edit jobs whenever any are queued.
    fn bg_loop(&self, world: &RwLock<ChunkStore>, tx: &Sender<MeshJobOut>) {
        loop {
            match self.edit.try_recv() {
                Ok(job) => {
                    self.run(JobKind::Edit, job, world, tx);
                    continue;
                }
                Err(TryRecvError::Disconnected) => {
                    while let Ok(job) = self.bg.recv() {
                        self.run(JobKind::Bg, job, world, tx);
                    }
                    break;
                }
                Err(TryRecvError::Empty) => {}
            }
            select! {
                recv(self.bg) -> res => match res {
                    Ok(job) => self.run(JobKind::Bg, job, world, tx),
                    Err(_) => {
                        while let Ok(job) = self.edit.recv() {
                            self.run(JobKind::Edit, job, world, tx);
                        }
                        break;
                    }
                },
                recv(self.edit) -> res => match res {
                    Ok(job) => self.run(JobKind::Edit, job, world, tx),
                    Err(_) => {
                        while let Ok(job) = self.bg.recv() {
                            self.run(JobKind::Bg, job, world, tx);
                        }
                        break;
                    }
                },
            }
        }
    }
}

/// Mesh workers over a shared world: one worker dedicated to edit remeshes,
/// the rest serving background jobs and helping with edits.
pub struct Runtime {
    world: SharedWorld,
    job_tx_edit: Sender<MeshJob>,
    job_tx_bg: Sender<MeshJob>,
    res_rx: Receiver<MeshJobOut>,
    // Long-lived lane workers occupy every thread of `workers`, so batch
    // work gets its own pool.
    _workers: ThreadPool,
    batch: ThreadPool,
    q_edit: Arc<AtomicUsize>,
    q_bg: Arc<AtomicUsize>,
    inflight: Arc<AtomicUsize>,
    next_job: AtomicUsize,
    pub w_edit: usize,
    pub w_bg: usize,
}

impl Runtime {
    pub fn new(world: SharedWorld, workers: usize) -> Result<Self, RuntimeError> {
        let (job_tx_edit, job_rx_edit) = unbounded::<MeshJob>();
        let (job_tx_bg, job_rx_bg) = unbounded::<MeshJob>();
        let (res_tx, res_rx) = unbounded::<MeshJobOut>();

        let w_edit = 1usize;
        let w_bg = workers.saturating_sub(w_edit).max(1);
        let pool = ThreadPoolBuilder::new()
            .num_threads(w_edit + w_bg)
            .thread_name(|i| format!("loam-mesh-{i}"))
            .build()?;
        let batch = ThreadPoolBuilder::new()
            .num_threads(workers.max(1))
            .thread_name(|i| format!("loam-batch-{i}"))
            .build()?;

        let q_edit = Arc::new(AtomicUsize::new(0));
        let q_bg = Arc::new(AtomicUsize::new(0));
        let inflight = Arc::new(AtomicUsize::new(0));

        for i in 0..w_edit + w_bg {
            let lanes = Lanes {
                edit: job_rx_edit.clone(),
                bg: job_rx_bg.clone(),
                q_edit: q_edit.clone(),
                q_bg: q_bg.clone(),
                inflight: inflight.clone(),
            };
            let tx = res_tx.clone();
            let world = world.clone();
            let dedicated_edit = i < w_edit;
            pool.spawn(move || {
                if dedicated_edit {
                    lanes.edit_loop(&world, &tx);
                } else {
                    lanes.bg_loop(&world, &tx);
                }
            });
        }
        log::info!("runtime started: {} edit worker(s), {} background worker(s)", w_edit, w_bg);

        Ok(Self {
            world,
            job_tx_edit,
            job_tx_bg,
            res_rx,
            _workers: pool,
            batch,
            q_edit,
            q_bg,
            inflight,
            next_job: AtomicUsize::new(1),
            w_edit,
            w_bg,
        })
    }

    #[inline]
    pub fn world(&self) -> &SharedWorld {
        &self.world
    }

    fn make_job(&self, coord: ChunkCoord) -> MeshJob {
        let rev = self
            .world
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .edits()
            .get_rev(coord);
        MeshJob {
            coord,
            rev,
            job_id: self.next_job.fetch_add(1, Ordering::Relaxed) as u64,
        }
    }

    pub fn submit_edit(&self, coord: ChunkCoord) {
        let job = self.make_job(coord);
        self.q_edit.fetch_add(1, Ordering::Relaxed);
        if self.job_tx_edit.send(job).is_err() {
            self.q_edit.fetch_sub(1, Ordering::Relaxed);
        }
    }

    pub fn submit_bg(&self, coord: ChunkCoord) {
        let job = self.make_job(coord);
        self.q_bg.fetch_add(1, Ordering::Relaxed);
        if self.job_tx_bg.send(job).is_err() {
            self.q_bg.fetch_sub(1, Ordering::Relaxed);
        }
    }

    /// Queues a background job for every loaded chunk; returns how many.
    pub fn submit_all_bg(&self) -> usize {
        let coords = self
            .world
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .coords();
        for c in &coords {
            self.submit_bg(*c);
        }
        coords.len()
    }

    /// Applies an edit under the write lock and queues remeshes for every
    /// chunk it touched. Returns those chunks.
    pub fn apply_edit(
        &self,
        wx: i32,
        wy: i32,
        wz: i32,
        id: VoxelId,
    ) -> Result<Vec<ChunkCoord>, RuntimeError> {
        let dirty = self
            .world
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .set_voxel(wx, wy, wz, id)?;
        for c in &dirty {
            self.submit_edit(*c);
        }
        Ok(dirty)
    }

    pub fn drain_worker_results(&self) -> Vec<MeshJobOut> {
        self.res_rx.try_iter().collect()
    }

    /// Blocks for the next result, up to `timeout`.
    pub fn recv_result(&self, timeout: Duration) -> Option<MeshJobOut> {
        match self.res_rx.recv_timeout(timeout) {
            Ok(out) => Some(out),
            Err(RecvTimeoutError::Timeout) | Err(RecvTimeoutError::Disconnected) => None,
        }
    }

    /// Records a current result as built and hands back its mesh; stale or
    /// empty results yield `None`.
    pub fn accept(&self, out: MeshJobOut) -> Option<ChunkMesh> {
        let mut store = self.world.write().unwrap_or_else(PoisonError::into_inner);
        if !out.is_current(&store) {
            log::debug!(
                "dropping stale mesh for {} (rev {} < {})",
                out.coord,
                out.rev,
                store.edits().get_rev(out.coord)
            );
            return None;
        }
        store.mark_built(out.coord, out.rev);
        out.mesh
    }

    /// Queued edit jobs, queued background jobs, jobs in flight.
    pub fn queue_debug_counts(&self) -> (usize, usize, usize) {
        (
            self.q_edit.load(Ordering::Relaxed),
            self.q_bg.load(Ordering::Relaxed),
            self.inflight.load(Ordering::Relaxed),
        )
    }

    /// Meshes every loaded chunk in parallel and returns the meshes in
    /// coordinate order. Runs on the batch pool, bypassing the queues.
    pub fn mesh_all(&self, store: &ChunkStore) -> Vec<ChunkMesh> {
        let t0 = Instant::now();
        let coords = store.coords();
        let meshes: Vec<ChunkMesh> = self.batch.install(|| {
            coords
                .par_iter()
                .filter_map(|c| store.get(*c).map(|chunk| build_chunk_mesh(chunk, store)))
                .collect()
        });
        log::info!(target: "perf", "ms={} mesh_all chunks={}", elapsed_ms(t0), meshes.len());
        meshes
    }

    /// Generates the configured chunk grid in parallel.
    pub fn generate_world(&self, terrain: &TerrainGen) -> Result<ChunkStore, RuntimeError> {
        let t0 = Instant::now();
        let p = terrain.params();
        let coords: Vec<ChunkCoord> = (0..p.chunks_z)
            .flat_map(|cz| (0..p.chunks_x).map(move |cx| ChunkCoord::new(cx, cz)))
            .collect();
        let chunks = self.batch.install(|| {
            coords
                .par_iter()
                .map(|c| terrain.generate(*c))
                .collect::<Result<Vec<_>, _>>()
        });
        let mut store = ChunkStore::new(p.slices, p.missing_neighbor)?;
        for chunk in chunks.map_err(WorldError::from)? {
            store.insert(chunk)?;
        }
        log::info!(target: "perf", "ms={} generate_world chunks={}", elapsed_ms(t0), store.len());
        Ok(store)
    }
}
