//! Voxel edit log and per-chunk revisions.
#![forbid(unsafe_code)]

use loam_blocks::VoxelId;
use loam_chunk::{CHUNK_DEPTH, CHUNK_WIDTH, ChunkCoord};
use std::collections::HashMap;

#[derive(Default, Debug, Clone, Copy)]
pub struct EditStoreStats {
    pub chunk_entries: usize,
    pub voxel_edits: usize,
    pub rev_entries: usize,
    pub built_entries: usize,
}

/// Chunk-aware edit log with change tracking.
///
/// Every edit bumps a global stamp. The edited chunk, plus any face-adjacent
/// chunk whose border column was touched, records that stamp as its latest
/// revision; a chunk needs remeshing while its revision is ahead of the
/// revision it was last built at.
#[derive(Default)]
pub struct EditStore {
    // chunk -> world coords -> voxel, replayed when a chunk is (re)loaded
    inner: HashMap<ChunkCoord, HashMap<(i32, i32, i32), VoxelId>>,
    rev: HashMap<ChunkCoord, u64>,   // latest change affecting chunk
    built: HashMap<ChunkCoord, u64>, // last built rev for chunk
    counter: u64,
}

impl EditStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn stats(&self) -> EditStoreStats {
        EditStoreStats {
            chunk_entries: self.inner.len(),
            voxel_edits: self.inner.values().map(|m| m.len()).sum(),
            rev_entries: self.rev.len(),
            built_entries: self.built.len(),
        }
    }

    /// Records an edit. Does not touch revisions; see [`EditStore::bump_region_around`].
    pub fn set(&mut self, wx: i32, wy: i32, wz: i32, id: VoxelId) {
        let k = ChunkCoord::containing(wx, wz);
        self.inner.entry(k).or_default().insert((wx, wy, wz), id);
    }

    /// Snapshot of all edits for a specific chunk.
    pub fn snapshot_for_chunk(&self, coord: ChunkCoord) -> Vec<((i32, i32, i32), VoxelId)> {
        match self.inner.get(&coord) {
            Some(m) => m.iter().map(|(k, v)| (*k, *v)).collect(),
            None => Vec::new(),
        }
    }

    /// Chunks whose mesh can change after an edit in column `(wx, wz)`: the
    /// owning chunk first, then each face neighbor whose shared border the
    /// column lies on.
    pub fn affected_chunks(wx: i32, wz: i32) -> Vec<ChunkCoord> {
        let coord = ChunkCoord::containing(wx, wz);
        let (x0, _, z0) = coord.world_origin();
        let lx = wx - x0;
        let lz = wz - z0;
        let mut affected = vec![coord];
        if lx == 0 {
            affected.push(coord.offset(-1, 0));
        }
        if lx == CHUNK_WIDTH as i32 - 1 {
            affected.push(coord.offset(1, 0));
        }
        if lz == 0 {
            affected.push(coord.offset(0, -1));
        }
        if lz == CHUNK_DEPTH as i32 - 1 {
            affected.push(coord.offset(0, 1));
        }
        affected
    }

    /// Change-tracking: stamps every chunk from [`EditStore::affected_chunks`]
    /// with a new monotonically increasing revision and returns the stamp
    /// along with the chunks that now need remeshing.
    pub fn bump_region_around(&mut self, wx: i32, wz: i32) -> (u64, Vec<ChunkCoord>) {
        self.counter = self.counter.wrapping_add(1).max(1);
        let stamp = self.counter;
        let affected = Self::affected_chunks(wx, wz);
        for c in &affected {
            self.rev.insert(*c, stamp);
        }
        log::debug!(
            "edit stamp={} at ({}, {}) marks {} chunk(s)",
            stamp,
            wx,
            wz,
            affected.len()
        );
        (stamp, affected)
    }

    /// Stamps a single chunk, e.g. after it was regenerated wholesale.
    pub fn bump_chunk(&mut self, coord: ChunkCoord) -> u64 {
        self.counter = self.counter.wrapping_add(1).max(1);
        self.rev.insert(coord, self.counter);
        self.counter
    }

    pub fn get_rev(&self, coord: ChunkCoord) -> u64 {
        self.rev.get(&coord).copied().unwrap_or(0)
    }

    pub fn mark_built(&mut self, coord: ChunkCoord, rev: u64) {
        // Only update if this is a newer revision
        let e = self.built.entry(coord).or_insert(0);
        if rev > *e {
            *e = rev;
        }
    }

    pub fn get_built_rev(&self, coord: ChunkCoord) -> u64 {
        self.built.get(&coord).copied().unwrap_or(0)
    }

    pub fn needs_rebuild(&self, coord: ChunkCoord) -> bool {
        self.get_rev(coord) > self.get_built_rev(coord)
    }

    /// Chunks with changes not yet built, sorted for deterministic scheduling.
    pub fn pending(&self) -> Vec<ChunkCoord> {
        let mut out: Vec<ChunkCoord> = self
            .rev
            .keys()
            .copied()
            .filter(|c| self.needs_rebuild(*c))
            .collect();
        out.sort();
        out
    }
}
