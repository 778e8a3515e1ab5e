use hashbrown::HashMap;
use serde::{Deserialize, Serialize};

use loam_blocks::VoxelId;
use loam_chunk::{Chunk, ChunkCoord, NeighborQuery, SLICE_SIZE, check_slice_count};
use loam_edit::EditStore;

use crate::error::WorldError;
use crate::terrain::TerrainGen;

/// Value reported for cells of chunks that are not loaded under
/// [`MissingNeighbor::Sealed`].
pub const SEALED_STAND_IN: VoxelId = VoxelId::Stone;

/// What a neighbor lookup sees where no chunk is loaded.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MissingNeighbor {
    /// Unloaded space is open; faces on the loaded edge always render.
    #[default]
    Open,
    /// Unloaded space is solid; loaded-edge faces are culled.
    Sealed,
}

impl MissingNeighbor {
    #[inline]
    pub fn stand_in(self) -> VoxelId {
        match self {
            MissingNeighbor::Open => VoxelId::Empty,
            MissingNeighbor::Sealed => SEALED_STAND_IN,
        }
    }
}

/// Loaded chunks keyed by grid position, all of the same height.
pub struct ChunkStore {
    chunks: HashMap<ChunkCoord, Chunk>,
    slices: usize,
    policy: MissingNeighbor,
    edits: EditStore,
}

impl ChunkStore {
    pub fn new(slices: usize, policy: MissingNeighbor) -> Result<Self, WorldError> {
        check_slice_count(slices)?;
        Ok(Self {
            chunks: HashMap::new(),
            slices,
            policy,
            edits: EditStore::new(),
        })
    }

    /// Generates the `chunks_x * chunks_z` grid described by the generator's params.
    pub fn generate(terrain: &TerrainGen) -> Result<Self, WorldError> {
        let p = terrain.params();
        let mut store = Self::new(p.slices, p.missing_neighbor)?;
        for cz in 0..p.chunks_z {
            for cx in 0..p.chunks_x {
                store.insert(terrain.generate(ChunkCoord::new(cx, cz))?)?;
            }
        }
        log::info!(
            "generated {} chunks ({}x{}, height {})",
            store.len(),
            p.chunks_x,
            p.chunks_z,
            store.height()
        );
        Ok(store)
    }

    #[inline]
    pub fn slices(&self) -> usize {
        self.slices
    }

    #[inline]
    pub fn height(&self) -> usize {
        self.slices * SLICE_SIZE
    }

    #[inline]
    pub fn policy(&self) -> MissingNeighbor {
        self.policy
    }

    pub fn set_policy(&mut self, policy: MissingNeighbor) {
        self.policy = policy;
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.chunks.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.chunks.is_empty()
    }

    /// Adds or replaces a chunk, returning the previous one at that position.
    /// Edits recorded for that position are written over the incoming voxels,
    /// so a regenerated or reloaded chunk keeps them.
    pub fn insert(&mut self, mut chunk: Chunk) -> Result<Option<Chunk>, WorldError> {
        if chunk.slice_count() != self.slices {
            return Err(WorldError::SliceMismatch {
                coord: chunk.coord(),
                expected: self.slices,
                found: chunk.slice_count(),
            });
        }
        let coord = chunk.coord();
        let edits = self.edits.snapshot_for_chunk(coord);
        if !edits.is_empty() {
            let (x0, _, z0) = coord.world_origin();
            for ((wx, wy, wz), id) in &edits {
                chunk.set(wx - x0, *wy, wz - z0, *id);
            }
            log::debug!("replayed {} edit(s) onto chunk {}", edits.len(), coord);
        }
        Ok(self.chunks.insert(coord, chunk))
    }

    /// Rebuilds one chunk from the generator, keeping recorded edits, and
    /// bumps its revision so existing meshes count as stale.
    pub fn regenerate(&mut self, terrain: &TerrainGen, coord: ChunkCoord) -> Result<u64, WorldError> {
        self.insert(terrain.generate(coord)?)?;
        Ok(self.edits.bump_chunk(coord))
    }

    pub fn remove(&mut self, coord: ChunkCoord) -> Option<Chunk> {
        self.chunks.remove(&coord)
    }

    #[inline]
    pub fn get(&self, coord: ChunkCoord) -> Option<&Chunk> {
        self.chunks.get(&coord)
    }

    #[inline]
    pub fn contains(&self, coord: ChunkCoord) -> bool {
        self.chunks.contains_key(&coord)
    }

    /// Loaded chunk positions in ascending order.
    pub fn coords(&self) -> Vec<ChunkCoord> {
        let mut out: Vec<ChunkCoord> = self.chunks.keys().copied().collect();
        out.sort();
        out
    }

    pub fn iter(&self) -> impl Iterator<Item = &Chunk> {
        self.chunks.values()
    }

    #[inline]
    pub fn edits(&self) -> &EditStore {
        &self.edits
    }

    /// Records that `coord` was meshed at revision `rev`.
    pub fn mark_built(&mut self, coord: ChunkCoord, rev: u64) {
        self.edits.mark_built(coord, rev);
    }

    /// Writes one voxel and returns the loaded chunks that must be remeshed:
    /// the owning chunk plus each face neighbor across a touched border.
    /// Heights outside the world are ignored like any out-of-range write.
    pub fn set_voxel(
        &mut self,
        wx: i32,
        wy: i32,
        wz: i32,
        id: VoxelId,
    ) -> Result<Vec<ChunkCoord>, WorldError> {
        if wy < 0 || wy >= self.height() as i32 {
            return Ok(Vec::new());
        }
        let coord = ChunkCoord::containing(wx, wz);
        let chunk = self
            .chunks
            .get_mut(&coord)
            .ok_or(WorldError::NotLoaded(coord))?;
        let (x0, _, z0) = coord.world_origin();
        chunk.set(wx - x0, wy, wz - z0, id);
        self.edits.set(wx, wy, wz, id);
        let (_, affected) = self.edits.bump_region_around(wx, wz);
        Ok(affected
            .into_iter()
            .filter(|c| self.chunks.contains_key(c))
            .collect())
    }
}

impl NeighborQuery for ChunkStore {
    fn resolve(&self, wx: i32, wy: i32, wz: i32) -> VoxelId {
        if wy < 0 || wy >= self.height() as i32 {
            return VoxelId::OutOfBounds;
        }
        let coord = ChunkCoord::containing(wx, wz);
        match self.chunks.get(&coord) {
            Some(chunk) => {
                let (x0, _, z0) = coord.world_origin();
                chunk.get(wx - x0, wy, wz - z0)
            }
            None => self.policy.stand_in(),
        }
    }
}
