use loam_blocks::VoxelId;
use thiserror::Error;

use crate::coord::ChunkCoord;
use crate::neighbors::NeighborQuery;
use crate::slice::{SLICE_SIZE, Slice};

pub const CHUNK_WIDTH: usize = SLICE_SIZE;
pub const CHUNK_DEPTH: usize = SLICE_SIZE;
pub const DEFAULT_SLICES: usize = 4;
/// Packed vertices carry the slice index in 3 bits.
pub const MAX_SLICES: usize = 8;

#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum ChunkError {
    #[error("a chunk needs at least one slice")]
    ZeroSlices,
    #[error("{requested} slices requested, at most {max} are supported")]
    TooManySlices { requested: usize, max: usize },
}

/// A column of slices stacked along Y at a fixed chunk-grid position.
#[derive(Clone, Debug)]
pub struct Chunk {
    coord: ChunkCoord,
    slices: Vec<Slice>,
}

/// Accepts `1..=MAX_SLICES` slices per chunk.
pub fn check_slice_count(slice_count: usize) -> Result<(), ChunkError> {
    if slice_count == 0 {
        return Err(ChunkError::ZeroSlices);
    }
    if slice_count > MAX_SLICES {
        return Err(ChunkError::TooManySlices {
            requested: slice_count,
            max: MAX_SLICES,
        });
    }
    Ok(())
}

impl Chunk {
    pub fn new(coord: ChunkCoord, slice_count: usize) -> Result<Self, ChunkError> {
        check_slice_count(slice_count)?;
        Ok(Self {
            coord,
            slices: (0..slice_count).map(|_| Slice::new()).collect(),
        })
    }

    #[inline]
    pub fn coord(&self) -> ChunkCoord {
        self.coord
    }

    #[inline]
    pub fn slice_count(&self) -> usize {
        self.slices.len()
    }

    #[inline]
    pub fn height(&self) -> usize {
        self.slices.len() * SLICE_SIZE
    }

    #[inline]
    pub fn slices(&self) -> &[Slice] {
        &self.slices
    }

    #[inline]
    pub fn slice(&self, index: usize) -> Option<&Slice> {
        self.slices.get(index)
    }

    #[inline]
    pub fn get(&self, x: i32, y: i32, z: i32) -> VoxelId {
        if y < 0 || y >= self.height() as i32 {
            return VoxelId::OutOfBounds;
        }
        let s = SLICE_SIZE as i32;
        self.slices[(y / s) as usize].get(x, y % s, z)
    }

    #[inline]
    pub fn set(&mut self, x: i32, y: i32, z: i32, id: VoxelId) {
        if y < 0 || y >= self.height() as i32 {
            return;
        }
        let s = SLICE_SIZE as i32;
        self.slices[(y / s) as usize].set(x, y % s, z, id);
    }

    #[inline]
    pub fn contains_world(&self, wx: i32, wy: i32, wz: i32) -> bool {
        let (bx, _, bz) = self.coord.world_origin();
        wy >= 0
            && wy < self.height() as i32
            && wx >= bx
            && wx < bx + CHUNK_WIDTH as i32
            && wz >= bz
            && wz < bz + CHUNK_DEPTH as i32
    }

    #[inline]
    pub fn get_world(&self, wx: i32, wy: i32, wz: i32) -> Option<VoxelId> {
        if !self.contains_world(wx, wy, wz) {
            return None;
        }
        let (bx, _, bz) = self.coord.world_origin();
        Some(self.get(wx - bx, wy, wz - bz))
    }

    pub fn is_empty(&self) -> bool {
        self.slices.iter().all(Slice::is_empty)
    }

    pub fn solid_count(&self) -> usize {
        self.slices
            .iter()
            .flat_map(|s| s.as_slice().iter())
            .filter(|v| v.is_solid())
            .count()
    }
}

/// A chunk on its own: cells beside it are open, cells above or below
/// its height are out of bounds.
impl NeighborQuery for Chunk {
    fn resolve(&self, wx: i32, wy: i32, wz: i32) -> VoxelId {
        if wy < 0 || wy >= self.height() as i32 {
            return VoxelId::OutOfBounds;
        }
        self.get_world(wx, wy, wz).unwrap_or(VoxelId::Empty)
    }
}
