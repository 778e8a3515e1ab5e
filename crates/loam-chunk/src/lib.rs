//! Dense chunk storage: slices, chunks, chunk coordinates and the
//! neighbor lookup capability consumed by meshing.
#![forbid(unsafe_code)]

mod chunk;
mod coord;
mod neighbors;
mod slice;

pub use chunk::{
    CHUNK_DEPTH, CHUNK_WIDTH, Chunk, ChunkError, DEFAULT_SLICES, MAX_SLICES, check_slice_count,
};
pub use coord::ChunkCoord;
pub use neighbors::NeighborQuery;
pub use slice::{SLICE_SIZE, SLICE_VOLUME, Slice};
