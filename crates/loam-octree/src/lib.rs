//! Sparse voxel index: a region octree stored in a flat node arena.
#![forbid(unsafe_code)]

mod arena;

pub use arena::{
    DEFAULT_BOUNDS, MAX_DEPTH, OctreeError, OctreeStats, SparseVoxelIndex, depth_limit_for,
};
