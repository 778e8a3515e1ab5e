//! Voxel identifiers and their meshing classification.
#![forbid(unsafe_code)]

pub mod types;

pub use types::{SOLID_THRESHOLD, VoxelId};
