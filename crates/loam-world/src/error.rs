use std::path::PathBuf;

use loam_chunk::{ChunkCoord, ChunkError};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid worldgen TOML: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("invalid worldgen parameter: {0}")]
    Invalid(String),
}

#[derive(Debug, Error)]
pub enum WorldError {
    #[error(transparent)]
    Chunk(#[from] ChunkError),
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("chunk {coord} has {found} slices, store expects {expected}")]
    SliceMismatch {
        coord: ChunkCoord,
        expected: usize,
        found: usize,
    },
    #[error("chunk {0} is not loaded")]
    NotLoaded(ChunkCoord),
}
