//! World generation parameters, terrain population and the chunk store
//! that answers neighbor queries across chunk borders.
#![forbid(unsafe_code)]

pub mod error;
pub mod height;
pub mod store;
pub mod terrain;
pub mod worldgen;

pub use error::{ConfigError, WorldError};
pub use height::{HeightSampler, SurfaceHeightmap};
pub use store::{ChunkStore, MissingNeighbor, SEALED_STAND_IN};
pub use terrain::TerrainGen;
pub use worldgen::{WorldGenParams, load_params_from_path, parse_params};
