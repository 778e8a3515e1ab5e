use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use loam_chunk::{DEFAULT_SLICES, MAX_SLICES};

use crate::error::ConfigError;
use crate::store::MissingNeighbor;

/// Terrain and world-layout parameters, read from TOML. Every field is optional.
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct WorldGenParams {
    #[serde(default = "default_seed")]
    pub seed: i32,
    #[serde(default = "default_chunks")]
    pub chunks_x: i32,
    #[serde(default = "default_chunks")]
    pub chunks_z: i32,
    #[serde(default = "default_slices")]
    pub slices: usize,
    /// Sample spacing for the 3D density noise.
    #[serde(default = "default_density_frequency")]
    pub density_frequency: f32,
    /// Cells whose normalized density is above this are solid.
    #[serde(default = "default_density_threshold")]
    pub density_threshold: f32,
    /// Cells closer than this to the column surface become dirt, deeper ones stone.
    #[serde(default = "default_dirt_depth")]
    pub dirt_depth: i32,
    /// Headroom kept free above the tallest possible column.
    #[serde(default = "default_surface_margin")]
    pub surface_margin: i32,
    #[serde(default = "default_grass_chance")]
    pub grass_chance: f32,
    #[serde(default)]
    pub missing_neighbor: MissingNeighbor,
}

fn default_seed() -> i32 {
    1337
}
fn default_chunks() -> i32 {
    4
}
fn default_slices() -> usize {
    DEFAULT_SLICES
}
fn default_density_frequency() -> f32 {
    0.05
}
fn default_density_threshold() -> f32 {
    0.3
}
fn default_dirt_depth() -> i32 {
    6
}
fn default_surface_margin() -> i32 {
    5
}
fn default_grass_chance() -> f32 {
    0.2
}

impl Default for WorldGenParams {
    fn default() -> Self {
        Self {
            seed: default_seed(),
            chunks_x: default_chunks(),
            chunks_z: default_chunks(),
            slices: default_slices(),
            density_frequency: default_density_frequency(),
            density_threshold: default_density_threshold(),
            dirt_depth: default_dirt_depth(),
            surface_margin: default_surface_margin(),
            grass_chance: default_grass_chance(),
            missing_neighbor: MissingNeighbor::default(),
        }
    }
}

impl WorldGenParams {
    /// Rejects values that would produce an unusable world.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.chunks_x < 1 || self.chunks_z < 1 {
            return Err(ConfigError::Invalid(format!(
                "chunk grid must be at least 1x1, got {}x{}",
                self.chunks_x, self.chunks_z
            )));
        }
        if self.slices == 0 || self.slices > MAX_SLICES {
            return Err(ConfigError::Invalid(format!(
                "slices must be in 1..={MAX_SLICES}, got {}",
                self.slices
            )));
        }
        if !(self.density_frequency.is_finite() && self.density_frequency > 0.0) {
            return Err(ConfigError::Invalid(format!(
                "density_frequency must be positive, got {}",
                self.density_frequency
            )));
        }
        if !(0.0..=1.0).contains(&self.density_threshold) {
            return Err(ConfigError::Invalid(format!(
                "density_threshold must be in [0, 1], got {}",
                self.density_threshold
            )));
        }
        if !(0.0..=1.0).contains(&self.grass_chance) {
            return Err(ConfigError::Invalid(format!(
                "grass_chance must be in [0, 1], got {}",
                self.grass_chance
            )));
        }
        if self.dirt_depth < 0 {
            return Err(ConfigError::Invalid(format!(
                "dirt_depth must not be negative, got {}",
                self.dirt_depth
            )));
        }
        let height = (self.slices * loam_chunk::SLICE_SIZE) as i32;
        if self.surface_margin < 1 || self.surface_margin >= height {
            return Err(ConfigError::Invalid(format!(
                "surface_margin must be in 1..{height}, got {}",
                self.surface_margin
            )));
        }
        Ok(())
    }
}

/// Parses and validates parameters from TOML text.
pub fn parse_params(s: &str) -> Result<WorldGenParams, ConfigError> {
    let params: WorldGenParams = toml::from_str(s)?;
    params.validate()?;
    Ok(params)
}

pub fn load_params_from_path(path: &Path) -> Result<WorldGenParams, ConfigError> {
    let s = fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let params = parse_params(&s)?;
    log::info!("loaded worldgen params from {}", path.display());
    Ok(params)
}
