use std::path::PathBuf;

use clap::Parser;
use loam_world::{MissingNeighbor, WorldGenParams};

#[derive(Parser, Debug)]
#[command(
    name = "loam",
    about = "Generate a voxel chunk grid, mesh it and push it through a headless upload path"
)]
pub struct Cli {
    /// Worldgen TOML; every field is optional
    #[arg(long)]
    pub config: Option<PathBuf>,
    /// Chunks along X (overrides config)
    #[arg(long)]
    pub chunks_x: Option<i32>,
    /// Chunks along Z (overrides config)
    #[arg(long)]
    pub chunks_z: Option<i32>,
    /// 32-voxel slices per chunk, 1..=8 (overrides config)
    #[arg(long)]
    pub slices: Option<usize>,
    /// Noise seed (overrides config)
    #[arg(long, allow_hyphen_values = true)]
    pub seed: Option<i32>,
    /// Mesh worker threads
    #[arg(long, default_value_t = 4)]
    pub workers: usize,
    /// Treat unloaded chunks as solid so the grid's outer walls are culled
    #[arg(long)]
    pub sealed: bool,
    /// Carve a voxel at X Y Z after the first frame and remesh (repeatable)
    #[arg(long, num_args = 3, value_names = ["X", "Y", "Z"], allow_hyphen_values = true)]
    pub dig: Vec<i32>,
    /// Also index chunk (0, 0) in a sparse octree and report its size
    #[arg(long)]
    pub octree_report: bool,
}

impl Cli {
    /// Applies command-line overrides on top of file or default params.
    pub fn apply(&self, mut params: WorldGenParams) -> WorldGenParams {
        if let Some(v) = self.chunks_x {
            params.chunks_x = v;
        }
        if let Some(v) = self.chunks_z {
            params.chunks_z = v;
        }
        if let Some(v) = self.slices {
            params.slices = v;
        }
        if let Some(v) = self.seed {
            params.seed = v;
        }
        if self.sealed {
            params.missing_neighbor = MissingNeighbor::Sealed;
        }
        params
    }

    pub fn digs(&self) -> Vec<(i32, i32, i32)> {
        self.dig
            .chunks_exact(3)
            .map(|c| (c[0], c[1], c[2]))
            .collect()
    }
}
