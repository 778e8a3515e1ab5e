use std::sync::Arc;
use std::time::Instant;

use fastnoise_lite::{FastNoiseLite, NoiseType};
use loam_blocks::VoxelId;
use loam_chunk::{CHUNK_DEPTH, CHUNK_WIDTH, Chunk, ChunkCoord, ChunkError};

use crate::height::{HeightSampler, SurfaceHeightmap};
use crate::worldgen::WorldGenParams;

/// Fills chunks from a height oracle carved by 3D density noise.
///
/// For each column the surface sits at `height * (chunk_height - margin)`.
/// Every cell from the surface down to `y = 1` is solid when its density
/// clears the threshold: dirt near the surface, stone below. The surface
/// cell, when solid, may carry grass directly above it.
pub struct TerrainGen {
    params: WorldGenParams,
    density: FastNoiseLite,
    heights: Arc<dyn HeightSampler>,
}

impl TerrainGen {
    pub fn new(params: WorldGenParams, heights: Arc<dyn HeightSampler>) -> Self {
        let mut density = FastNoiseLite::with_seed(params.seed);
        density.set_noise_type(Some(NoiseType::OpenSimplex2));
        density.set_frequency(Some(params.density_frequency));
        Self {
            params,
            density,
            heights,
        }
    }

    /// Generator over the default rolling [`SurfaceHeightmap`].
    pub fn with_surface(params: WorldGenParams) -> Self {
        Self::new(params, Arc::new(SurfaceHeightmap))
    }

    #[inline]
    pub fn params(&self) -> &WorldGenParams {
        &self.params
    }

    /// Surface cell index for a column of a chunk `chunk_height` voxels tall.
    pub fn surface_height(&self, wx: i32, wz: i32, chunk_height: i32) -> i32 {
        let span = (chunk_height - self.params.surface_margin).max(0);
        let h = self.heights.height(wx, wz).clamp(0.0, 1.0);
        (h * span as f32) as i32
    }

    /// Density noise normalized to `[0, 1]`.
    #[inline]
    pub fn density(&self, wx: i32, wy: i32, wz: i32) -> f32 {
        let n = self.density.get_noise_3d(wx as f32, wy as f32, wz as f32);
        ((n + 1.0) * 0.5).clamp(0.0, 1.0)
    }

    /// Deterministic per-column value in `[0, 1)` used for grass placement.
    fn column_roll(&self, wx: i32, wz: i32) -> f32 {
        let mut h = (wx as u32).wrapping_mul(0x85eb_ca6b)
            ^ (wz as u32).wrapping_mul(0xc2b2_ae35)
            ^ (self.params.seed as u32).wrapping_mul(0x27d4_eb2d);
        h ^= h >> 15;
        h = h.wrapping_mul(0x7feb_352d);
        h ^= h >> 15;
        h = h.wrapping_mul(0x846c_a68b);
        h ^= h >> 16;
        (h >> 8) as f32 / (1u32 << 24) as f32
    }

    /// Populates every column of `chunk` in place. Existing contents are kept
    /// wherever the generator places nothing.
    pub fn populate(&self, chunk: &mut Chunk) {
        let start = Instant::now();
        let coord = chunk.coord();
        let (base_x, _, base_z) = coord.world_origin();
        let chunk_height = chunk.height() as i32;
        let mut solids = 0usize;
        for z in 0..CHUNK_DEPTH as i32 {
            for x in 0..CHUNK_WIDTH as i32 {
                let (wx, wz) = (base_x + x, base_z + z);
                let surface = self.surface_height(wx, wz, chunk_height);
                for y in (1..=surface).rev() {
                    if self.density(wx, y, wz) <= self.params.density_threshold {
                        continue;
                    }
                    let depth = surface - y;
                    let id = if depth < self.params.dirt_depth {
                        VoxelId::Dirt
                    } else {
                        VoxelId::Stone
                    };
                    chunk.set(x, y, z, id);
                    solids += 1;
                    if y == surface && self.column_roll(wx, wz) < self.params.grass_chance {
                        chunk.set(x, surface + 1, z, VoxelId::Grass);
                    }
                }
            }
        }
        log::info!(
            target: "perf",
            "ms={} worldgen_chunk cx={} cz={} solids={}",
            start.elapsed().as_millis(),
            coord.cx,
            coord.cz,
            solids
        );
    }

    /// Allocates and populates a chunk using the configured slice count.
    pub fn generate(&self, coord: ChunkCoord) -> Result<Chunk, ChunkError> {
        let mut chunk = Chunk::new(coord, self.params.slices)?;
        self.populate(&mut chunk);
        Ok(chunk)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn flat(h: f32) -> Arc<dyn HeightSampler> {
        Arc::new(move |_: i32, _: i32| h)
    }

    fn solid_everywhere() -> WorldGenParams {
        WorldGenParams {
            density_threshold: -1.0,
            grass_chance: 0.0,
            ..WorldGenParams::default()
        }
    }

    #[test]
    fn column_layers_dirt_over_stone() {
        let params = WorldGenParams {
            slices: 1,
            ..solid_everywhere()
        };
        let tg = TerrainGen::new(params, flat(1.0));
        let chunk = tg.generate(ChunkCoord::new(0, 0)).unwrap();
        // 1.0 * (32 - 5) = 27
        assert_eq!(tg.surface_height(0, 0, 32), 27);
        assert_eq!(chunk.get(3, 0, 3), VoxelId::Empty);
        assert_eq!(chunk.get(3, 1, 3), VoxelId::Stone);
        assert_eq!(chunk.get(3, 21, 3), VoxelId::Stone);
        assert_eq!(chunk.get(3, 22, 3), VoxelId::Dirt);
        assert_eq!(chunk.get(3, 27, 3), VoxelId::Dirt);
        assert_eq!(chunk.get(3, 28, 3), VoxelId::Empty);
    }

    #[test]
    fn grass_sits_on_the_surface() {
        let params = WorldGenParams {
            slices: 1,
            grass_chance: 1.0,
            ..solid_everywhere()
        };
        let tg = TerrainGen::new(params, flat(0.5));
        let chunk = tg.generate(ChunkCoord::new(1, 1)).unwrap();
        let surface = tg.surface_height(32, 32, 32);
        assert_eq!(chunk.get(0, surface + 1, 0), VoxelId::Grass);
        assert!(chunk.get(0, surface, 0).occludes());
    }

    #[test]
    fn generation_is_deterministic() {
        let a = TerrainGen::with_surface(WorldGenParams::default());
        let b = TerrainGen::with_surface(WorldGenParams::default());
        let ca = a.generate(ChunkCoord::new(-1, 2)).unwrap();
        let cb = b.generate(ChunkCoord::new(-1, 2)).unwrap();
        assert_eq!(ca.slices(), cb.slices());
        assert!(ca.solid_count() > 0);
    }

    #[test]
    fn bad_slice_count_surfaces_chunk_error() {
        let tg = TerrainGen::with_surface(WorldGenParams {
            slices: 0,
            ..WorldGenParams::default()
        });
        assert_eq!(tg.generate(ChunkCoord::default()).unwrap_err(), ChunkError::ZeroSlices);
    }

    #[test]
    fn density_is_normalized() {
        let tg = TerrainGen::with_surface(WorldGenParams::default());
        for i in -50..50 {
            let d = tg.density(i * 3, i, i * 7);
            assert!((0.0..=1.0).contains(&d));
        }
    }
}
