//! CPU surface mesher: culled cube faces plus foliage billboards, packed
//! into 32-bit vertices.
#![forbid(unsafe_code)]

mod constants;
mod emit;
pub mod face;
pub mod mesh_build;
pub mod vertex;

use std::time::Instant;

use loam_blocks::VoxelId;
use loam_chunk::{CHUNK_DEPTH, CHUNK_WIDTH, Chunk, ChunkCoord, NeighborQuery, SLICE_SIZE};

pub use constants::FOLIAGE_NORMAL_ID;
pub use face::Face;
pub use mesh_build::MeshBuild;
pub use vertex::{PackedVertex, UvCorner, VertexFields};

use emit::{SectionCell, emit_cross, emit_cube_face};

/// Output of meshing one chunk: an opaque stream and a foliage stream.
#[derive(Clone, Debug, Default)]
pub struct ChunkMesh {
    pub coord: ChunkCoord,
    pub solid: MeshBuild,
    pub foliage: MeshBuild,
}

impl ChunkMesh {
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.solid.is_empty() && self.foliage.is_empty()
    }
}

/// Milliseconds since `start`, saturating, for `perf` log lines.
pub fn elapsed_ms(start: Instant) -> u32 {
    start.elapsed().as_millis().min(u128::from(u32::MAX)) as u32
}

/// Meshes `chunk`, resolving every face neighbor through `neighbors` in
/// world space. A face is emitted when its neighbor is non-solid or foliage.
/// Reads only; nothing is written back to any chunk.
pub fn build_chunk_mesh<N>(chunk: &Chunk, neighbors: &N) -> ChunkMesh
where
    N: NeighborQuery + ?Sized,
{
    let start = Instant::now();
    let coord = chunk.coord();
    let (base_x, base_y, base_z) = coord.world_origin();
    let mut solid = MeshBuild::default();
    let mut foliage = MeshBuild::default();
    // Rough surface guess: a top face and one side per column.
    if !chunk.is_empty() {
        solid.reserve_quads(CHUNK_WIDTH * CHUNK_DEPTH * 2);
    }

    for (section, slice) in chunk.slices().iter().enumerate() {
        if slice.is_empty() {
            continue;
        }
        let section_y = (section * SLICE_SIZE) as i32;
        for z in 0..CHUNK_DEPTH as i32 {
            for ly in 0..SLICE_SIZE as i32 {
                for x in 0..CHUNK_WIDTH as i32 {
                    let id = slice.get(x, ly, z);
                    if !id.is_solid() {
                        continue;
                    }
                    let cell = SectionCell {
                        x: x as u8,
                        y: ly as u8,
                        z: z as u8,
                        section: section as u8,
                    };
                    if id.is_foliage() {
                        emit_cross(&mut foliage, cell);
                        continue;
                    }
                    let (wx, wy, wz) = (base_x + x, base_y + section_y + ly, base_z + z);
                    for side in Face::ALL {
                        let (dx, dy, dz) = side.delta();
                        let n: VoxelId = neighbors.resolve(wx + dx, wy + dy, wz + dz);
                        if !n.occludes() {
                            emit_cube_face(&mut solid, cell, side);
                        }
                    }
                }
            }
        }
    }

    log::info!(
        target: "perf",
        "ms={} mesher_chunk cx={} cz={} solid_quads={} foliage_quads={}",
        elapsed_ms(start),
        coord.cx,
        coord.cz,
        solid.quad_count(),
        foliage.quad_count()
    );

    ChunkMesh {
        coord,
        solid,
        foliage,
    }
}
