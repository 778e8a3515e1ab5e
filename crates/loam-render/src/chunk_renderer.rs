use hashbrown::HashMap;
use loam_chunk::ChunkCoord;
use loam_mesh_cpu::ChunkMesh;

use crate::device::{DrawCall, RenderDevice};
use crate::mesh_buffer::MeshBuffer;
use crate::pool::BufferPool;
use crate::RenderError;

/// Solid and foliage buffers of one chunk.
#[derive(Debug, Default)]
pub struct ChunkPart {
    pub solid: MeshBuffer,
    pub foliage: MeshBuffer,
}

/// Per-chunk mesh buffers, drawn solid pass first then foliage pass.
#[derive(Debug, Default)]
pub struct ChunkRenderer {
    parts: HashMap<ChunkCoord, ChunkPart>,
}

impl ChunkRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.parts.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.parts.is_empty()
    }

    pub fn part(&self, coord: ChunkCoord) -> Option<&ChunkPart> {
        self.parts.get(&coord)
    }

    /// Queues a new mesh for its chunk; uploaded on the next frame.
    pub fn update(&mut self, mesh: ChunkMesh) {
        let part = self.parts.entry(mesh.coord).or_default();
        part.solid.replace(mesh.solid);
        part.foliage.replace(mesh.foliage);
    }

    /// Drops a chunk's buffers back into the pool.
    pub fn remove<P: BufferPool + ?Sized>(&mut self, coord: ChunkCoord, pool: &mut P) {
        if let Some(mut part) = self.parts.remove(&coord) {
            part.solid.dispose(pool);
            part.foliage.dispose(pool);
        }
    }

    /// Uploads anything pending and draws every chunk. Chunks are visited in
    /// coordinate order so frames are reproducible.
    pub fn render_frame<P, D>(&mut self, pool: &mut P, device: &mut D) -> Result<Vec<DrawCall>, RenderError>
    where
        P: BufferPool + ?Sized,
        D: RenderDevice + ?Sized,
    {
        let mut coords: Vec<ChunkCoord> = self.parts.keys().copied().collect();
        coords.sort();
        let mut calls = Vec::new();
        for coord in &coords {
            if let Some(part) = self.parts.get_mut(coord) {
                calls.extend(part.solid.render(pool, device, coord.world_origin())?);
            }
        }
        for coord in &coords {
            if let Some(part) = self.parts.get_mut(coord) {
                calls.extend(part.foliage.render(pool, device, coord.world_origin())?);
            }
        }
        Ok(calls)
    }

    pub fn dispose_all<P: BufferPool + ?Sized>(&mut self, pool: &mut P) {
        for (_, mut part) in self.parts.drain() {
            part.solid.dispose(pool);
            part.foliage.dispose(pool);
        }
    }
}
