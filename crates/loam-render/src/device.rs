use loam_mesh_cpu::PackedVertex;

use crate::BufferHandle;

/// One indexed draw against an uploaded buffer. Vertices are chunk-local;
/// `world_offset` places the chunk.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct DrawCall {
    pub handle: BufferHandle,
    pub element_count: u32,
    pub world_offset: (i32, i32, i32),
}

/// Rendering backend seam.
pub trait RenderDevice {
    /// Reallocates the buffer's storage to exactly fit the data and fills it.
    fn upload(&mut self, handle: BufferHandle, vertices: &[PackedVertex], indices: &[u32]);
    /// Overwrites the front of existing storage; the data must fit.
    fn upload_in_place(&mut self, handle: BufferHandle, vertices: &[PackedVertex], indices: &[u32]);
    fn draw(&mut self, call: &DrawCall);
}
