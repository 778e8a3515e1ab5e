use hashbrown::HashMap;
use loam_mesh_cpu::PackedVertex;

use crate::device::{DrawCall, RenderDevice};
use crate::pool::BufferFactory;
use crate::BufferHandle;

/// Hands out sequential handles.
#[derive(Default, Debug)]
pub struct HeadlessFactory {
    next: u32,
}

impl BufferFactory for HeadlessFactory {
    fn create(&mut self) -> BufferHandle {
        let h = BufferHandle(self.next);
        self.next += 1;
        h
    }
}

/// Storage of one recorded buffer.
#[derive(Default, Debug, Clone)]
pub struct GpuBuffer {
    pub vertices: Vec<PackedVertex>,
    pub indices: Vec<u32>,
    pub allocations: u32,
    pub partial_updates: u32,
}

/// In-memory backend: keeps buffer contents and every draw call.
#[derive(Default, Debug)]
pub struct HeadlessDevice {
    buffers: HashMap<BufferHandle, GpuBuffer>,
    draws: Vec<DrawCall>,
    uploaded_bytes: usize,
}

impl HeadlessDevice {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn buffer(&self, handle: BufferHandle) -> Option<&GpuBuffer> {
        self.buffers.get(&handle)
    }

    pub fn draws(&self) -> &[DrawCall] {
        &self.draws
    }

    /// Returns the recorded draws and starts a fresh frame.
    pub fn take_draws(&mut self) -> Vec<DrawCall> {
        std::mem::take(&mut self.draws)
    }

    /// Bytes sent through either upload path so far.
    pub fn uploaded_bytes(&self) -> usize {
        self.uploaded_bytes
    }

    fn account(&mut self, vertices: &[PackedVertex], indices: &[u32]) {
        let v: &[u8] = bytemuck::cast_slice(vertices);
        let i: &[u8] = bytemuck::cast_slice(indices);
        self.uploaded_bytes += v.len() + i.len();
    }
}

impl RenderDevice for HeadlessDevice {
    fn upload(&mut self, handle: BufferHandle, vertices: &[PackedVertex], indices: &[u32]) {
        self.account(vertices, indices);
        let buf = self.buffers.entry(handle).or_default();
        buf.vertices = vertices.to_vec();
        buf.indices = indices.to_vec();
        buf.allocations += 1;
    }

    fn upload_in_place(&mut self, handle: BufferHandle, vertices: &[PackedVertex], indices: &[u32]) {
        self.account(vertices, indices);
        let buf = self.buffers.entry(handle).or_default();
        if vertices.len() > buf.vertices.len() || indices.len() > buf.indices.len() {
            log::warn!(
                "in-place upload overflows buffer {:?} ({} > {} vertices)",
                handle,
                vertices.len(),
                buf.vertices.len()
            );
            buf.vertices.resize(buf.vertices.len().max(vertices.len()), PackedVertex::default());
            buf.indices.resize(buf.indices.len().max(indices.len()), 0);
        }
        buf.vertices[..vertices.len()].copy_from_slice(vertices);
        buf.indices[..indices.len()].copy_from_slice(indices);
        buf.partial_updates += 1;
    }

    fn draw(&mut self, call: &DrawCall) {
        log::trace!(
            "draw {:?} elements={} offset={:?}",
            call.handle,
            call.element_count,
            call.world_offset
        );
        self.draws.push(*call);
    }
}
