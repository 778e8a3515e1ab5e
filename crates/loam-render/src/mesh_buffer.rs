use loam_mesh_cpu::{MeshBuild, PackedVertex};

use crate::device::{DrawCall, RenderDevice};
use crate::pool::BufferPool;
use crate::{BufferHandle, RenderError};

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum MeshBufferState {
    /// Nothing uploaded and nothing pending.
    Empty,
    /// CPU lists hold data not yet on the GPU.
    Dirty,
    Uploaded,
}

/// How the last pending upload reached the GPU.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum UploadPath {
    Reallocated,
    InPlace,
}

/// CPU-side mesh lists plus the policy that syncs them to a pooled buffer.
///
/// `render` acquires a buffer the first time there is something to draw;
/// empty meshes never take one from the pool. A pending mesh that fits the
/// current allocation is written in place; anything larger reallocates and
/// the allocation grows to the new size. The CPU lists are dropped once
/// uploaded.
#[derive(Debug, Default)]
pub struct MeshBuffer {
    vertices: Vec<PackedVertex>,
    indices: Vec<u32>,
    dirty: bool,
    handle: Option<BufferHandle>,
    // (vertices, indices) the current allocation can hold
    capacity: Option<(usize, usize)>,
    element_count: u32,
    last_upload: Option<UploadPath>,
}

impl MeshBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Swaps in a freshly built mesh and marks the buffer dirty.
    pub fn replace(&mut self, build: MeshBuild) {
        self.vertices = build.vertices;
        self.indices = build.indices;
        self.dirty = true;
    }

    pub fn state(&self) -> MeshBufferState {
        if self.dirty {
            MeshBufferState::Dirty
        } else if self.capacity.is_some() {
            MeshBufferState::Uploaded
        } else {
            MeshBufferState::Empty
        }
    }

    #[inline]
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    #[inline]
    pub fn handle(&self) -> Option<BufferHandle> {
        self.handle
    }

    #[inline]
    pub fn element_count(&self) -> u32 {
        self.element_count
    }

    #[inline]
    pub fn capacity(&self) -> Option<(usize, usize)> {
        self.capacity
    }

    #[inline]
    pub fn last_upload(&self) -> Option<UploadPath> {
        self.last_upload
    }

    /// Uploads pending data if dirty, then draws. Returns the issued draw,
    /// or `None` when there is nothing to draw.
    pub fn render<P, D>(
        &mut self,
        pool: &mut P,
        device: &mut D,
        world_offset: (i32, i32, i32),
    ) -> Result<Option<DrawCall>, RenderError>
    where
        P: BufferPool + ?Sized,
        D: RenderDevice + ?Sized,
    {
        // An empty mesh with no buffer behind it never needs one.
        if self.handle.is_none() && (!self.dirty || self.indices.is_empty()) {
            if self.dirty {
                self.vertices = Vec::new();
                self.indices = Vec::new();
                self.element_count = 0;
                self.dirty = false;
            }
            return Ok(None);
        }

        let handle = match self.handle {
            Some(h) => h,
            None => {
                let h = pool.acquire()?;
                self.handle = Some(h);
                h
            }
        };

        if self.dirty {
            let (nv, ni) = (self.vertices.len(), self.indices.len());
            let fits = matches!(self.capacity, Some((cv, ci)) if nv <= cv && ni <= ci);
            if fits {
                device.upload_in_place(handle, &self.vertices, &self.indices);
                self.last_upload = Some(UploadPath::InPlace);
            } else {
                device.upload(handle, &self.vertices, &self.indices);
                self.capacity = Some((nv, ni));
                self.last_upload = Some(UploadPath::Reallocated);
            }
            self.element_count = ni as u32;
            self.vertices = Vec::new();
            self.indices = Vec::new();
            self.dirty = false;
        }

        if self.element_count == 0 {
            return Ok(None);
        }
        let call = DrawCall {
            handle,
            element_count: self.element_count,
            world_offset,
        };
        device.draw(&call);
        Ok(Some(call))
    }

    /// Returns the buffer to the pool. Safe to call more than once.
    pub fn dispose<P: BufferPool + ?Sized>(&mut self, pool: &mut P) {
        if let Some(h) = self.handle.take() {
            pool.release(h);
        }
        self.capacity = None;
        self.element_count = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{HeadlessDevice, HeadlessFactory, VertexBufferPool};

    fn build(quads: usize) -> MeshBuild {
        let mut mb = MeshBuild::default();
        for q in 0..quads {
            mb.add_quad([PackedVertex(q as u32); 4]);
        }
        mb
    }

    #[test]
    fn first_render_acquires_and_reallocates() {
        let mut pool = VertexBufferPool::with_max(HeadlessFactory::default(), 8);
        let mut dev = HeadlessDevice::new();
        let mut mb = MeshBuffer::new();
        assert_eq!(mb.state(), MeshBufferState::Empty);
        assert_eq!(mb.handle(), None);
        mb.replace(build(2));
        assert_eq!(mb.state(), MeshBufferState::Dirty);
        let call = mb.render(&mut pool, &mut dev, (32, 0, 64)).unwrap().unwrap();
        assert_eq!(call.element_count, 12);
        assert_eq!(call.world_offset, (32, 0, 64));
        assert_eq!(mb.last_upload(), Some(UploadPath::Reallocated));
        assert_eq!(mb.capacity(), Some((8, 12)));
        assert_eq!(mb.state(), MeshBufferState::Uploaded);
        assert_eq!(pool.in_use(), 1);
    }

    #[test]
    fn shrinking_mesh_updates_in_place() {
        let mut pool = VertexBufferPool::with_max(HeadlessFactory::default(), 8);
        let mut dev = HeadlessDevice::new();
        let mut mb = MeshBuffer::new();
        mb.replace(build(5));
        mb.render(&mut pool, &mut dev, (0, 0, 0)).unwrap();
        mb.replace(build(3));
        let call = mb.render(&mut pool, &mut dev, (0, 0, 0)).unwrap().unwrap();
        assert_eq!(call.element_count, 18);
        assert_eq!(mb.last_upload(), Some(UploadPath::InPlace));
        // Allocation keeps the larger size.
        assert_eq!(mb.capacity(), Some((20, 30)));
        let gpu = dev.buffer(call.handle).unwrap();
        assert_eq!((gpu.allocations, gpu.partial_updates), (1, 1));
    }

    #[test]
    fn equal_size_is_in_place_and_growth_reallocates() {
        let mut pool = VertexBufferPool::with_max(HeadlessFactory::default(), 8);
        let mut dev = HeadlessDevice::new();
        let mut mb = MeshBuffer::new();
        mb.replace(build(2));
        mb.render(&mut pool, &mut dev, (0, 0, 0)).unwrap();
        mb.replace(build(2));
        mb.render(&mut pool, &mut dev, (0, 0, 0)).unwrap();
        assert_eq!(mb.last_upload(), Some(UploadPath::InPlace));
        mb.replace(build(3));
        mb.render(&mut pool, &mut dev, (0, 0, 0)).unwrap();
        assert_eq!(mb.last_upload(), Some(UploadPath::Reallocated));
        assert_eq!(mb.capacity(), Some((12, 18)));
    }

    #[test]
    fn empty_mesh_issues_no_draw() {
        let mut pool = VertexBufferPool::with_max(HeadlessFactory::default(), 8);
        let mut dev = HeadlessDevice::new();
        let mut mb = MeshBuffer::new();
        mb.replace(MeshBuild::default());
        assert_eq!(mb.render(&mut pool, &mut dev, (0, 0, 0)).unwrap(), None);
        assert!(dev.draws().is_empty());
        assert_eq!(mb.handle(), None);
        assert_eq!(mb.state(), MeshBufferState::Empty);
        assert_eq!(pool.in_use(), 0);
    }

    #[test]
    fn empty_buffers_do_not_drain_the_pool() {
        let mut pool = VertexBufferPool::with_max(HeadlessFactory::default(), 2);
        let mut dev = HeadlessDevice::new();
        let mut empties: Vec<MeshBuffer> = (0..16).map(|_| MeshBuffer::new()).collect();
        for mb in &mut empties {
            mb.replace(MeshBuild::default());
            assert_eq!(mb.render(&mut pool, &mut dev, (0, 0, 0)), Ok(None));
            // A buffer that was never filled is skipped too.
            assert_eq!(MeshBuffer::new().render(&mut pool, &mut dev, (0, 0, 0)), Ok(None));
        }
        assert_eq!(pool.in_use(), 0);
        let mut full = MeshBuffer::new();
        full.replace(build(1));
        assert!(full.render(&mut pool, &mut dev, (0, 0, 0)).unwrap().is_some());
        assert_eq!(pool.in_use(), 1);
    }

    #[test]
    fn emptied_mesh_keeps_its_buffer_and_stops_drawing() {
        let mut pool = VertexBufferPool::with_max(HeadlessFactory::default(), 8);
        let mut dev = HeadlessDevice::new();
        let mut mb = MeshBuffer::new();
        mb.replace(build(2));
        mb.render(&mut pool, &mut dev, (0, 0, 0)).unwrap();
        mb.replace(MeshBuild::default());
        assert_eq!(mb.render(&mut pool, &mut dev, (0, 0, 0)), Ok(None));
        assert_eq!(mb.last_upload(), Some(UploadPath::InPlace));
        assert!(mb.handle().is_some());
        assert_eq!(dev.draws().len(), 1);
    }

    #[test]
    fn clean_buffer_redraws_without_upload() {
        let mut pool = VertexBufferPool::with_max(HeadlessFactory::default(), 8);
        let mut dev = HeadlessDevice::new();
        let mut mb = MeshBuffer::new();
        mb.replace(build(1));
        mb.render(&mut pool, &mut dev, (0, 0, 0)).unwrap();
        let bytes = dev.uploaded_bytes();
        mb.render(&mut pool, &mut dev, (0, 0, 0)).unwrap();
        assert_eq!(dev.uploaded_bytes(), bytes);
        assert_eq!(dev.draws().len(), 2);
    }

    #[test]
    fn dispose_is_idempotent() {
        let mut pool = VertexBufferPool::with_max(HeadlessFactory::default(), 8);
        let mut dev = HeadlessDevice::new();
        let mut mb = MeshBuffer::new();
        mb.replace(build(1));
        mb.render(&mut pool, &mut dev, (0, 0, 0)).unwrap();
        mb.dispose(&mut pool);
        mb.dispose(&mut pool);
        assert_eq!(pool.in_use(), 0);
        assert_eq!(pool.free_count(), 1);
        assert_eq!(mb.handle(), None);
    }

    #[test]
    fn exhausted_pool_keeps_mesh_pending() {
        let mut pool = VertexBufferPool::with_max(HeadlessFactory::default(), 1);
        let mut dev = HeadlessDevice::new();
        let mut a = MeshBuffer::new();
        let mut b = MeshBuffer::new();
        a.replace(build(1));
        b.replace(build(1));
        a.render(&mut pool, &mut dev, (0, 0, 0)).unwrap();
        assert_eq!(
            b.render(&mut pool, &mut dev, (0, 0, 0)),
            Err(RenderError::PoolExhausted { max: 1 })
        );
        assert!(b.is_dirty());
        a.dispose(&mut pool);
        assert!(b.render(&mut pool, &mut dev, (0, 0, 0)).unwrap().is_some());
    }
}
