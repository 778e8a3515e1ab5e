use std::collections::VecDeque;

use hashbrown::HashSet;

use crate::{BufferHandle, RenderError};

pub const DEFAULT_MAX_BUFFERS: usize = 128;

/// Source of buffers for a [`MeshBuffer`](crate::MeshBuffer).
pub trait BufferPool {
    fn acquire(&mut self) -> Result<BufferHandle, RenderError>;
    fn release(&mut self, handle: BufferHandle);
}

/// Creates backend buffer objects for a pool.
pub trait BufferFactory {
    fn create(&mut self) -> BufferHandle;
}

/// Bounded pool: a FIFO of free buffers, pre-warmed with `max / 8` entries,
/// growing on demand until `max` buffers exist.
pub struct VertexBufferPool<F: BufferFactory> {
    factory: F,
    max: usize,
    free: VecDeque<BufferHandle>,
    used: HashSet<BufferHandle>,
}

impl<F: BufferFactory> VertexBufferPool<F> {
    pub fn new(factory: F) -> Self {
        Self::with_max(factory, DEFAULT_MAX_BUFFERS)
    }

    pub fn with_max(mut factory: F, max: usize) -> Self {
        let free: VecDeque<BufferHandle> = (0..max / 8).map(|_| factory.create()).collect();
        log::debug!("buffer pool pre-warmed {} of {} buffers", free.len(), max);
        Self {
            factory,
            max,
            free,
            used: HashSet::new(),
        }
    }

    #[inline]
    pub fn max(&self) -> usize {
        self.max
    }

    #[inline]
    pub fn free_count(&self) -> usize {
        self.free.len()
    }

    #[inline]
    pub fn in_use(&self) -> usize {
        self.used.len()
    }

    /// Buffers created so far, free or in use.
    #[inline]
    pub fn total(&self) -> usize {
        self.free.len() + self.used.len()
    }
}

impl<F: BufferFactory> BufferPool for VertexBufferPool<F> {
    fn acquire(&mut self) -> Result<BufferHandle, RenderError> {
        if let Some(h) = self.free.pop_front() {
            self.used.insert(h);
            return Ok(h);
        }
        if self.total() + 1 > self.max {
            log::warn!("buffer pool exhausted at {} buffers", self.max);
            return Err(RenderError::PoolExhausted { max: self.max });
        }
        let h = self.factory.create();
        self.used.insert(h);
        Ok(h)
    }

    fn release(&mut self, handle: BufferHandle) {
        if self.used.remove(&handle) {
            self.free.push_back(handle);
        } else {
            log::warn!("release of buffer {:?} not owned by this pool", handle);
        }
    }
}
