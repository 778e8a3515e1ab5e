//! GPU hand-off: buffer pooling, the dirty/upload policy for chunk meshes
//! and a headless backend that records what a real device would receive.
#![forbid(unsafe_code)]

pub mod chunk_renderer;
pub mod device;
pub mod headless;
pub mod mesh_buffer;
pub mod pool;

use thiserror::Error;

pub use chunk_renderer::ChunkRenderer;
pub use device::{DrawCall, RenderDevice};
pub use headless::{GpuBuffer, HeadlessDevice, HeadlessFactory};
pub use mesh_buffer::{MeshBuffer, MeshBufferState, UploadPath};
pub use pool::{BufferFactory, BufferPool, DEFAULT_MAX_BUFFERS, VertexBufferPool};

/// Opaque id of a GPU-resident vertex/index buffer pair.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BufferHandle(pub u32);

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RenderError {
    #[error("buffer pool exhausted: all {max} buffers are in use")]
    PoolExhausted { max: usize },
}
