use serde::{Deserialize, Serialize};

use crate::chunk::{CHUNK_DEPTH, CHUNK_WIDTH};

/// Position of a chunk on the horizontal chunk grid.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ChunkCoord {
    pub cx: i32,
    pub cz: i32,
}

impl ChunkCoord {
    #[inline]
    pub const fn new(cx: i32, cz: i32) -> Self {
        Self { cx, cz }
    }

    /// Chunk containing the world column `(wx, wz)`.
    #[inline]
    pub fn containing(wx: i32, wz: i32) -> Self {
        Self {
            cx: wx.div_euclid(CHUNK_WIDTH as i32),
            cz: wz.div_euclid(CHUNK_DEPTH as i32),
        }
    }

    /// World-space voxel coordinate of this chunk's (0, 0, 0) corner.
    #[inline]
    pub fn world_origin(self) -> (i32, i32, i32) {
        (self.cx * CHUNK_WIDTH as i32, 0, self.cz * CHUNK_DEPTH as i32)
    }

    #[inline]
    pub fn offset(self, dx: i32, dz: i32) -> Self {
        Self {
            cx: self.cx + dx,
            cz: self.cz + dz,
        }
    }

    /// The four horizontally adjacent chunks (-X, +X, -Z, +Z).
    pub fn face_neighbors(self) -> [ChunkCoord; 4] {
        [
            self.offset(-1, 0),
            self.offset(1, 0),
            self.offset(0, -1),
            self.offset(0, 1),
        ]
    }
}

impl From<(i32, i32)> for ChunkCoord {
    fn from(value: (i32, i32)) -> Self {
        Self::new(value.0, value.1)
    }
}

impl From<ChunkCoord> for (i32, i32) {
    fn from(value: ChunkCoord) -> Self {
        (value.cx, value.cz)
    }
}

impl std::fmt::Display for ChunkCoord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.cx, self.cz)
    }
}
