use loam_blocks::VoxelId;

/// Edge length of a slice cube.
pub const SLICE_SIZE: usize = 32;
pub const SLICE_VOLUME: usize = SLICE_SIZE * SLICE_SIZE * SLICE_SIZE;

/// One 32x32x32 slab of dense voxel storage.
///
/// Reads outside the cube yield [`VoxelId::OutOfBounds`]; writes outside it
/// are dropped.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Slice {
    voxels: Box<[VoxelId]>,
}

impl Default for Slice {
    fn default() -> Self {
        Self::new()
    }
}

impl Slice {
    pub fn new() -> Self {
        Self {
            voxels: vec![VoxelId::Empty; SLICE_VOLUME].into_boxed_slice(),
        }
    }

    /// Flat index `x + size*(y + size*z)`, or `None` when any axis is out of range.
    #[inline]
    pub fn idx(x: i32, y: i32, z: i32) -> Option<usize> {
        let n = SLICE_SIZE as i32;
        if x < 0 || y < 0 || z < 0 || x >= n || y >= n || z >= n {
            return None;
        }
        Some(x as usize + SLICE_SIZE * (y as usize + SLICE_SIZE * z as usize))
    }

    #[inline]
    pub fn get(&self, x: i32, y: i32, z: i32) -> VoxelId {
        match Self::idx(x, y, z) {
            Some(i) => self.voxels[i],
            None => VoxelId::OutOfBounds,
        }
    }

    #[inline]
    pub fn set(&mut self, x: i32, y: i32, z: i32, id: VoxelId) {
        if let Some(i) = Self::idx(x, y, z) {
            self.voxels[i] = id;
        }
    }

    #[inline]
    pub fn as_slice(&self) -> &[VoxelId] {
        &self.voxels
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.voxels.iter().all(|v| v.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_slice_is_empty() {
        let s = Slice::new();
        assert!(s.is_empty());
        assert_eq!(s.get(0, 0, 0), VoxelId::Empty);
        assert_eq!(s.get(31, 31, 31), VoxelId::Empty);
    }

    #[test]
    fn flat_index_layout() {
        assert_eq!(Slice::idx(0, 0, 0), Some(0));
        assert_eq!(Slice::idx(1, 0, 0), Some(1));
        assert_eq!(Slice::idx(0, 1, 0), Some(32));
        assert_eq!(Slice::idx(0, 0, 1), Some(32 * 32));
        assert_eq!(Slice::idx(31, 31, 31), Some(SLICE_VOLUME - 1));
    }

    #[test]
    fn out_of_range_is_sentinel_and_write_is_dropped() {
        let mut s = Slice::new();
        for (x, y, z) in [(-1, 0, 0), (0, -1, 0), (0, 0, -1), (32, 0, 0), (0, 32, 0), (0, 0, 32)] {
            assert_eq!(s.get(x, y, z), VoxelId::OutOfBounds);
            s.set(x, y, z, VoxelId::Stone);
        }
        assert!(s.is_empty());
    }
}
