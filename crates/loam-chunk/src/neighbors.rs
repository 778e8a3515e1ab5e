use loam_blocks::VoxelId;

/// Read-only voxel lookup in world space, possibly crossing into
/// neighboring chunks.
///
/// Implementations must never fail: coordinates in chunks that are not
/// loaded resolve to a documented stand-in value chosen by the implementor.
pub trait NeighborQuery {
    fn resolve(&self, wx: i32, wy: i32, wz: i32) -> VoxelId;
}

impl<F> NeighborQuery for F
where
    F: Fn(i32, i32, i32) -> VoxelId,
{
    #[inline]
    fn resolve(&self, wx: i32, wy: i32, wz: i32) -> VoxelId {
        self(wx, wy, wz)
    }
}

