use serde::{Deserialize, Serialize};

/// Ids below this value never produce geometry and never occlude.
pub const SOLID_THRESHOLD: u8 = 2;

/// Contents of a single voxel cell.
///
/// The numeric order is part of the contract: everything below
/// [`SOLID_THRESHOLD`] is treated as open space by the mesher.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[repr(u8)]
pub enum VoxelId {
    #[default]
    Empty = 0,
    /// Sentinel returned for coordinates outside a volume.
    OutOfBounds = 1,
    Dirt = 2,
    Stone = 3,
    /// Foliage: rendered as a cross billboard, never occludes.
    Grass = 4,
}

impl VoxelId {
    pub const ALL: [VoxelId; 5] = [
        VoxelId::Empty,
        VoxelId::OutOfBounds,
        VoxelId::Dirt,
        VoxelId::Stone,
        VoxelId::Grass,
    ];

    #[inline]
    pub const fn raw(self) -> u8 {
        self as u8
    }

    /// Unknown raw values decode as `Empty`.
    #[inline]
    pub const fn from_raw(raw: u8) -> VoxelId {
        match raw {
            1 => VoxelId::OutOfBounds,
            2 => VoxelId::Dirt,
            3 => VoxelId::Stone,
            4 => VoxelId::Grass,
            _ => VoxelId::Empty,
        }
    }

    #[inline]
    pub const fn is_empty(self) -> bool {
        matches!(self, VoxelId::Empty)
    }

    /// Whether the mesher emits geometry for this voxel at all.
    #[inline]
    pub const fn is_solid(self) -> bool {
        self.raw() >= SOLID_THRESHOLD
    }

    #[inline]
    pub const fn is_foliage(self) -> bool {
        matches!(self, VoxelId::Grass)
    }

    /// Whether a neighbor of this kind hides the face it touches.
    /// Foliage is solid but see-through for culling.
    #[inline]
    pub const fn occludes(self) -> bool {
        self.is_solid() && !self.is_foliage()
    }

    pub const fn name(self) -> &'static str {
        match self {
            VoxelId::Empty => "empty",
            VoxelId::OutOfBounds => "out_of_bounds",
            VoxelId::Dirt => "dirt",
            VoxelId::Stone => "stone",
            VoxelId::Grass => "grass",
        }
    }
}

impl From<VoxelId> for u8 {
    fn from(value: VoxelId) -> Self {
        value.raw()
    }
}

impl std::fmt::Display for VoxelId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}
