//! Shared constants for loam-mesh-cpu.

// Vertex word layout
pub(crate) const X_SHIFT: u32 = 0;
pub(crate) const Y_SHIFT: u32 = 6;
pub(crate) const Z_SHIFT: u32 = 12;
pub(crate) const FACE_SHIFT: u32 = 18;
pub(crate) const UV_SHIFT: u32 = 23;
pub(crate) const SHADE_SHIFT: u32 = 25;
pub(crate) const SECTION_SHIFT: u32 = 29;

pub(crate) const POS_MASK: u32 = 0x3F; // 6 bits
pub(crate) const FACE_MASK: u32 = 0x1F; // 5 bits
pub(crate) const UV_MASK: u32 = 0x3; // 2 bits
pub(crate) const SHADE_MASK: u32 = 0xF; // 4 bits
pub(crate) const SECTION_MASK: u32 = 0x7; // 3 bits

// Shade per outward direction of the quad
pub(crate) const SHADE_TOP: u8 = 15;
pub(crate) const SHADE_BOTTOM: u8 = 8;
pub(crate) const SHADE_SIDE_X: u8 = 12;
pub(crate) const SHADE_SIDE_Z: u8 = 10;
pub(crate) const SHADE_FOLIAGE: u8 = 15;

/// Normal id carried by cross billboard vertices; outside the six cube faces.
pub const FOLIAGE_NORMAL_ID: u8 = 6;
