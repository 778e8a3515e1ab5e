/// Axis-aligned cube face, named by the direction it points.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum Face {
    /// -X
    Left = 0,
    /// +X
    Right = 1,
    /// -Z
    Back = 2,
    /// +Z
    Front = 3,
    /// -Y
    Bottom = 4,
    /// +Y
    Top = 5,
}

impl Face {
    pub const ALL: [Face; 6] = [
        Face::Left,
        Face::Right,
        Face::Back,
        Face::Front,
        Face::Bottom,
        Face::Top,
    ];

    /// Returns the `[0..6)` index of this face, which is also its normal id
    /// in packed vertices.
    #[inline]
    pub fn index(self) -> usize {
        self as usize
    }

    /// Converts an index back into a face; `None` outside `[0..6)`.
    #[inline]
    pub fn from_index(i: usize) -> Option<Face> {
        match i {
            0 => Some(Face::Left),
            1 => Some(Face::Right),
            2 => Some(Face::Back),
            3 => Some(Face::Front),
            4 => Some(Face::Bottom),
            5 => Some(Face::Top),
            _ => None,
        }
    }

    #[inline]
    pub fn opposite(self) -> Face {
        match self {
            Face::Left => Face::Right,
            Face::Right => Face::Left,
            Face::Back => Face::Front,
            Face::Front => Face::Back,
            Face::Bottom => Face::Top,
            Face::Top => Face::Bottom,
        }
    }

    /// Returns the integer grid delta `(dx,dy,dz)` when stepping out of this face.
    #[inline]
    pub fn delta(self) -> (i32, i32, i32) {
        match self {
            Face::Left => (-1, 0, 0),
            Face::Right => (1, 0, 0),
            Face::Back => (0, 0, -1),
            Face::Front => (0, 0, 1),
            Face::Bottom => (0, -1, 0),
            Face::Top => (0, 1, 0),
        }
    }

    /// Flat shade for a quad facing this direction.
    #[inline]
    pub fn shade(self) -> u8 {
        use crate::constants::{SHADE_BOTTOM, SHADE_SIDE_X, SHADE_SIDE_Z, SHADE_TOP};
        match self {
            Face::Top => SHADE_TOP,
            Face::Bottom => SHADE_BOTTOM,
            Face::Left | Face::Right => SHADE_SIDE_X,
            Face::Back | Face::Front => SHADE_SIDE_Z,
        }
    }

    /// Unit corners of the quad on this side of a cell, counter-clockwise as
    /// seen from outside, starting at the top-left corner.
    #[inline]
    pub(crate) fn corners(self) -> [(u8, u8, u8); 4] {
        match self {
            Face::Top => [(0, 1, 0), (0, 1, 1), (1, 1, 1), (1, 1, 0)],
            Face::Bottom => [(0, 0, 1), (0, 0, 0), (1, 0, 0), (1, 0, 1)],
            Face::Right => [(1, 1, 1), (1, 0, 1), (1, 0, 0), (1, 1, 0)],
            Face::Left => [(0, 1, 0), (0, 0, 0), (0, 0, 1), (0, 1, 1)],
            Face::Front => [(0, 1, 1), (0, 0, 1), (1, 0, 1), (1, 1, 1)],
            Face::Back => [(1, 1, 0), (1, 0, 0), (0, 0, 0), (0, 1, 0)],
        }
    }
}
