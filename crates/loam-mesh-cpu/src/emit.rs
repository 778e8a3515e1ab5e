use crate::constants::{FOLIAGE_NORMAL_ID, SHADE_FOLIAGE};
use crate::face::Face;
use crate::mesh_build::MeshBuild;
use crate::vertex::{PackedVertex, UvCorner, VertexFields};

// Diagonal planes of a cross billboard, corners in quad order.
const CROSS_QUADS: [[(u8, u8, u8); 4]; 2] = [
    [(0, 1, 0), (0, 0, 0), (1, 0, 1), (1, 1, 1)],
    [(1, 1, 0), (1, 0, 0), (0, 0, 1), (0, 1, 1)],
];

/// Cell position inside one section: `x`/`z` in `[0,32)`, `y` within the slice.
#[derive(Copy, Clone, Debug)]
pub(crate) struct SectionCell {
    pub x: u8,
    pub y: u8,
    pub z: u8,
    pub section: u8,
}

#[inline]
fn quad(cell: SectionCell, corners: [(u8, u8, u8); 4], normal: u8, shade: u8) -> [PackedVertex; 4] {
    let mut out = [PackedVertex::default(); 4];
    for (i, (dx, dy, dz)) in corners.into_iter().enumerate() {
        out[i] = PackedVertex::encode(VertexFields {
            x: cell.x + dx,
            y: cell.y + dy,
            z: cell.z + dz,
            normal,
            uv: UvCorner::QUAD[i] as u8,
            shade,
            section: cell.section,
        });
    }
    out
}

/// Emits the quad on `side` of the cell, tagged with the face of the open
/// neighbor that looks back at it.
#[inline]
pub(crate) fn emit_cube_face(out: &mut MeshBuild, cell: SectionCell, side: Face) {
    let tag = side.opposite();
    out.add_quad(quad(cell, side.corners(), tag.index() as u8, side.shade()));
}

/// Emits the two diagonal quads of a foliage billboard.
#[inline]
pub(crate) fn emit_cross(out: &mut MeshBuild, cell: SectionCell) {
    for corners in CROSS_QUADS {
        out.add_quad(quad(cell, corners, FOLIAGE_NORMAL_ID, SHADE_FOLIAGE));
    }
}
