use bytemuck::{Pod, Zeroable};

use crate::constants::{
    FACE_MASK, FACE_SHIFT, POS_MASK, SECTION_MASK, SECTION_SHIFT, SHADE_MASK, SHADE_SHIFT,
    UV_MASK, UV_SHIFT, X_SHIFT, Y_SHIFT, Z_SHIFT,
};

/// Texture corner tag carried in two bits of a packed vertex.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum UvCorner {
    TopLeft = 0,
    BottomLeft = 1,
    TopRight = 2,
    BottomRight = 3,
}

impl UvCorner {
    /// Corner order matching the quad corner order produced by the mesher.
    pub const QUAD: [UvCorner; 4] = [
        UvCorner::TopLeft,
        UvCorner::BottomLeft,
        UvCorner::BottomRight,
        UvCorner::TopRight,
    ];

    #[inline]
    pub fn from_bits(bits: u8) -> UvCorner {
        match bits & UV_MASK as u8 {
            0 => UvCorner::TopLeft,
            1 => UvCorner::BottomLeft,
            2 => UvCorner::TopRight,
            _ => UvCorner::BottomRight,
        }
    }
}

/// Unpacked form of a [`PackedVertex`]. Every field is kept to its bit width.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Hash)]
pub struct VertexFields {
    pub x: u8,
    /// Height within the section, `0..=32` for mesher output.
    pub y: u8,
    pub z: u8,
    pub normal: u8,
    pub uv: u8,
    pub shade: u8,
    /// Index of the 32-tall slice the vertex belongs to.
    pub section: u8,
}

impl VertexFields {
    /// Chunk-local Y: `section * 32 + y`.
    #[inline]
    pub fn chunk_y(&self) -> u32 {
        self.section as u32 * 32 + self.y as u32
    }
}

/// One vertex in a single 32-bit word.
///
/// Bits: x 0-5, y 6-11, z 12-17, normal 18-22, uv 23-24, shade 25-28,
/// section 29-31. The chunk's world offset is supplied per draw call.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Hash, Pod, Zeroable)]
#[repr(transparent)]
pub struct PackedVertex(pub u32);

impl PackedVertex {
    /// Packs the fields; each input is masked to its field width.
    #[inline]
    pub fn encode(f: VertexFields) -> PackedVertex {
        let word = ((f.x as u32 & POS_MASK) << X_SHIFT)
            | ((f.y as u32 & POS_MASK) << Y_SHIFT)
            | ((f.z as u32 & POS_MASK) << Z_SHIFT)
            | ((f.normal as u32 & FACE_MASK) << FACE_SHIFT)
            | ((f.uv as u32 & UV_MASK) << UV_SHIFT)
            | ((f.shade as u32 & SHADE_MASK) << SHADE_SHIFT)
            | ((f.section as u32 & SECTION_MASK) << SECTION_SHIFT);
        PackedVertex(word)
    }

    #[inline]
    pub fn decode(self) -> VertexFields {
        let w = self.0;
        VertexFields {
            x: ((w >> X_SHIFT) & POS_MASK) as u8,
            y: ((w >> Y_SHIFT) & POS_MASK) as u8,
            z: ((w >> Z_SHIFT) & POS_MASK) as u8,
            normal: ((w >> FACE_SHIFT) & FACE_MASK) as u8,
            uv: ((w >> UV_SHIFT) & UV_MASK) as u8,
            shade: ((w >> SHADE_SHIFT) & SHADE_MASK) as u8,
            section: ((w >> SECTION_SHIFT) & SECTION_MASK) as u8,
        }
    }

    #[inline]
    pub fn uv_corner(self) -> UvCorner {
        UvCorner::from_bits(self.decode().uv)
    }

    #[inline]
    pub fn raw(self) -> u32 {
        self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_layout() {
        let v = PackedVertex::encode(VertexFields {
            x: 1,
            y: 2,
            z: 3,
            normal: 5,
            uv: UvCorner::BottomRight as u8,
            shade: 15,
            section: 7,
        });
        let expected = 1 | (2 << 6) | (3 << 12) | (5 << 18) | (3 << 23) | (15 << 25) | (7 << 29);
        assert_eq!(v.raw(), expected);
        assert_eq!(v.uv_corner(), UvCorner::BottomRight);
    }

    #[test]
    fn oversized_inputs_are_masked() {
        let v = PackedVertex::encode(VertexFields {
            x: 64 + 5,
            y: 0,
            z: 0,
            normal: 32 + 1,
            uv: 4,
            shade: 16 + 2,
            section: 8,
        });
        let f = v.decode();
        assert_eq!((f.x, f.normal, f.uv, f.shade, f.section), (5, 1, 0, 2, 0));
    }

    #[test]
    fn pod_cast_is_zero_copy() {
        let verts = [PackedVertex(0xDEAD_BEEF), PackedVertex(7)];
        let words: &[u32] = bytemuck::cast_slice(&verts);
        assert_eq!(words, &[0xDEAD_BEEF, 7]);
    }
}
