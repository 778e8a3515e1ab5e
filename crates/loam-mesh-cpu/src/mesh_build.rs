use crate::vertex::PackedVertex;

/// CPU-side vertex and index lists for one mesh stream.
#[derive(Default, Clone, Debug, PartialEq, Eq)]
pub struct MeshBuild {
    pub vertices: Vec<PackedVertex>,
    pub indices: Vec<u32>,
}

impl MeshBuild {
    /// Pre-reserve capacity for approximately `n_quads` quads.
    #[inline]
    pub fn reserve_quads(&mut self, n_quads: usize) {
        self.vertices.reserve(n_quads * 4);
        self.indices.reserve(n_quads * 6);
    }

    /// Appends four corners as two triangles `[b, b+1, b+2, b, b+2, b+3]`.
    #[inline]
    pub fn add_quad(&mut self, corners: [PackedVertex; 4]) {
        let base = self.vertices.len() as u32;
        self.vertices.extend_from_slice(&corners);
        self.indices
            .extend_from_slice(&[base, base + 1, base + 2, base, base + 2, base + 3]);
    }

    #[inline]
    pub fn quad_count(&self) -> usize {
        self.indices.len() / 6
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }
}
