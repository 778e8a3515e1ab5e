use loam_blocks::VoxelId;
use loam_geom::{Aabb, Vec3};
use thiserror::Error;

/// Depth cap for boxes up to 128 voxels on a side. Larger boxes get a
/// deeper cap from [`depth_limit_for`] so every integer lattice point still
/// ends up in its own cell.
pub const MAX_DEPTH: u8 = 8;

// Past this an f32 box can no longer be halved meaningfully.
const DEPTH_CEILING: u8 = 24;

/// Root box used by [`SparseVoxelIndex::new`].
pub const DEFAULT_BOUNDS: Aabb = Aabb::from_size(32.0, 64.0, 32.0);

const ROOT: u32 = 0;

#[derive(Debug, Error, Clone, Copy, PartialEq)]
pub enum OctreeError {
    #[error("position ({x}, {y}, {z}) lies outside the index bounds")]
    OutOfBounds { x: f32, y: f32, z: f32 },
}

#[derive(Clone, Copy, Debug, PartialEq)]
enum NodeKind {
    /// The value covers the node's whole box.
    Leaf(VoxelId),
    /// Children live at `first_child .. first_child + 8`, ordered by octant index.
    Internal { first_child: u32 },
}

#[derive(Clone, Copy, Debug)]
struct Node {
    bounds: Aabb,
    depth: u8,
    kind: NodeKind,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct OctreeStats {
    pub nodes: usize,
    pub leaves: usize,
    pub occupied_leaves: usize,
    pub max_depth: u8,
}

/// Octree over voxel ids with lazy subdivision.
///
/// A leaf that has only ever held `Empty` accepts the first non-empty write
/// for its whole box. Writing a different value into an occupied leaf splits
/// it into eight octants that inherit the old value, and the write continues
/// into the matching octant. At the depth limit the leaf is overwritten. After
/// each write, parents whose eight children became equal leaves fold back.
#[derive(Clone, Debug)]
pub struct SparseVoxelIndex {
    nodes: Vec<Node>,
    free_blocks: Vec<u32>,
    depth_limit: u8,
}

/// Depth at which cells of `bounds` are narrower than one voxel on every
/// axis, never below [`MAX_DEPTH`].
pub fn depth_limit_for(bounds: Aabb) -> u8 {
    let e = bounds.extent();
    let longest = e.x.max(e.y).max(e.z);
    if !longest.is_finite() || longest <= 1.0 {
        return MAX_DEPTH;
    }
    let needed = (longest.log2().ceil() as u32 + 1).min(DEPTH_CEILING as u32) as u8;
    needed.max(MAX_DEPTH)
}

impl Default for SparseVoxelIndex {
    fn default() -> Self {
        Self::new()
    }
}

impl SparseVoxelIndex {
    pub fn new() -> Self {
        Self::with_bounds(DEFAULT_BOUNDS)
    }

    pub fn with_bounds(bounds: Aabb) -> Self {
        Self {
            nodes: vec![Node {
                bounds,
                depth: 0,
                kind: NodeKind::Leaf(VoxelId::Empty),
            }],
            free_blocks: Vec::new(),
            depth_limit: depth_limit_for(bounds),
        }
    }

    /// Depth at which writes overwrite instead of splitting.
    #[inline]
    pub fn depth_limit(&self) -> u8 {
        self.depth_limit
    }

    #[inline]
    pub fn bounds(&self) -> Aabb {
        self.nodes[ROOT as usize].bounds
    }

    /// Stores `value` at `position`. Positions outside the root box are
    /// rejected and leave the index untouched.
    pub fn insert(&mut self, position: Vec3, value: VoxelId) -> Result<(), OctreeError> {
        if !position.is_finite() || !self.bounds().contains(position) {
            return Err(OctreeError::OutOfBounds {
                x: position.x,
                y: position.y,
                z: position.z,
            });
        }
        let mut path: Vec<u32> = Vec::with_capacity(self.depth_limit as usize + 1);
        let mut id = ROOT;
        loop {
            let node = self.nodes[id as usize];
            match node.kind {
                NodeKind::Internal { first_child } => {
                    path.push(id);
                    id = first_child + node.bounds.octant_index(position) as u32;
                }
                NodeKind::Leaf(current) if current == value => return Ok(()),
                NodeKind::Leaf(current) if current.is_empty() || node.depth >= self.depth_limit => {
                    if !current.is_empty() {
                        log::debug!(
                            "octree cell at depth {} overwrites {} with {} at ({}, {}, {})",
                            node.depth,
                            current,
                            value,
                            position.x,
                            position.y,
                            position.z
                        );
                    }
                    self.nodes[id as usize].kind = NodeKind::Leaf(value);
                    break;
                }
                NodeKind::Leaf(current) => {
                    let first_child = self.subdivide(id, current);
                    path.push(id);
                    id = first_child + node.bounds.octant_index(position) as u32;
                }
            }
        }
        for parent in path.into_iter().rev() {
            if !self.try_collapse(parent) {
                break;
            }
        }
        Ok(())
    }

    /// Integer-cell convenience for [`SparseVoxelIndex::insert`].
    #[inline]
    pub fn insert_voxel(&mut self, x: i32, y: i32, z: i32, value: VoxelId) -> Result<(), OctreeError> {
        self.insert(Vec3::from_grid(x, y, z), value)
    }

    /// Value stored for `position`; `Empty` outside the root box or in
    /// regions nothing was written to.
    pub fn get(&self, position: Vec3) -> VoxelId {
        if !position.is_finite() || !self.bounds().contains(position) {
            return VoxelId::Empty;
        }
        let mut id = ROOT;
        loop {
            let node = &self.nodes[id as usize];
            match node.kind {
                NodeKind::Leaf(value) => return value,
                NodeKind::Internal { first_child } => {
                    id = first_child + node.bounds.octant_index(position) as u32;
                }
            }
        }
    }

    #[inline]
    pub fn get_voxel(&self, x: i32, y: i32, z: i32) -> VoxelId {
        self.get(Vec3::from_grid(x, y, z))
    }

    /// Drops every node but the root, which becomes an empty leaf again.
    pub fn clear(&mut self) {
        self.nodes.truncate(1);
        self.nodes[ROOT as usize].kind = NodeKind::Leaf(VoxelId::Empty);
        self.free_blocks.clear();
    }

    pub fn stats(&self) -> OctreeStats {
        let mut stats = OctreeStats::default();
        let mut stack = vec![ROOT];
        while let Some(id) = stack.pop() {
            let node = &self.nodes[id as usize];
            stats.nodes += 1;
            stats.max_depth = stats.max_depth.max(node.depth);
            match node.kind {
                NodeKind::Leaf(value) => {
                    stats.leaves += 1;
                    if !value.is_empty() {
                        stats.occupied_leaves += 1;
                    }
                }
                NodeKind::Internal { first_child } => stack.extend(first_child..first_child + 8),
            }
        }
        stats
    }

    #[inline]
    pub fn node_count(&self) -> usize {
        self.nodes.len() - self.free_blocks.len() * 8
    }

    pub fn leaf_count(&self) -> usize {
        self.stats().leaves
    }

    pub fn depth(&self) -> u8 {
        self.stats().max_depth
    }

    /// Turns leaf `id` into an internal node whose eight children carry `inherit`.
    fn subdivide(&mut self, id: u32, inherit: VoxelId) -> u32 {
        let parent = self.nodes[id as usize];
        let first_child = self.alloc_block();
        for i in 0..8u32 {
            self.nodes[(first_child + i) as usize] = Node {
                bounds: parent.bounds.octant(i as usize),
                depth: parent.depth + 1,
                kind: NodeKind::Leaf(inherit),
            };
        }
        self.nodes[id as usize].kind = NodeKind::Internal { first_child };
        first_child
    }

    fn alloc_block(&mut self) -> u32 {
        if let Some(first) = self.free_blocks.pop() {
            return first;
        }
        let first = self.nodes.len() as u32;
        let filler = self.nodes[ROOT as usize];
        self.nodes.resize(self.nodes.len() + 8, filler);
        first
    }

    /// Folds an internal node back into a leaf when all children are equal leaves.
    fn try_collapse(&mut self, id: u32) -> bool {
        let NodeKind::Internal { first_child } = self.nodes[id as usize].kind else {
            return false;
        };
        let first = first_child as usize;
        let NodeKind::Leaf(value) = self.nodes[first].kind else {
            return false;
        };
        let uniform = self.nodes[first..first + 8]
            .iter()
            .all(|n| n.kind == NodeKind::Leaf(value));
        if !uniform {
            return false;
        }
        self.nodes[id as usize].kind = NodeKind::Leaf(value);
        self.free_blocks.push(first_child);
        true
    }
}
