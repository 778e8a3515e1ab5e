//! Minimal geometry types shared by the storage and meshing crates.
#![forbid(unsafe_code)]

use core::ops::{Add, AddAssign, Div, Mul, Sub};

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Vec3 {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl Vec3 {
    pub const ZERO: Vec3 = Vec3 {
        x: 0.0,
        y: 0.0,
        z: 0.0,
    };
    pub const ONE: Vec3 = Vec3 {
        x: 1.0,
        y: 1.0,
        z: 1.0,
    };

    #[inline]
    pub const fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    #[inline]
    pub const fn splat(v: f32) -> Self {
        Self { x: v, y: v, z: v }
    }

    /// Voxel-cell position for integer grid coordinates.
    #[inline]
    pub fn from_grid(x: i32, y: i32, z: i32) -> Self {
        Self::new(x as f32, y as f32, z as f32)
    }

    #[inline]
    pub fn min_elem(self) -> f32 {
        self.x.min(self.y).min(self.z)
    }

    #[inline]
    pub fn is_finite(self) -> bool {
        self.x.is_finite() && self.y.is_finite() && self.z.is_finite()
    }
}

impl Add for Vec3 {
    type Output = Vec3;
    #[inline]
    fn add(self, rhs: Vec3) -> Vec3 {
        Vec3::new(self.x + rhs.x, self.y + rhs.y, self.z + rhs.z)
    }
}

impl AddAssign for Vec3 {
    #[inline]
    fn add_assign(&mut self, rhs: Vec3) {
        self.x += rhs.x;
        self.y += rhs.y;
        self.z += rhs.z;
    }
}

impl Sub for Vec3 {
    type Output = Vec3;
    #[inline]
    fn sub(self, rhs: Vec3) -> Vec3 {
        Vec3::new(self.x - rhs.x, self.y - rhs.y, self.z - rhs.z)
    }
}

impl Mul<f32> for Vec3 {
    type Output = Vec3;
    #[inline]
    fn mul(self, rhs: f32) -> Vec3 {
        Vec3::new(self.x * rhs, self.y * rhs, self.z * rhs)
    }
}

impl Div<f32> for Vec3 {
    type Output = Vec3;
    #[inline]
    fn div(self, rhs: f32) -> Vec3 {
        Vec3::new(self.x / rhs, self.y / rhs, self.z / rhs)
    }
}

/// Axis-aligned box. Containment is inclusive on both ends so that a
/// point on a shared octant face belongs to the lower octant.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Aabb {
    pub min: Vec3,
    pub max: Vec3,
}

impl Aabb {
    #[inline]
    pub const fn new(min: Vec3, max: Vec3) -> Self {
        Self { min, max }
    }

    /// Box anchored at the origin with the given edge lengths.
    #[inline]
    pub const fn from_size(sx: f32, sy: f32, sz: f32) -> Self {
        Self {
            min: Vec3::ZERO,
            max: Vec3::new(sx, sy, sz),
        }
    }

    #[inline]
    pub fn center(&self) -> Vec3 {
        (self.min + self.max) / 2.0
    }

    #[inline]
    pub fn extent(&self) -> Vec3 {
        self.max - self.min
    }

    #[inline]
    pub fn contains(&self, p: Vec3) -> bool {
        p.x >= self.min.x
            && p.x <= self.max.x
            && p.y >= self.min.y
            && p.y <= self.max.y
            && p.z >= self.min.z
            && p.z <= self.max.z
    }

    /// Octant of `p` relative to the box center: bit 0 = upper X,
    /// bit 1 = upper Y, bit 2 = upper Z. Points on the center plane go low.
    #[inline]
    pub fn octant_index(&self, p: Vec3) -> usize {
        let c = self.center();
        let mut index = 0;
        if p.x > c.x {
            index |= 1;
        }
        if p.y > c.y {
            index |= 2;
        }
        if p.z > c.z {
            index |= 4;
        }
        index
    }

    /// Sub-box for an octant index as produced by [`Aabb::octant_index`].
    pub fn octant(&self, index: usize) -> Aabb {
        let c = self.center();
        let (x0, x1) = if index & 1 != 0 { (c.x, self.max.x) } else { (self.min.x, c.x) };
        let (y0, y1) = if index & 2 != 0 { (c.y, self.max.y) } else { (self.min.y, c.y) };
        let (z0, z1) = if index & 4 != 0 { (c.z, self.max.z) } else { (self.min.z, c.z) };
        Aabb::new(Vec3::new(x0, y0, z0), Vec3::new(x1, y1, z1))
    }
}
