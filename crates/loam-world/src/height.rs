/// Opaque height oracle: normalized surface height for a world column.
///
/// Values are expected in `[0, 1]`; population clamps anything outside.
pub trait HeightSampler: Send + Sync {
    fn height(&self, wx: i32, wz: i32) -> f32;
}

impl<F> HeightSampler for F
where
    F: Fn(i32, i32) -> f32 + Send + Sync,
{
    #[inline]
    fn height(&self, wx: i32, wz: i32) -> f32 {
        self(wx, wz)
    }
}

/// Rolling sine/cosine surface with a period of 64π voxels on each axis.
#[derive(Clone, Copy, Debug, Default)]
pub struct SurfaceHeightmap;

impl HeightSampler for SurfaceHeightmap {
    #[inline]
    fn height(&self, wx: i32, wz: i32) -> f32 {
        (((wx as f32 / 32.0).sin() + (wz as f32 / 32.0).cos() + 1.0) / 2.0).clamp(0.0, 1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn surface_heightmap_is_normalized() {
        let h = SurfaceHeightmap;
        for x in (-500..500).step_by(7) {
            for z in (-500..500).step_by(11) {
                let v = h.height(x, z);
                assert!((0.0..=1.0).contains(&v), "{v} at ({x}, {z})");
            }
        }
        // sin(0) + cos(0) + 1 = 2 -> 1.0
        assert_eq!(h.height(0, 0), 1.0);
    }

    #[test]
    fn closures_are_samplers() {
        let flat = |_: i32, _: i32| 0.5f32;
        assert_eq!(flat.height(3, 4), 0.5);
    }
}
