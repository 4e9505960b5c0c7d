use std::mem::offset_of;

use glam::{Affine3A, Vec3};

use super::radius_scale;
use crate::interop::{FieldOffset, GpuRecord};

/// Sphere collision volume.
/// Must match the WGSL `SphereCollider` struct layout exactly
/// (`vec3<f32>` + `f32` packs into 16 bytes).
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Default, bytemuck::Pod, bytemuck::Zeroable)]
pub struct SphereCollider {
    /// Center position
    pub center_pos: [f32; 3],
    /// Radius
    pub radius: f32,
}

impl SphereCollider {
    /// Sphere at `center`.
    #[must_use]
    pub fn new(center: Vec3, radius: f32) -> Self {
        Self {
            center_pos: center.to_array(),
            radius,
        }
    }

    /// Center position.
    #[must_use]
    pub fn center(&self) -> Vec3 {
        Vec3::from_array(self.center_pos)
    }

    /// Whether every component is finite and the radius is non-negative.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.center_pos.iter().all(|c| c.is_finite())
            && self.radius.is_finite()
            && self.radius >= 0.0
    }

    /// Sphere moved by `transform`; the radius scales with the largest axis
    /// scale.
    #[must_use]
    pub fn transformed(&self, transform: &Affine3A) -> Self {
        let (scale, _) = radius_scale(transform);
        Self::new(transform.transform_point3(self.center()), self.radius * scale)
    }
}

impl GpuRecord for SphereCollider {
    const WGSL_NAME: &'static str = "SphereCollider";
    const KIND: u32 = 3;
    const FIELDS: &'static [FieldOffset] = &[
        FieldOffset::new("center_pos", offset_of!(SphereCollider, center_pos)),
        FieldOffset::new("radius", offset_of!(SphereCollider, radius)),
    ];
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn packs_into_sixteen_bytes() {
        assert_eq!(std::mem::size_of::<SphereCollider>(), 16);
        let s = SphereCollider::new(Vec3::new(1.0, 2.0, 3.0), 4.0);
        let floats: &[f32] = bytemuck::cast_slice(std::slice::from_ref(&s));
        assert_eq!(floats, &[1.0, 2.0, 3.0, 4.0]);
    }

    #[test]
    fn validity() {
        assert!(SphereCollider::new(Vec3::ZERO, 1.0).is_valid());
        assert!(!SphereCollider::new(Vec3::ZERO, -1.0).is_valid());
        assert!(!SphereCollider::new(Vec3::ZERO, f32::INFINITY).is_valid());
        assert!(!SphereCollider::new(Vec3::new(0.0, f32::NAN, 0.0), 1.0).is_valid());
    }

    #[test]
    fn non_uniform_scale_uses_largest_axis() {
        let transform = Affine3A::from_scale(Vec3::new(1.0, 3.0, 2.0));
        let s = SphereCollider::new(Vec3::new(1.0, 1.0, 1.0), 0.5)
            .transformed(&transform);
        assert!((s.center() - Vec3::new(1.0, 3.0, 2.0)).length() < 1e-6);
        assert!((s.radius - 1.5).abs() < 1e-6);
    }
}
