use std::mem::offset_of;

use glam::{Affine3A, Vec3};

use super::radius_scale;
use crate::interop::{FieldOffset, GpuRecord};

/// Capsule collision volume between two endpoints.
/// Must match the WGSL `CapsuleCollider` struct layout exactly.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Default, bytemuck::Pod, bytemuck::Zeroable)]
pub struct CapsuleCollider {
    /// First endpoint position (xyz), radius at that endpoint (w)
    pub point1: [f32; 4],
    /// Second endpoint position (xyz), radius at that endpoint (w)
    pub point2: [f32; 4],
}

impl CapsuleCollider {
    /// Capsule with a separate radius at each endpoint.
    #[must_use]
    pub fn new(point1: Vec3, radius1: f32, point2: Vec3, radius2: f32) -> Self {
        Self {
            point1: point1.extend(radius1).to_array(),
            point2: point2.extend(radius2).to_array(),
        }
    }

    /// Capsule with the same radius at both endpoints.
    #[must_use]
    pub fn uniform(point1: Vec3, point2: Vec3, radius: f32) -> Self {
        Self::new(point1, radius, point2, radius)
    }

    /// First endpoint position.
    #[must_use]
    pub fn point1(&self) -> Vec3 {
        Vec3::new(self.point1[0], self.point1[1], self.point1[2])
    }

    /// Second endpoint position.
    #[must_use]
    pub fn point2(&self) -> Vec3 {
        Vec3::new(self.point2[0], self.point2[1], self.point2[2])
    }

    /// Radius at the first endpoint.
    #[must_use]
    pub fn radius1(&self) -> f32 {
        self.point1[3]
    }

    /// Radius at the second endpoint.
    #[must_use]
    pub fn radius2(&self) -> f32 {
        self.point2[3]
    }

    /// Whether every component is finite and both radii are non-negative.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.point1.iter().chain(&self.point2).all(|c| c.is_finite())
            && self.radius1() >= 0.0
            && self.radius2() >= 0.0
    }

    /// Capsule moved by `transform`; radii scale with the largest axis scale.
    #[must_use]
    pub fn transformed(&self, transform: &Affine3A) -> Self {
        let (scale, _) = radius_scale(transform);
        Self::new(
            transform.transform_point3(self.point1()),
            self.radius1() * scale,
            transform.transform_point3(self.point2()),
            self.radius2() * scale,
        )
    }
}

impl GpuRecord for CapsuleCollider {
    const WGSL_NAME: &'static str = "CapsuleCollider";
    const KIND: u32 = 2;
    const FIELDS: &'static [FieldOffset] = &[
        FieldOffset::renamed(
            "point1",
            "point_a",
            offset_of!(CapsuleCollider, point1),
        ),
        FieldOffset::renamed(
            "point2",
            "point_b",
            offset_of!(CapsuleCollider, point2),
        ),
    ];
}

#[cfg(test)]
mod tests {
    use glam::Quat;

    use super::*;

    #[test]
    fn radius_lives_in_w() {
        let c = CapsuleCollider::new(Vec3::X, 0.25, Vec3::Y, 0.5);
        assert_eq!(c.point1, [1.0, 0.0, 0.0, 0.25]);
        assert_eq!(c.point2, [0.0, 1.0, 0.0, 0.5]);
        assert_eq!(c.point1(), Vec3::X);
        assert_eq!(c.radius2(), 0.5);
    }

    #[test]
    fn validity() {
        assert!(CapsuleCollider::uniform(Vec3::ZERO, Vec3::Y, 0.1).is_valid());
        assert!(CapsuleCollider::uniform(Vec3::ZERO, Vec3::Y, 0.0).is_valid());
        assert!(!CapsuleCollider::uniform(Vec3::ZERO, Vec3::Y, -0.1).is_valid());
        assert!(
            !CapsuleCollider::uniform(Vec3::new(f32::NAN, 0.0, 0.0), Vec3::Y, 1.0)
                .is_valid()
        );
    }

    #[test]
    fn transform_moves_endpoints_and_scales_radii() {
        let transform = Affine3A::from_scale_rotation_translation(
            Vec3::splat(2.0),
            Quat::IDENTITY,
            Vec3::new(0.0, 0.0, 5.0),
        );
        let c = CapsuleCollider::new(Vec3::X, 0.5, Vec3::Y, 1.0)
            .transformed(&transform);
        assert!((c.point1() - Vec3::new(2.0, 0.0, 5.0)).length() < 1e-6);
        assert!((c.point2() - Vec3::new(0.0, 2.0, 5.0)).length() < 1e-6);
        assert!((c.radius1() - 1.0).abs() < 1e-6);
        assert!((c.radius2() - 2.0).abs() < 1e-6);
    }
}
