//! Collider records shared with the simulation shaders.
//!
//! [`CapsuleCollider`] and [`SphereCollider`] are uploaded as storage-buffer
//! arrays, [`ColliderCounts`] as a uniform telling the shader how many
//! entries are live. [`ColliderSet`] is the host-side container that
//! validates colliders and re-poses them every frame.

mod capsule;
mod sphere;

use std::mem::offset_of;

pub use capsule::CapsuleCollider;
use glam::Affine3A;
pub use sphere::SphereCollider;

use crate::error::TressFxError;
use crate::interop::{FieldOffset, GpuRecord};

/// Relative axis-scale spread above which a transform counts as
/// non-uniform.
const UNIFORM_SCALE_TOLERANCE: f32 = 1e-4;

/// Largest axis scale of `transform`, and whether all three axes agree.
///
/// Capsules and spheres stay round under any transform only if the radius
/// is scaled by a single factor; the largest axis keeps them conservative.
fn radius_scale(transform: &Affine3A) -> (f32, bool) {
    let m = transform.matrix3;
    let scales = [m.x_axis.length(), m.y_axis.length(), m.z_axis.length()];
    let max = scales.iter().copied().fold(0.0f32, f32::max);
    let min = scales.iter().copied().fold(f32::INFINITY, f32::min);
    (max, max - min <= UNIFORM_SCALE_TOLERANCE * max)
}

/// Live entry counts of the collider arrays.
/// Must match the WGSL `ColliderCounts` struct layout exactly.
#[repr(C)]
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, bytemuck::Pod, bytemuck::Zeroable,
)]
pub struct ColliderCounts {
    /// Number of live capsules.
    pub capsule_count: u32,
    /// Number of live spheres.
    pub sphere_count: u32,
    /// Uniform buffers are sized in 16-byte units.
    pub _pad: [u32; 2],
}

impl ColliderCounts {
    /// Counts record.
    #[must_use]
    pub const fn new(capsule_count: u32, sphere_count: u32) -> Self {
        Self {
            capsule_count,
            sphere_count,
            _pad: [0; 2],
        }
    }
}

impl GpuRecord for ColliderCounts {
    const WGSL_NAME: &'static str = "ColliderCounts";
    const KIND: u32 = 4;
    const FIELDS: &'static [FieldOffset] = &[
        FieldOffset::new(
            "capsule_count",
            offset_of!(ColliderCounts, capsule_count),
        ),
        FieldOffset::new("sphere_count", offset_of!(ColliderCounts, sphere_count)),
    ];
}

/// Ordered, validated capsules and spheres.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ColliderSet {
    capsules: Vec<CapsuleCollider>,
    spheres: Vec<SphereCollider>,
}

impl ColliderSet {
    /// Empty set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a capsule.
    ///
    /// # Errors
    ///
    /// Returns [`TressFxError::InvalidCollider`] if the capsule has a
    /// non-finite component or a negative radius.
    pub fn push_capsule(
        &mut self,
        capsule: CapsuleCollider,
    ) -> Result<(), TressFxError> {
        if !capsule.is_valid() {
            return Err(TressFxError::InvalidCollider {
                kind: "capsule",
                index: self.capsules.len(),
            });
        }
        self.capsules.push(capsule);
        Ok(())
    }

    /// Append a sphere.
    ///
    /// # Errors
    ///
    /// Returns [`TressFxError::InvalidCollider`] if the sphere has a
    /// non-finite component or a negative radius.
    pub fn push_sphere(
        &mut self,
        sphere: SphereCollider,
    ) -> Result<(), TressFxError> {
        if !sphere.is_valid() {
            return Err(TressFxError::InvalidCollider {
                kind: "sphere",
                index: self.spheres.len(),
            });
        }
        self.spheres.push(sphere);
        Ok(())
    }

    /// Remove every collider.
    pub fn clear(&mut self) {
        self.capsules.clear();
        self.spheres.clear();
    }

    /// Total number of colliders.
    #[must_use]
    pub fn len(&self) -> usize {
        self.capsules.len() + self.spheres.len()
    }

    /// Whether the set holds no colliders.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Capsules in insertion order.
    #[must_use]
    pub fn capsules(&self) -> &[CapsuleCollider] {
        &self.capsules
    }

    /// Spheres in insertion order.
    #[must_use]
    pub fn spheres(&self) -> &[SphereCollider] {
        &self.spheres
    }

    /// Counts record for the uniform buffer.
    #[must_use]
    pub fn counts(&self) -> ColliderCounts {
        ColliderCounts::new(self.capsules.len() as u32, self.spheres.len() as u32)
    }

    /// Every collider moved by `transform` (e.g. bone space to world space).
    #[must_use]
    pub fn transformed(&self, transform: &Affine3A) -> Self {
        let (_, uniform) = radius_scale(transform);
        if !uniform && !self.is_empty() {
            log::warn!(
                "collider transform has non-uniform scale, radii use the \
                 largest axis"
            );
        }
        Self {
            capsules: self
                .capsules
                .iter()
                .map(|c| c.transformed(transform))
                .collect(),
            spheres: self
                .spheres
                .iter()
                .map(|s| s.transformed(transform))
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use glam::Vec3;

    use super::*;

    #[test]
    fn counts_record_layout() {
        assert_eq!(std::mem::size_of::<ColliderCounts>(), 16);
        let counts = ColliderCounts::new(3, 5);
        let words: &[u32] = bytemuck::cast_slice(std::slice::from_ref(&counts));
        assert_eq!(words, &[3, 5, 0, 0]);
    }

    #[test]
    fn push_rejects_invalid_with_index() {
        let mut set = ColliderSet::new();
        set.push_sphere(SphereCollider::new(Vec3::ZERO, 1.0)).unwrap();
        let err = set
            .push_sphere(SphereCollider::new(Vec3::ZERO, -1.0))
            .unwrap_err();
        assert!(matches!(
            err,
            TressFxError::InvalidCollider {
                kind: "sphere",
                index: 1
            }
        ));
        assert_eq!(set.spheres().len(), 1);

        let err = set
            .push_capsule(CapsuleCollider::uniform(Vec3::ZERO, Vec3::X, -0.5))
            .unwrap_err();
        assert!(matches!(
            err,
            TressFxError::InvalidCollider {
                kind: "capsule",
                index: 0
            }
        ));
    }

    #[test]
    fn counts_follow_contents() {
        let mut set = ColliderSet::new();
        assert!(set.is_empty());
        set.push_capsule(CapsuleCollider::uniform(Vec3::ZERO, Vec3::X, 0.1))
            .unwrap();
        set.push_sphere(SphereCollider::new(Vec3::Y, 0.2)).unwrap();
        set.push_sphere(SphereCollider::new(Vec3::Z, 0.3)).unwrap();
        assert_eq!(set.len(), 3);
        assert_eq!(set.counts(), ColliderCounts::new(1, 2));
        set.clear();
        assert_eq!(set.counts(), ColliderCounts::default());
    }

    #[test]
    fn transformed_set_preserves_order() {
        let mut set = ColliderSet::new();
        set.push_sphere(SphereCollider::new(Vec3::X, 0.1)).unwrap();
        set.push_sphere(SphereCollider::new(Vec3::Y, 0.2)).unwrap();
        let moved = set.transformed(&Affine3A::from_translation(Vec3::Z));
        assert_eq!(moved.spheres()[0].center(), Vec3::new(1.0, 0.0, 1.0));
        assert_eq!(moved.spheres()[1].center(), Vec3::new(0.0, 1.0, 1.0));
        assert_eq!(moved.spheres()[1].radius, 0.2);
    }

    #[test]
    fn uniform_scale_detection() {
        assert!(radius_scale(&Affine3A::from_scale(Vec3::splat(3.0))).1);
        assert!(!radius_scale(&Affine3A::from_scale(Vec3::new(1.0, 2.0, 1.0))).1);
    }
}
