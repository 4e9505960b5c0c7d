use glam::Vec3;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::collider::{CapsuleCollider, ColliderSet, SphereCollider};
use crate::error::TressFxError;

/// One capsule in model space.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, JsonSchema)]
#[serde(default)]
pub struct CapsuleOptions {
    /// First endpoint.
    pub point1: [f32; 3],
    /// Second endpoint.
    pub point2: [f32; 3],
    /// Radius at `point1`.
    #[schemars(range(min = 0.0))]
    pub radius1: f32,
    /// Radius at `point2`; `radius1` when absent.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub radius2: Option<f32>,
}

impl Default for CapsuleOptions {
    fn default() -> Self {
        Self {
            point1: [0.0; 3],
            point2: [0.0, 1.0, 0.0],
            radius1: 0.1,
            radius2: None,
        }
    }
}

impl CapsuleOptions {
    /// Collider record.
    #[must_use]
    pub fn to_collider(&self) -> CapsuleCollider {
        CapsuleCollider::new(
            Vec3::from_array(self.point1),
            self.radius1,
            Vec3::from_array(self.point2),
            self.radius2.unwrap_or(self.radius1),
        )
    }
}

/// One sphere in model space.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, JsonSchema)]
#[serde(default)]
pub struct SphereOptions {
    /// Center position.
    pub center: [f32; 3],
    /// Radius.
    #[schemars(range(min = 0.0))]
    pub radius: f32,
}

impl Default for SphereOptions {
    fn default() -> Self {
        Self {
            center: [0.0; 3],
            radius: 0.1,
        }
    }
}

impl SphereOptions {
    /// Collider record.
    #[must_use]
    pub fn to_collider(&self) -> SphereCollider {
        SphereCollider::new(Vec3::from_array(self.center), self.radius)
    }
}

/// Collider lists, in upload order.
#[derive(
    Debug, Clone, Serialize, Deserialize, PartialEq, Default, JsonSchema,
)]
#[schemars(title = "Colliders")]
#[serde(default)]
pub struct ColliderOptions {
    /// Capsule colliders.
    pub capsules: Vec<CapsuleOptions>,
    /// Sphere colliders.
    pub spheres: Vec<SphereOptions>,
}

impl ColliderOptions {
    /// Validated collider set.
    ///
    /// # Errors
    ///
    /// Returns [`TressFxError::InvalidCollider`] for the first collider with
    /// a non-finite component or a negative radius.
    pub fn to_collider_set(&self) -> Result<ColliderSet, TressFxError> {
        let mut set = ColliderSet::new();
        for capsule in &self.capsules {
            set.push_capsule(capsule.to_collider())?;
        }
        for sphere in &self.spheres {
            set.push_sphere(sphere.to_collider())?;
        }
        Ok(set)
    }
}
