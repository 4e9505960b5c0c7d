use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Initial GPU buffer capacities, in records. Buffers grow past these on
/// demand; sizing them up front avoids reallocating during the first frames.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, JsonSchema)]
#[schemars(title = "GPU")]
#[serde(default)]
pub struct GpuOptions {
    /// Strand vertices.
    pub initial_strand_capacity: usize,
    /// Capsules, and separately spheres.
    pub initial_collider_capacity: usize,
}

impl Default for GpuOptions {
    fn default() -> Self {
        Self {
            initial_strand_capacity: 4096,
            initial_collider_capacity: 64,
        }
    }
}
