use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::error::TressFxError;
use crate::strand::StrandLayout;

/// Strand layout description. A non-empty `vertex_counts` wins over the
/// uniform `hair_count` x `vertices_per_strand` pair.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, JsonSchema)]
#[schemars(title = "Strands")]
#[serde(default)]
pub struct StrandOptions {
    /// Number of strands in a uniform layout.
    pub hair_count: u32,
    /// Vertices of every strand in a uniform layout.
    #[schemars(range(min = 2))]
    pub vertices_per_strand: u32,
    /// Per-strand vertex counts, in hair id order.
    pub vertex_counts: Vec<u32>,
}

impl Default for StrandOptions {
    fn default() -> Self {
        Self {
            hair_count: 0,
            vertices_per_strand: 16,
            vertex_counts: Vec::new(),
        }
    }
}

impl StrandOptions {
    /// Build the strand layout these options describe.
    ///
    /// # Errors
    ///
    /// Same as [`StrandLayout::from_vertex_counts`].
    pub fn to_layout(&self) -> Result<StrandLayout, TressFxError> {
        if self.vertex_counts.is_empty() {
            StrandLayout::uniform(
                self.hair_count as usize,
                self.vertices_per_strand as usize,
            )
        } else {
            StrandLayout::from_vertex_counts(
                self.vertex_counts.iter().map(|&c| c as usize),
            )
        }
    }
}
