//! Hair configuration with TOML file support.
//!
//! A configuration describes the strand layout, the collider set, and the
//! initial GPU buffer capacities. Every section uses `#[serde(default)]`, so
//! partial TOML files (e.g. only a `[strands]` table) work.

mod colliders;
mod gpu;
mod strands;

use std::path::Path;

pub use colliders::{CapsuleOptions, ColliderOptions, SphereOptions};
pub use gpu::GpuOptions;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
pub use strands::StrandOptions;

use crate::error::TressFxError;

/// Top-level configuration container.
#[derive(
    Debug, Clone, Serialize, Deserialize, PartialEq, Default, JsonSchema,
)]
#[serde(default)]
pub struct HairConfig {
    /// Strand counts and vertex counts.
    pub strands: StrandOptions,
    /// Capsule and sphere colliders in model space.
    pub colliders: ColliderOptions,
    /// Initial GPU buffer capacities.
    pub gpu: GpuOptions,
}

impl HairConfig {
    /// Generate JSON Schema describing the configuration file.
    #[must_use]
    pub fn json_schema() -> schemars::Schema {
        schemars::schema_for!(HairConfig)
    }

    /// Parse a configuration from TOML text. Missing fields use defaults.
    ///
    /// # Errors
    ///
    /// Returns [`TressFxError::ConfigParse`] on malformed TOML.
    pub fn from_toml(content: &str) -> Result<Self, TressFxError> {
        toml::from_str(content)
            .map_err(|e| TressFxError::ConfigParse(e.to_string()))
    }

    /// Load a configuration from a TOML file. Missing fields use defaults.
    ///
    /// # Errors
    ///
    /// Returns [`TressFxError::Io`] if the file cannot be read and
    /// [`TressFxError::ConfigParse`] on malformed TOML.
    pub fn load(path: &Path) -> Result<Self, TressFxError> {
        let content = std::fs::read_to_string(path).map_err(TressFxError::Io)?;
        let config = Self::from_toml(&content)?;
        log::debug!("loaded hair config from {}", path.display());
        Ok(config)
    }

    /// Save the configuration to a TOML file (pretty-printed).
    ///
    /// # Errors
    ///
    /// Returns [`TressFxError::ConfigParse`] if serialization fails and
    /// [`TressFxError::Io`] if the file cannot be written.
    pub fn save(&self, path: &Path) -> Result<(), TressFxError> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| TressFxError::ConfigParse(e.to_string()))?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(TressFxError::Io)?;
        }
        std::fs::write(path, content).map_err(TressFxError::Io)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::strand::StrandIndex;

    #[test]
    fn default_round_trips_through_toml() {
        let config = HairConfig::default();
        let toml_str = toml::to_string_pretty(&config).unwrap();
        let parsed = HairConfig::from_toml(&toml_str).unwrap();
        assert_eq!(config, parsed);
    }

    #[test]
    fn populated_config_round_trips_through_toml() {
        let toml_str = r"
[strands]
vertex_counts = [4, 8]

[[colliders.capsules]]
point1 = [0.0, 0.0, 0.0]
point2 = [0.0, 1.0, 0.0]
radius1 = 0.1
radius2 = 0.05

[[colliders.spheres]]
center = [0.0, 1.6, 0.0]
radius = 0.12
";
        let config = HairConfig::from_toml(toml_str).unwrap();
        let reparsed =
            HairConfig::from_toml(&toml::to_string_pretty(&config).unwrap())
                .unwrap();
        assert_eq!(config, reparsed);
    }

    #[test]
    fn partial_toml_fills_defaults() {
        let toml_str = r"
[strands]
hair_count = 3
";
        let config = HairConfig::from_toml(toml_str).unwrap();
        assert_eq!(config.strands.hair_count, 3);
        // Everything else should be default
        assert_eq!(config.strands.vertices_per_strand, 16);
        assert!(config.colliders.capsules.is_empty());
        assert_eq!(config.gpu, GpuOptions::default());

        let layout = config.strands.to_layout().unwrap();
        assert_eq!(layout.vertex_count(), 48);
        assert_eq!(layout.strand_index_of(47), Some(StrandIndex::new(15, 2, 16)));
    }

    #[test]
    fn malformed_toml_is_a_parse_error() {
        let err = HairConfig::from_toml("[strands\nhair_count = 1").unwrap_err();
        assert!(matches!(err, TressFxError::ConfigParse(_)));
    }

    #[test]
    fn schema_has_expected_properties() {
        let schema_value =
            serde_json::to_value(HairConfig::json_schema()).unwrap();
        let props = schema_value["properties"].as_object().unwrap();
        assert!(props.contains_key("strands"));
        assert!(props.contains_key("colliders"));
        assert!(props.contains_key("gpu"));
    }
}
