//! Editor configuration (user-facing global settings)

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::core::error::Error;
use crate::core::types::Result;
use crate::voxel::mask::MaskLayout;
use crate::voxel::volume::Neighborhood;

/// User-facing editor configuration, persisted as JSON
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorConfig {
    /// In-cell bit layout for occupancy masks
    pub mask_layout: MaskLayout,
    /// Default connectivity for region growing
    pub region_neighborhood: Neighborhood,
    /// Default color-match tolerance for region growing
    pub region_fuzziness: f32,
    /// Default per-voxel keep probability for the grass tool
    pub grass_density: f32,
    /// Draw outlined boxes around tool previews
    pub draw_outlines: bool,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            mask_layout: MaskLayout::Linear,
            region_neighborhood: Neighborhood::Faces,
            region_fuzziness: 0.0,
            grass_density: 0.25,
            draw_outlines: true,
        }
    }
}

impl EditorConfig {
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let text = fs::read_to_string(path)?;
        serde_json::from_str(&text).map_err(|e| Error::Config(e.to_string()))
    }

    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let text =
            serde_json::to_string_pretty(self).map_err(|e| Error::Config(e.to_string()))?;
        fs::write(path, text)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_json_round_trip() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("editor.json");

        let mut config = EditorConfig::default();
        config.mask_layout = MaskLayout::Morton;
        config.grass_density = 0.5;
        config.save(&path).expect("save");

        let loaded = EditorConfig::load(&path).expect("load");
        assert_eq!(loaded.mask_layout, MaskLayout::Morton);
        assert_eq!(loaded.grass_density, 0.5);
        assert_eq!(loaded.region_neighborhood, Neighborhood::Faces);
    }

    #[test]
    fn test_load_missing_file_is_io_error() {
        let err = EditorConfig::load("/nonexistent/editor.json").unwrap_err();
        assert!(matches!(err, Error::Io(_)));
    }

    #[test]
    fn test_partial_config_uses_defaults() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("partial.json");
        std::fs::write(&path, r#"{"grass_density": 0.75}"#).expect("write");

        let loaded = EditorConfig::load(&path).expect("load");
        assert_eq!(loaded.grass_density, 0.75);
        assert_eq!(loaded.mask_layout, MaskLayout::Linear);
    }
}
