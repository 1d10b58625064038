//! Configuration handling for SeqFV CLI
//!
//! Supports loading configuration from seqfv.toml files with CLI argument overrides.

use anyhow::{Context, Result};
use seqfv_core::{AnnotationMap, MergePolicy, RowOrder, TrackPalette, ViewOptions};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub general: GeneralConfig,
    #[serde(default)]
    pub palette: TrackPalette,
    #[serde(default)]
    pub annotations: AnnotationsConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneralConfig {
    /// How adjacent aligned regions are folded into blocks ("pairwise" or "chain")
    #[serde(default)]
    pub merge_policy: MergePolicy,

    /// Let the widget collapse residues when zoomed out
    #[serde(default)]
    pub dynamic_display: bool,

    /// Row ordering override ("alignments_first" or "annotations_first")
    #[serde(default)]
    pub row_order: Option<RowOrder>,

    /// Pretty-print the JSON board
    #[serde(default = "default_true")]
    pub pretty: bool,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AnnotationsConfig {
    /// JSON lookup table replacing the built-in annotation types
    #[serde(default)]
    pub map_file: Option<PathBuf>,
}

fn default_true() -> bool { true }

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            merge_policy: MergePolicy::default(),
            dynamic_display: false,
            row_order: None,
            pretty: default_true(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            general: GeneralConfig::default(),
            palette: TrackPalette::default(),
            annotations: AnnotationsConfig::default(),
        }
    }
}

impl Config {
    /// Load configuration from file or use defaults
    pub fn load(config_path: Option<&Path>) -> Result<Self> {
        let config = match config_path {
            Some(path) => {
                log::info!("Loading configuration from: {}", path.display());
                Self::load_from_file(path)?
            }
            None => {
                // Try to find seqfv.toml in current directory
                let default_path = PathBuf::from("seqfv.toml");
                if default_path.exists() {
                    log::info!("Loading configuration from: seqfv.toml");
                    Self::load_from_file(&default_path)?
                } else {
                    log::info!("Using default configuration");
                    Self::default()
                }
            }
        };

        Ok(config)
    }

    /// Load configuration from a specific TOML file
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read configuration file: {}", path.display()))?;

        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse configuration file: {}", path.display()))?;

        Ok(config)
    }

    /// Save configuration to a TOML file
    pub fn save_to_file(&self, path: &Path) -> Result<()> {
        let content = toml::to_string_pretty(self).context("Failed to serialize configuration")?;

        std::fs::write(path, content)
            .with_context(|| format!("Failed to write configuration file: {}", path.display()))?;

        Ok(())
    }

    /// Generate example configuration file content
    pub fn example_toml() -> Result<String> {
        toml::to_string_pretty(&Self::default()).context("Failed to serialize default configuration")
    }

    /// Options for one view, with the annotation table resolved
    pub fn view_options(&self) -> Result<ViewOptions> {
        let annotation_map = match &self.annotations.map_file {
            Some(path) => AnnotationMap::load_from_file(path)
                .with_context(|| format!("Failed to load annotation map: {}", path.display()))?,
            None => AnnotationMap::default(),
        };

        Ok(ViewOptions {
            palette: self.palette.clone(),
            annotation_map,
            merge_policy: self.general.merge_policy,
            dynamic_display: self.general.dynamic_display,
            filter_by_target_contains: None,
            sequence_track_title: None,
            row_order: self.general.row_order,
        })
    }
}
