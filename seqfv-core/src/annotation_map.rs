//! Lookup table describing how each annotation type is displayed
//!
//! Deployments can ship their own table as JSON; the built-in table covers
//! the common structural and UniProt feature types.

use crate::error::Result;
use crate::track::DisplayType;
use crate::types::Feature;
use rand::{rngs::StdRng, Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnnotationConfig {
    #[serde(rename = "type")]
    pub annotation_type: String,
    pub display: DisplayType,
    pub title: String,
    pub color: String,
}

impl AnnotationConfig {
    pub fn new(annotation_type: &str, display: DisplayType, title: &str, color: &str) -> Self {
        Self {
            annotation_type: annotation_type.to_string(),
            display,
            title: title.to_string(),
            color: color.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnnotationMap {
    #[serde(default)]
    pub entries: Vec<AnnotationConfig>,
    #[serde(default)]
    pub instance_order: Vec<String>,
    #[serde(default)]
    pub entity_order: Vec<String>,
    #[serde(default)]
    pub uniprot_order: Vec<String>,
    /// Alpha channel of generated colors for unknown types
    #[serde(default = "default_fallback_alpha")]
    pub fallback_alpha: f32,
}

fn default_fallback_alpha() -> f32 { 0.66 }

impl Default for AnnotationMap {
    fn default() -> Self {
        use DisplayType::*;
        let entries = vec![
            AnnotationConfig::new("UNOBSERVED_RESIDUE_XYZ", Block, "UNMODELED", "#cccccc"),
            AnnotationConfig::new("UNOBSERVED_ATOM_XYZ", Pin, "UNMODELED ATOMS", "#999999"),
            AnnotationConfig::new("SHEET", Block, "SHEET", "#ffc800"),
            AnnotationConfig::new("HELX_P", Block, "HELIX", "#ff0080"),
            AnnotationConfig::new("CIS-PEPTIDE", Pin, "CIS-PEPTIDE", "#55aa55"),
            AnnotationConfig::new("BINDING_SITE", Composite, "LIGAND INTERACTION", "#c4124b"),
            AnnotationConfig::new("MOGUL_ANGLE_OUTLIER", Pin, "ANGLE OUTLIER", "#ff7f0e"),
            AnnotationConfig::new("MOGUL_BOND_OUTLIER", Pin, "BOND OUTLIER", "#d62728"),
            AnnotationConfig::new("RAMACHANDRAN_OUTLIER", Pin, "RAMACHANDRAN OUTLIER", "#9467bd"),
            AnnotationConfig::new("CATH", Block, "CATH DOMAIN", "#66bb6a"),
            AnnotationConfig::new("SCOP", Block, "SCOP DOMAIN", "#4caf50"),
            AnnotationConfig::new("PFAM", Block, "PFAM DOMAIN", "#388e3c"),
            AnnotationConfig::new("ACTIVE_SITE", Pin, "ACTIVE SITE", "#e53935"),
            AnnotationConfig::new("MUTAGENESIS_SITE", Pin, "MUTAGENESIS", "#fb8c00"),
            AnnotationConfig::new("DISULFIDE_BOND", Bond, "DISULFIDE BOND", "#8e24aa"),
            AnnotationConfig::new("SIGNAL_PEPTIDE", Block, "SIGNAL PEPTIDE", "#3949ab"),
            AnnotationConfig::new("TRANSMEMBRANE_REGION", Block, "TRANSMEMBRANE", "#00897b"),
            AnnotationConfig::new("DOMAIN", Block, "DOMAIN", "#43a047"),
            AnnotationConfig::new("MODIFIED_RESIDUE", Composite, "MODIFIED RESIDUE", "#6d4c41"),
        ];
        let order = |types: &[&str]| types.iter().map(|t| t.to_string()).collect::<Vec<_>>();
        Self {
            entries,
            instance_order: order(&[
                "UNOBSERVED_RESIDUE_XYZ",
                "UNOBSERVED_ATOM_XYZ",
                "SHEET",
                "HELX_P",
                "CIS-PEPTIDE",
                "BINDING_SITE",
                "MOGUL_ANGLE_OUTLIER",
                "MOGUL_BOND_OUTLIER",
                "RAMACHANDRAN_OUTLIER",
            ]),
            entity_order: order(&["CATH", "SCOP", "PFAM"]),
            uniprot_order: order(&[
                "ACTIVE_SITE",
                "MUTAGENESIS_SITE",
                "DISULFIDE_BOND",
                "SIGNAL_PEPTIDE",
                "TRANSMEMBRANE_REGION",
                "DOMAIN",
                "MODIFIED_RESIDUE",
            ]),
            fallback_alpha: default_fallback_alpha(),
        }
    }
}

impl AnnotationMap {
    /// Load a lookup table from a JSON file
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json_str(&content)
    }

    pub fn from_json_str(content: &str) -> Result<Self> {
        Ok(serde_json::from_str(content)?)
    }

    pub fn get_config(&self, annotation_type: &str) -> Option<&AnnotationConfig> {
        self.entries.iter().find(|e| e.annotation_type == annotation_type)
    }

    /// Grouping key for a feature: `TYPE_PROVENANCE` when the table has an
    /// entry for that provenance-specific key, the bare type otherwise
    pub fn key_for(&self, feature: &Feature) -> String {
        if let Some(provenance) = &feature.provenance_source {
            let qualified = format!("{}_{}", feature.feature_type, provenance.to_uppercase());
            if self.get_config(&qualified).is_some() {
                return qualified;
            }
        }
        feature.feature_type.clone()
    }

    /// Priority order: instance-level, then entity-level, then UniProt types
    pub fn ordered_types(&self) -> impl Iterator<Item = &String> {
        self.instance_order
            .iter()
            .chain(self.entity_order.iter())
            .chain(self.uniprot_order.iter())
    }

    pub fn all_types(&self) -> HashSet<&str> {
        self.ordered_types().map(|t| t.as_str()).collect()
    }

    /// Color for a type missing from the table; stable for a given type name
    pub fn fallback_color(&self, annotation_type: &str) -> String {
        let mut rng = StdRng::seed_from_u64(fallback_seed(annotation_type));
        let r: u8 = rng.gen();
        let g: u8 = rng.gen();
        let b: u8 = rng.gen();
        format!("rgba({},{},{},{})", r, g, b, self.fallback_alpha)
    }
}

/// xxh64 of the type name bytes, fixed across toolchains
pub fn fallback_seed(annotation_type: &str) -> u64 {
    xxhash_rust::xxh64::xxh64(annotation_type.as_bytes(), 0)
}
