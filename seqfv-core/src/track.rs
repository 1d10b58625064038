//! Display-ready track data handed to the feature viewer widget
//!
//! Field names serialize in camelCase, which is what the widget reads.

use crate::types::SeqPos;
use serde::{Deserialize, Serialize};

pub const ALIGNED_BLOCK: &str = "ALIGNED_BLOCK";
pub const ALIGNED_REGION_TITLE: &str = "ALIGNED REGION";
pub const MISMATCH: &str = "MISMATCH";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DisplayType {
    Sequence,
    Block,
    Pin,
    Bond,
    Composite,
    Area,
    Line,
}

/// Query-coordinate discontinuity inside a merged block
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Gap {
    pub begin: SeqPos,
    pub end: SeqPos,
}

/// One positioned datum on a track
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrackElement {
    pub begin: SeqPos,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end: Option<SeqPos>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ori_begin: Option<SeqPos>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ori_end: Option<SeqPos>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub provenance: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<ElementValue>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub g_value: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub feature_id: Option<String>,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub element_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gaps: Option<Vec<Gap>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub open_begin: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub open_end: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_empty: Option<bool>,
}

impl TrackElement {
    pub fn point(begin: SeqPos) -> Self {
        Self { begin, ..Default::default() }
    }

    pub fn span(begin: SeqPos, end: SeqPos) -> Self {
        Self { begin, end: Some(end), ..Default::default() }
    }

    /// True when the element covers a single position: no end, or end == begin
    pub fn is_point(&self) -> bool {
        match self.end {
            None => true,
            Some(end) => end == self.begin,
        }
    }
}

/// Residue string or numeric score carried by an element
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ElementValue {
    Text(String),
    Number(f64),
}

impl From<String> for ElementValue {
    fn from(s: String) -> Self {
        ElementValue::Text(s)
    }
}

impl From<&str> for ElementValue {
    fn from(s: &str) -> Self {
        ElementValue::Text(s.to_string())
    }
}

impl From<f64> for ElementValue {
    fn from(v: f64) -> Self {
        ElementValue::Number(v)
    }
}

/// A sublayer of a composite row
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DisplayConfig {
    pub display_type: DisplayType,
    pub display_color: String,
    pub display_data: Vec<TrackElement>,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub dynamic_display: bool,
}

/// One rendered lane
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrackRow {
    pub track_id: String,
    pub display_type: DisplayType,
    pub track_color: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub display_color: Option<String>,
    pub row_title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title_flag_color: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub track_data: Option<Vec<TrackElement>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub display_config: Option<Vec<DisplayConfig>>,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub update_data_on_move: bool,
}

impl TrackRow {
    /// Row with a single display kind and flat data
    pub fn simple(
        track_id: impl Into<String>,
        display_type: DisplayType,
        row_title: impl Into<String>,
        track_color: impl Into<String>,
        display_color: impl Into<String>,
        data: Vec<TrackElement>,
    ) -> Self {
        Self {
            track_id: track_id.into(),
            display_type,
            track_color: track_color.into(),
            display_color: Some(display_color.into()),
            row_title: row_title.into(),
            title_flag_color: None,
            track_data: Some(data),
            display_config: None,
            update_data_on_move: false,
        }
    }

    /// Row stacking several sublayers
    pub fn composite(
        track_id: impl Into<String>,
        row_title: impl Into<String>,
        track_color: impl Into<String>,
        layers: Vec<DisplayConfig>,
    ) -> Self {
        Self {
            track_id: track_id.into(),
            display_type: DisplayType::Composite,
            track_color: track_color.into(),
            display_color: None,
            row_title: row_title.into(),
            title_flag_color: None,
            track_data: None,
            display_config: Some(layers),
            update_data_on_move: false,
        }
    }

    pub fn with_title_flag(mut self, color: impl Into<String>) -> Self {
        self.title_flag_color = Some(color.into());
        self
    }

    /// Find a sublayer of a composite row by display kind
    pub fn layer(&self, display_type: DisplayType) -> Option<&DisplayConfig> {
        self.display_config
            .as_ref()
            .and_then(|layers| layers.iter().find(|l| l.display_type == display_type))
    }
}

/// Board-level settings for the widget
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BoardConfig {
    pub length: SeqPos,
    pub include_axis: bool,
}

impl Default for BoardConfig {
    fn default() -> Self {
        Self { length: 0, include_axis: true }
    }
}

/// Colors used when building rows
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrackPalette {
    #[serde(default = "default_track_color")]
    pub track_color: String,
    #[serde(default = "default_sequence_color")]
    pub sequence_color: String,
    #[serde(default = "default_mismatch_color")]
    pub mismatch_color: String,
    #[serde(default = "default_block_color")]
    pub block_color: String,
    #[serde(default = "default_rcsb_pdb_flag")]
    pub rcsb_pdb_flag: String,
    #[serde(default = "default_external_flag")]
    pub external_flag: String,
}

fn default_track_color() -> String { "#F9F9F9".to_string() }
fn default_sequence_color() -> String { "#000000".to_string() }
fn default_mismatch_color() -> String { "#FF9999".to_string() }
fn default_block_color() -> String { "#9999FF".to_string() }
fn default_rcsb_pdb_flag() -> String { "#5e94c3".to_string() }
fn default_external_flag() -> String { "#fbaf5e".to_string() }

impl Default for TrackPalette {
    fn default() -> Self {
        Self {
            track_color: default_track_color(),
            sequence_color: default_sequence_color(),
            mismatch_color: default_mismatch_color(),
            block_color: default_block_color(),
            rcsb_pdb_flag: default_rcsb_pdb_flag(),
            external_flag: default_external_flag(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_point_detection() {
        assert!(TrackElement::point(4).is_point());
        assert!(TrackElement::span(4, 4).is_point());
        assert!(!TrackElement::span(4, 9).is_point());
    }

    #[test]
    fn test_element_serializes_camel_case_and_skips_absent() {
        let mut e = TrackElement::span(1, 10);
        e.ori_begin = Some(3);
        e.open_end = Some(true);
        e.element_type = Some(ALIGNED_BLOCK.to_string());
        let json = serde_json::to_value(&e).unwrap();
        assert_eq!(json["oriBegin"], 3);
        assert_eq!(json["openEnd"], true);
        assert_eq!(json["type"], "ALIGNED_BLOCK");
        assert!(json.get("gaps").is_none());
        assert!(json.get("openBegin").is_none());
    }

    #[test]
    fn test_row_layer_lookup() {
        let row = TrackRow::composite(
            "t",
            "title",
            "#F9F9F9",
            vec![DisplayConfig {
                display_type: DisplayType::Pin,
                display_color: "#FF9999".to_string(),
                display_data: vec![TrackElement::point(2)],
                dynamic_display: false,
            }],
        );
        assert!(row.layer(DisplayType::Pin).is_some());
        assert!(row.layer(DisplayType::Block).is_none());
        let json = serde_json::to_value(&row).unwrap();
        assert_eq!(json["displayType"], "composite");
        assert!(json.get("updateDataOnMove").is_none());
    }
}
