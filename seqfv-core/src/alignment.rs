//! Alignment-to-track transformation
//!
//! Turns the aligned regions of each target into three parallel element
//! lists: residues for the sequence display, aligned blocks with open/closed
//! boundaries, and single-position mismatch pins.

use crate::track::*;
use crate::types::*;
use log::debug;
use serde::{Deserialize, Serialize};

pub const QUERY_TRACK_PREFIX: &str = "mainSequenceTrack_";
pub const TARGET_TRACK_ID: &str = "targetSequenceTrack_";
pub const EXON_TRACK_TITLE: &str = "EXONS";

/// How runs of target-adjacent regions are folded into blocks
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MergePolicy {
    /// At most two adjacent regions per block; the lookahead restarts after each merged pair
    #[default]
    Pairwise,
    /// Every maximal run of adjacent regions becomes one block
    Chain,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AlignmentOptions {
    pub from: SequenceReference,
    pub to: SequenceReference,
    /// Only targets whose id contains this substring produce rows
    pub filter_by_target_contains: Option<String>,
    pub dynamic_display: bool,
    pub sequence_track_title: Option<String>,
    pub merge_policy: MergePolicy,
}

impl AlignmentOptions {
    pub fn new(from: SequenceReference, to: SequenceReference) -> Self {
        Self {
            from,
            to,
            filter_by_target_contains: None,
            dynamic_display: false,
            sequence_track_title: None,
            merge_policy: MergePolicy::default(),
        }
    }

    pub fn with_filter(mut self, filter: impl Into<String>) -> Self {
        self.filter_by_target_contains = Some(filter.into());
        self
    }

    pub fn with_merge_policy(mut self, policy: MergePolicy) -> Self {
        self.merge_policy = policy;
        self
    }

    pub fn with_dynamic_display(mut self, dynamic: bool) -> Self {
        self.dynamic_display = dynamic;
        self
    }

    pub fn with_sequence_title(mut self, title: impl Into<String>) -> Self {
        self.sequence_track_title = Some(title.into());
        self
    }
}

/// Element lists for one target
#[derive(Debug, Clone, PartialEq, Default)]
pub struct TargetTrackData {
    pub sequence: Vec<TrackElement>,
    pub blocks: Vec<TrackElement>,
    pub mismatches: Vec<TrackElement>,
}

impl TargetTrackData {
    pub fn is_empty(&self) -> bool {
        self.sequence.is_empty() && self.blocks.is_empty() && self.mismatches.is_empty()
    }
}

/// Result of one build; nothing is retained by the builder
#[derive(Debug, Clone, PartialEq, Default)]
pub struct AlignmentTracks {
    pub query_length: SeqPos,
    pub sequence: Vec<TrackRow>,
    pub alignment: Vec<TrackRow>,
    pub targets: Vec<String>,
}

impl AlignmentTracks {
    pub fn board_config(&self) -> BoardConfig {
        BoardConfig { length: self.query_length, include_axis: true }
    }
}

/// Offsets at which two equal-length residue strings differ.
/// Strings of different length are not compared.
pub fn find_mismatches(target: &str, query: &str) -> Vec<usize> {
    if target.len() != query.len() {
        return Vec::new();
    }
    target
        .bytes()
        .zip(query.bytes())
        .enumerate()
        .filter(|(_, (t, q))| t != q)
        .map(|(i, _)| i)
        .collect()
}

/// Residues `begin..=end` (1-based), clamped to the sequence
pub fn residues(sequence: &str, begin: SeqPos, end: SeqPos) -> &str {
    let len = sequence.len();
    let start = (begin.saturating_sub(1) as usize).min(len);
    let stop = (end as usize).min(len);
    if stop <= start {
        return "";
    }
    sequence.get(start..stop).unwrap_or("")
}

/// Split regions into the runs that become one block each
pub fn group_regions(regions: &[AlignedRegion], policy: MergePolicy) -> Vec<&[AlignedRegion]> {
    let mut groups = Vec::new();
    let mut i = 0;
    while i < regions.len() {
        let mut j = i + 1;
        match policy {
            MergePolicy::Pairwise => {
                if j < regions.len() && regions[i].is_target_adjacent(&regions[j]) {
                    j += 1;
                }
            }
            MergePolicy::Chain => {
                while j < regions.len() && regions[j - 1].is_target_adjacent(&regions[j]) {
                    j += 1;
                }
            }
        }
        groups.push(&regions[i..j]);
        i = j;
    }
    groups
}

pub struct AlignmentTrackBuilder {
    options: AlignmentOptions,
    palette: TrackPalette,
}

impl AlignmentTrackBuilder {
    pub fn new(options: AlignmentOptions, palette: TrackPalette) -> Self {
        Self { options, palette }
    }

    pub fn options(&self) -> &AlignmentOptions {
        &self.options
    }

    /// Whether a target survives the id filter and has a sequence to show
    pub fn accepts(&self, target: &TargetAlignment) -> bool {
        if let Some(filter) = &self.options.filter_by_target_contains {
            if !target.target_id.contains(filter.as_str()) {
                return false;
            }
        }
        target.target_sequence.is_some()
    }

    /// Sequence, block and mismatch elements for one target.
    /// Filtered targets and targets without a sequence yield empty lists.
    pub fn target_track_data(&self, target: &TargetAlignment, query_sequence: &str) -> TargetTrackData {
        let mut data = TargetTrackData::default();
        if !self.accepts(target) {
            return data;
        }
        let Some(target_sequence) = target.target_sequence.as_deref() else {
            return data;
        };
        let target_length = target_sequence.len() as SeqPos;
        let provenance = self.options.to.as_str();

        for group in group_regions(&target.aligned_regions, self.options.merge_policy) {
            let (Some(first), Some(last)) = (group.first(), group.last()) else {
                continue;
            };

            for region in group {
                if !region.is_well_formed() {
                    debug!("Malformed region {:?} for target {}; mismatches not compared", region, target.target_id);
                }
                let region_sequence = residues(target_sequence, region.target_begin, region.target_end);
                data.sequence.push(TrackElement {
                    begin: region.query_begin,
                    ori_begin: Some(region.target_begin),
                    source_id: Some(target.target_id.clone()),
                    provenance: Some(provenance.to_string()),
                    value: Some(region_sequence.into()),
                    ..Default::default()
                });

                let query_part = residues(query_sequence, region.query_begin, region.query_end);
                for offset in find_mismatches(region_sequence, query_part) {
                    let k = offset as SeqPos;
                    data.mismatches.push(TrackElement {
                        begin: region.query_begin + k,
                        ori_begin: Some(region.target_begin + k),
                        source_id: Some(target.target_id.clone()),
                        provenance: Some(provenance.to_string()),
                        element_type: Some(MISMATCH.to_string()),
                        title: Some(MISMATCH.to_string()),
                        ..Default::default()
                    });
                }
            }

            let gaps: Vec<Gap> = group
                .windows(2)
                .map(|pair| Gap { begin: pair[0].query_end, end: pair[1].query_begin })
                .collect();

            data.blocks.push(TrackElement {
                begin: first.query_begin,
                end: Some(last.query_end),
                ori_begin: Some(first.target_begin),
                ori_end: Some(last.target_end),
                source_id: Some(target.target_id.clone()),
                provenance: Some(provenance.to_string()),
                open_begin: Some(first.target_begin != 1),
                open_end: Some(last.target_end != target_length),
                gaps: if gaps.is_empty() { None } else { Some(gaps) },
                element_type: Some(ALIGNED_BLOCK.to_string()),
                title: Some(ALIGNED_REGION_TITLE.to_string()),
                ..Default::default()
            });
        }

        data
    }

    /// Composite row (block, mismatch pins, residues) for one target
    pub fn target_row(&self, target_id: &str, data: TargetTrackData) -> TrackRow {
        let block_layer = DisplayConfig {
            display_type: DisplayType::Block,
            display_color: self.palette.block_color.clone(),
            display_data: data.blocks,
            dynamic_display: false,
        };
        let mismatch_layer = DisplayConfig {
            display_type: DisplayType::Pin,
            display_color: self.palette.mismatch_color.clone(),
            display_data: data.mismatches,
            dynamic_display: false,
        };
        let sequence_layer = DisplayConfig {
            display_type: DisplayType::Sequence,
            display_color: self.palette.sequence_color.clone(),
            display_data: data.sequence,
            dynamic_display: self.options.dynamic_display,
        };
        TrackRow::composite(
            TARGET_TRACK_ID,
            format!("{} {}", self.options.to.label(), target_id),
            self.palette.track_color.clone(),
            vec![block_layer, mismatch_layer, sequence_layer],
        )
        .with_title_flag(self.palette.rcsb_pdb_flag.clone())
    }

    /// Row showing the query sequence itself
    pub fn query_row(&self, query_id: &str, query_sequence: &str) -> TrackRow {
        let title = match &self.options.sequence_track_title {
            Some(title) => title.clone(),
            None => format!("{} {}", self.options.from.label(), query_id),
        };
        let flag = if self.options.from.is_pdb() {
            &self.palette.rcsb_pdb_flag
        } else {
            &self.palette.external_flag
        };
        let mut element = TrackElement::point(1);
        element.value = Some(query_sequence.into());
        TrackRow::simple(
            format!("{}{}", QUERY_TRACK_PREFIX, query_id),
            DisplayType::Sequence,
            title,
            self.palette.track_color.clone(),
            self.palette.sequence_color.clone(),
            vec![element],
        )
        .with_title_flag(flag.clone())
    }

    /// Build the query row and one composite row per surviving target
    pub fn build(&self, query_id: &str, response: &AlignmentResponse) -> AlignmentTracks {
        let query_sequence = response.query_sequence.as_str();
        let mut alignment = Vec::new();
        let mut targets = Vec::new();

        for target in &response.target_alignment {
            if !self.accepts(target) {
                debug!("Skipping target {} for query {}", target.target_id, query_id);
                continue;
            }
            let data = self.target_track_data(target, query_sequence);
            debug!(
                "Target {}: {} blocks, {} mismatches",
                target.target_id,
                data.blocks.len(),
                data.mismatches.len()
            );
            targets.push(target.target_id.clone());
            alignment.push(self.target_row(&target.target_id, data));
        }

        AlignmentTracks {
            query_length: query_sequence.len() as SeqPos,
            sequence: vec![self.query_row(query_id, query_sequence)],
            alignment,
            targets,
        }
    }
}

/// One plain block per aligned region of every target, in a single row
pub fn exon_row(targets: &[TargetAlignment], palette: &TrackPalette) -> TrackRow {
    let blocks = targets
        .iter()
        .flat_map(|t| t.aligned_regions.iter())
        .map(|region| TrackElement::span(region.query_begin, region.query_end))
        .collect();
    let mut row = TrackRow::simple(
        TARGET_TRACK_ID,
        DisplayType::Block,
        EXON_TRACK_TITLE,
        palette.track_color.clone(),
        palette.block_color.clone(),
        blocks,
    );
    row.display_color = None;
    row
}
