use serde::{Deserialize, Serialize};
use std::fmt;

/// 1-based, inclusive sequence coordinate
pub type SeqPos = u64;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SequenceReference {
    PdbEntity,
    PdbInstance,
    Uniprot,
    NcbiGenome,
    NcbiProtein,
}

impl SequenceReference {
    pub fn as_str(&self) -> &'static str {
        match self {
            SequenceReference::PdbEntity => "PDB_ENTITY",
            SequenceReference::PdbInstance => "PDB_INSTANCE",
            SequenceReference::Uniprot => "UNIPROT",
            SequenceReference::NcbiGenome => "NCBI_GENOME",
            SequenceReference::NcbiProtein => "NCBI_PROTEIN",
        }
    }

    /// Human readable label used in row titles ("PDB ENTITY", "NCBI GENOME")
    pub fn label(&self) -> String {
        self.as_str().replacen('_', " ", 1)
    }

    /// References whose sequences come from the PDB archive itself
    pub fn is_pdb(&self) -> bool {
        matches!(self, SequenceReference::PdbEntity | SequenceReference::PdbInstance)
    }
}

impl fmt::Display for SequenceReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Source {
    PdbEntity,
    PdbInstance,
    Uniprot,
}

impl Source {
    pub fn as_str(&self) -> &'static str {
        match self {
            Source::PdbEntity => "PDB_ENTITY",
            Source::PdbInstance => "PDB_INSTANCE",
            Source::Uniprot => "UNIPROT",
        }
    }
}

/// Contiguous, gapless correspondence between a query span and a target span
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AlignedRegion {
    pub query_begin: SeqPos,
    pub query_end: SeqPos,
    pub target_begin: SeqPos,
    pub target_end: SeqPos,
}

impl AlignedRegion {
    pub fn new(query_begin: SeqPos, query_end: SeqPos, target_begin: SeqPos, target_end: SeqPos) -> Self {
        Self { query_begin, query_end, target_begin, target_end }
    }

    pub fn query_len(&self) -> SeqPos {
        self.query_end.saturating_sub(self.query_begin) + 1
    }

    pub fn target_len(&self) -> SeqPos {
        self.target_end.saturating_sub(self.target_begin) + 1
    }

    /// Both spans start at 1, are ordered, and have the same length
    pub fn is_well_formed(&self) -> bool {
        self.query_begin >= 1
            && self.target_begin >= 1
            && self.query_begin <= self.query_end
            && self.target_begin <= self.target_end
            && self.query_len() == self.target_len()
    }

    /// The next region starts on the target residue right after this one ends
    pub fn is_target_adjacent(&self, next: &AlignedRegion) -> bool {
        next.target_begin == self.target_end + 1
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TargetAlignment {
    pub target_id: String,
    #[serde(default)]
    pub target_sequence: Option<String>,
    #[serde(default)]
    pub aligned_regions: Vec<AlignedRegion>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct AlignmentResponse {
    #[serde(default)]
    pub query_sequence: String,
    #[serde(default)]
    pub target_alignment: Vec<TargetAlignment>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PositionGap {
    pub begin: SeqPos,
    pub end: SeqPos,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeaturePosition {
    pub beg_seq_id: SeqPos,
    #[serde(default)]
    pub end_seq_id: Option<SeqPos>,
    #[serde(default)]
    pub value: Option<f64>,
    #[serde(default)]
    pub gaps: Option<Vec<PositionGap>>,
    #[serde(default)]
    pub open_begin: Option<bool>,
    #[serde(default)]
    pub open_end: Option<bool>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Feature {
    #[serde(rename = "type")]
    pub feature_type: String,
    #[serde(default)]
    pub feature_id: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub provenance_source: Option<String>,
    #[serde(default)]
    pub value: Option<f64>,
    #[serde(default)]
    pub feature_positions: Vec<FeaturePosition>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnnotationFeatures {
    #[serde(default)]
    pub source: Option<Source>,
    #[serde(default)]
    pub target_id: Option<String>,
    #[serde(default)]
    pub features: Vec<Feature>,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AlignmentRequest {
    pub query_id: String,
    pub from: SequenceReference,
    pub to: SequenceReference,
}

impl AlignmentRequest {
    pub fn new(query_id: impl Into<String>, from: SequenceReference, to: SequenceReference) -> Self {
        Self { query_id: query_id.into(), from, to }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnnotationRequest {
    pub query_id: String,
    pub reference: SequenceReference,
    pub sources: Vec<Source>,
}

impl AnnotationRequest {
    pub fn new(query_id: impl Into<String>, reference: SequenceReference, sources: Vec<Source>) -> Self {
        Self { query_id: query_id.into(), reference, sources }
    }
}
