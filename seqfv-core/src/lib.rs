//! SeqFV Core Library
//!
//! Assembles feature viewer rows from sequence alignments and positional
//! annotations: query and target sequence tracks, aligned blocks with
//! open/closed boundaries, mismatch pins, and classified annotation rows.

pub mod types;
pub mod track;
pub mod error;
pub mod alignment;
pub mod annotation_map;
pub mod annotation;
pub mod service;
pub mod signal;
pub mod orchestrator;

// Re-export commonly used types and functions
pub use types::{AlignedRegion, AlignmentResponse, SequenceReference, Source, TargetAlignment};
pub use track::{BoardConfig, DisplayType, TrackElement, TrackPalette, TrackRow};
pub use error::{FvError, Result};
pub use alignment::{AlignmentOptions, AlignmentTrackBuilder, AlignmentTracks, MergePolicy};
pub use annotation::{classify, AnnotationClassifier, Shape};
pub use annotation_map::AnnotationMap;
pub use service::{AlignmentService, FixtureService};
pub use signal::TargetsSignal;
pub use orchestrator::{CollectingSink, FvView, RenderSink, RowOrder, ViewOptions, ViewOrchestrator};

/// Version information for the SeqFV core library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
