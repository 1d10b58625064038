//! View orchestration: fetch alignments, build tracks, fetch annotations,
//! classify them, and hand the ordered rows to a rendering sink.
//!
//! Each step starts only after the previous one completed. A fetch failure
//! is logged and aborts the whole view; nothing partial reaches the sink.

use crate::alignment::*;
use crate::annotation::AnnotationClassifier;
use crate::annotation_map::AnnotationMap;
use crate::error::{FvError, Result};
use crate::service::AlignmentService;
use crate::signal::TargetsSignal;
use crate::track::*;
use crate::types::*;
use log::{debug, error, info};
use serde::{Deserialize, Serialize};
use std::sync::{Mutex, PoisonError};

/// Board length used for whole-chromosome views
pub const CHROMOSOME_BOARD_LENGTH: SeqPos = 300_000_000;

/// Receives the finished board; pixel rendering happens behind it
pub trait RenderSink {
    fn render(&mut self, board: BoardConfig, rows: Vec<TrackRow>);
}

/// Sink that keeps the last board it was given
#[derive(Debug, Default)]
pub struct CollectingSink {
    pub board: Option<BoardConfig>,
    pub rows: Vec<TrackRow>,
}

impl RenderSink for CollectingSink {
    fn render(&mut self, board: BoardConfig, rows: Vec<TrackRow>) {
        self.board = Some(board);
        self.rows = rows;
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RowOrder {
    AlignmentsFirst,
    AnnotationsFirst,
}

#[derive(Debug, Clone)]
pub struct ViewOptions {
    pub palette: TrackPalette,
    pub annotation_map: AnnotationMap,
    pub merge_policy: MergePolicy,
    pub dynamic_display: bool,
    pub filter_by_target_contains: Option<String>,
    pub sequence_track_title: Option<String>,
    /// Overrides the per-view default ordering
    pub row_order: Option<RowOrder>,
}

impl Default for ViewOptions {
    fn default() -> Self {
        Self {
            palette: TrackPalette::default(),
            annotation_map: AnnotationMap::default(),
            merge_policy: MergePolicy::default(),
            dynamic_display: false,
            filter_by_target_contains: None,
            sequence_track_title: None,
            row_order: None,
        }
    }
}

/// A finished board
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FvView {
    pub board_config: BoardConfig,
    pub row_config: Vec<TrackRow>,
}

impl FvView {
    pub fn deliver<R: RenderSink + ?Sized>(self, sink: &mut R) {
        sink.render(self.board_config, self.row_config);
    }
}

pub struct ViewOrchestrator<S: AlignmentService> {
    service: S,
    options: ViewOptions,
    targets: Mutex<TargetsSignal>,
}

impl<S: AlignmentService> ViewOrchestrator<S> {
    pub fn new(service: S, options: ViewOptions) -> Self {
        Self {
            service,
            options,
            targets: Mutex::new(TargetsSignal::new()),
        }
    }

    /// Signal for the current or next build, resolved with its target ids
    /// once alignment tracks are built
    pub fn targets(&self) -> TargetsSignal {
        self.targets.lock().unwrap_or_else(PoisonError::into_inner).clone()
    }

    /// Signal owned by the build that is starting. A settled signal belongs
    /// to an earlier build and is replaced; a pending one is kept so callers
    /// that subscribed before the build still get notified.
    fn start_build(&self) -> TargetsSignal {
        let mut current = self.targets.lock().unwrap_or_else(PoisonError::into_inner);
        if current.is_settled() {
            *current = TargetsSignal::new();
        }
        current.clone()
    }

    /// UniProt accession aligned to PDB entities; alignments shown below annotations
    pub async fn build_uniprot_fv(&self, accession: &str) -> Result<FvView> {
        info!("Building UniProt view for {}", accession);
        let signal = self.start_build();
        let tracks = self
            .collect_sequences(&signal, AlignmentRequest::new(accession, SequenceReference::Uniprot, SequenceReference::PdbEntity))
            .await?;
        let annotations = self
            .collect_annotations(AnnotationRequest::new(
                accession,
                SequenceReference::Uniprot,
                vec![Source::Uniprot],
            ))
            .await?;
        Ok(self.assemble(tracks, annotations, RowOrder::AnnotationsFirst))
    }

    /// PDB entity aligned to UniProt
    pub async fn build_entity_fv(&self, entity_id: &str) -> Result<FvView> {
        info!("Building entity view for {}", entity_id);
        let signal = self.start_build();
        let tracks = self
            .collect_sequences(&signal, AlignmentRequest::new(entity_id, SequenceReference::PdbEntity, SequenceReference::Uniprot))
            .await?;
        let annotations = self
            .collect_annotations(AnnotationRequest::new(
                entity_id,
                SequenceReference::PdbEntity,
                vec![Source::PdbEntity, Source::Uniprot],
            ))
            .await?;
        Ok(self.assemble(tracks, annotations, RowOrder::AlignmentsFirst))
    }

    /// PDB instance: resolve its entity, show entity alignments, annotate the instance
    pub async fn build_instance_fv(&self, instance_id: &str) -> Result<FvView> {
        info!("Building instance view for {}", instance_id);
        let request = AlignmentRequest::new(instance_id, SequenceReference::PdbInstance, SequenceReference::PdbEntity);
        let signal = self.start_build();
        let mapping = self.fetch_alignment(&signal, &request).await?;
        let Some(entity) = mapping.target_alignment.first() else {
            signal.abandon();
            return Err(FvError::no_data(instance_id, "instance maps to no entity"));
        };
        debug!("Instance {} maps to entity {}", instance_id, entity.target_id);

        let tracks = self
            .collect_sequences(
                &signal,
                AlignmentRequest::new(entity.target_id.as_str(), SequenceReference::PdbEntity, SequenceReference::Uniprot),
            )
            .await?;
        let annotations = self
            .collect_annotations(AnnotationRequest::new(
                instance_id,
                SequenceReference::PdbInstance,
                vec![Source::PdbEntity, Source::PdbInstance, Source::Uniprot],
            ))
            .await?;
        Ok(self.assemble(tracks, annotations, RowOrder::AlignmentsFirst))
    }

    /// Genome sequence with the PDB entities mapped onto it as exon blocks.
    /// The sequence row carries no data; the widget requests windows on move.
    pub async fn build_chromosome_fv(&self, ncbi_id: &str) -> Result<FvView> {
        info!("Building chromosome view for {}", ncbi_id);
        let palette = &self.options.palette;
        let mut sequence_row = TrackRow::simple(
            format!("{}{}", QUERY_TRACK_PREFIX, ncbi_id),
            DisplayType::Sequence,
            ncbi_id,
            palette.track_color.clone(),
            palette.sequence_color.clone(),
            Vec::new(),
        );
        sequence_row.track_data = None;
        sequence_row.update_data_on_move = true;

        let request = AlignmentRequest::new(ncbi_id, SequenceReference::NcbiGenome, SequenceReference::PdbEntity);
        let signal = self.start_build();
        let response = self.fetch_alignment(&signal, &request).await?;
        if response.target_alignment.is_empty() {
            signal.abandon();
            return Err(FvError::no_data(ncbi_id, "no entity maps to this genome"));
        }
        signal.complete(response.target_alignment.iter().map(|t| t.target_id.clone()).collect());

        Ok(FvView {
            board_config: BoardConfig { length: CHROMOSOME_BOARD_LENGTH, include_axis: true },
            row_config: vec![sequence_row, exon_row(&response.target_alignment, palette)],
        })
    }

    async fn fetch_alignment(&self, signal: &TargetsSignal, request: &AlignmentRequest) -> Result<AlignmentResponse> {
        match self.service.request_alignment(request).await {
            Ok(response) => Ok(response),
            Err(err) => {
                error!("Alignment request for {} failed: {}", request.query_id, err);
                signal.abandon();
                Err(err)
            }
        }
    }

    async fn collect_sequences(&self, signal: &TargetsSignal, request: AlignmentRequest) -> Result<AlignmentTracks> {
        let response = self.fetch_alignment(signal, &request).await?;
        if response.query_sequence.is_empty() {
            signal.abandon();
            return Err(FvError::no_data(request.query_id.as_str(), "empty query sequence"));
        }

        let mut options = AlignmentOptions::new(request.from, request.to)
            .with_merge_policy(self.options.merge_policy)
            .with_dynamic_display(self.options.dynamic_display);
        options.filter_by_target_contains = self.options.filter_by_target_contains.clone();
        options.sequence_track_title = self.options.sequence_track_title.clone();

        let builder = AlignmentTrackBuilder::new(options, self.options.palette.clone());
        let tracks = builder.build(&request.query_id, &response);
        debug!("Built {} alignment rows for {}", tracks.alignment.len(), request.query_id);
        signal.complete(tracks.targets.clone());
        Ok(tracks)
    }

    async fn collect_annotations(&self, request: AnnotationRequest) -> Result<Vec<TrackRow>> {
        let data = match self.service.request_annotations(&request).await {
            Ok(data) => data,
            Err(err) => {
                error!("Annotation request for {} failed: {}", request.query_id, err);
                return Err(err);
            }
        };
        let classifier = AnnotationClassifier::new(self.options.annotation_map.clone(), self.options.palette.clone());
        let rows = classifier.build_rows(&data);
        debug!("Built {} annotation rows for {}", rows.len(), request.query_id);
        Ok(rows)
    }

    fn assemble(&self, tracks: AlignmentTracks, annotations: Vec<TrackRow>, default_order: RowOrder) -> FvView {
        let board_config = tracks.board_config();
        let mut rows = tracks.sequence;
        match self.options.row_order.unwrap_or(default_order) {
            RowOrder::AlignmentsFirst => {
                rows.extend(tracks.alignment);
                rows.extend(annotations);
            }
            RowOrder::AnnotationsFirst => {
                rows.extend(annotations);
                rows.extend(tracks.alignment);
            }
        }
        FvView { board_config, row_config: rows }
    }
}
