use seqfv_core::orchestrator::CHROMOSOME_BOARD_LENGTH;
use seqfv_core::types::*;
use seqfv_core::*;

fn region(qb: u64, qe: u64, tb: u64, te: u64) -> AlignedRegion {
    AlignedRegion::new(qb, qe, tb, te)
}

fn annotation_group(source: Source, feature_type: &str, positions: Vec<(u64, Option<u64>)>) -> AnnotationFeatures {
    AnnotationFeatures {
        source: Some(source),
        target_id: None,
        features: vec![Feature {
            feature_type: feature_type.to_string(),
            feature_id: Some(format!("{}_feature", feature_type)),
            description: None,
            name: None,
            provenance_source: None,
            value: None,
            feature_positions: positions
                .into_iter()
                .map(|(b, e)| FeaturePosition {
                    beg_seq_id: b,
                    end_seq_id: e,
                    value: None,
                    gaps: None,
                    open_begin: None,
                    open_end: None,
                })
                .collect(),
        }],
    }
}

fn entity_service() -> FixtureService {
    FixtureService::new()
        .with_alignment(
            AlignmentRequest::new("4HHB_1", SequenceReference::PdbEntity, SequenceReference::Uniprot),
            AlignmentResponse {
                query_sequence: "ACDEFGHIKL".to_string(),
                target_alignment: vec![TargetAlignment {
                    target_id: "P69905".to_string(),
                    target_sequence: Some("ACDEFGHIKL".to_string()),
                    aligned_regions: vec![region(1, 5, 1, 5), region(6, 10, 6, 10)],
                }],
            },
        )
        .with_annotations(
            "4HHB_1",
            SequenceReference::PdbEntity,
            vec![annotation_group(Source::PdbEntity, "CATH", vec![(1, Some(10))])],
        )
}

#[tokio::test]
async fn entity_view_end_to_end() {
    let orchestrator = ViewOrchestrator::new(entity_service(), ViewOptions::default());
    let view = orchestrator.build_entity_fv("4HHB_1").await.expect("build entity view");

    assert_eq!(view.board_config, BoardConfig { length: 10, include_axis: true });
    assert_eq!(view.row_config.len(), 3);

    let query = &view.row_config[0];
    assert_eq!(query.display_type, DisplayType::Sequence);
    assert_eq!(query.track_id, "mainSequenceTrack_4HHB_1");

    let target = &view.row_config[1];
    assert_eq!(target.display_type, DisplayType::Composite);
    let blocks = &target.layer(DisplayType::Block).unwrap().display_data;
    assert_eq!(blocks.len(), 1);
    assert_eq!((blocks[0].begin, blocks[0].end), (1, Some(10)));
    assert_eq!(target.layer(DisplayType::Sequence).unwrap().display_data.len(), 2);
    assert!(target.layer(DisplayType::Pin).unwrap().display_data.is_empty());

    assert_eq!(view.row_config[2].track_id, "annotationTrack_CATH");

    let mut sink = CollectingSink::default();
    view.deliver(&mut sink);
    assert_eq!(sink.board.map(|b| b.length), Some(10));
    assert_eq!(sink.rows.len(), 3);
}

#[tokio::test]
async fn targets_signal_resolves_after_build() {
    let orchestrator = ViewOrchestrator::new(entity_service(), ViewOptions::default());
    let signal = orchestrator.targets();
    assert!(!signal.is_complete());
    orchestrator.build_entity_fv("4HHB_1").await.unwrap();
    let targets = signal.wait().await.expect("targets published");
    assert_eq!(*targets, vec!["P69905".to_string()]);
}

#[tokio::test]
async fn each_build_publishes_its_own_targets() {
    let service = entity_service()
        .with_alignment(
            AlignmentRequest::new("1ABC_1", SequenceReference::PdbEntity, SequenceReference::Uniprot),
            AlignmentResponse {
                query_sequence: "MKVL".to_string(),
                target_alignment: vec![TargetAlignment {
                    target_id: "Q99999".to_string(),
                    target_sequence: Some("MKVL".to_string()),
                    aligned_regions: vec![region(1, 4, 1, 4)],
                }],
            },
        )
        .with_annotations("1ABC_1", SequenceReference::PdbEntity, Vec::new());
    let orchestrator = ViewOrchestrator::new(service, ViewOptions::default());

    orchestrator.build_entity_fv("4HHB_1").await.unwrap();
    let first = orchestrator.targets();

    let view = orchestrator.build_entity_fv("1ABC_1").await.unwrap();
    assert_eq!(view.row_config[1].row_title, "UNIPROT Q99999");
    let second = orchestrator.targets().wait().await.expect("second targets published");
    assert_eq!(*second, vec!["Q99999".to_string()]);

    // a signal taken after the first build keeps that build's result
    assert_eq!(*first.wait().await.unwrap(), vec!["P69905".to_string()]);
}

#[tokio::test]
async fn failed_rebuild_does_not_report_stale_targets() {
    let orchestrator = ViewOrchestrator::new(entity_service(), ViewOptions::default());
    orchestrator.build_entity_fv("4HHB_1").await.unwrap();
    assert!(orchestrator.build_entity_fv("2XYZ_1").await.is_err());
    assert!(orchestrator.targets().wait().await.is_none());
}

#[tokio::test]
async fn uniprot_view_puts_alignments_last() {
    let service = FixtureService::new()
        .with_alignment(
            AlignmentRequest::new("P69905", SequenceReference::Uniprot, SequenceReference::PdbEntity),
            AlignmentResponse {
                query_sequence: "MVLSPADKTN".to_string(),
                target_alignment: vec![TargetAlignment {
                    target_id: "4HHB_1".to_string(),
                    target_sequence: Some("VLSPADKTN".to_string()),
                    aligned_regions: vec![region(2, 10, 1, 9)],
                }],
            },
        )
        .with_annotations(
            "P69905",
            SequenceReference::Uniprot,
            vec![annotation_group(Source::Uniprot, "ACTIVE_SITE", vec![(4, None)])],
        );
    let orchestrator = ViewOrchestrator::new(service, ViewOptions::default());
    let view = orchestrator.build_uniprot_fv("P69905").await.unwrap();

    let ids: Vec<&str> = view.row_config.iter().map(|r| r.track_id.as_str()).collect();
    assert_eq!(ids, vec!["mainSequenceTrack_P69905", "annotationTrack_ACTIVE_SITE", "targetSequenceTrack_"]);
    assert_eq!(view.row_config[2].row_title, "PDB ENTITY 4HHB_1");
}

#[tokio::test]
async fn row_order_override() {
    let options = ViewOptions { row_order: Some(RowOrder::AnnotationsFirst), ..Default::default() };
    let orchestrator = ViewOrchestrator::new(entity_service(), options);
    let view = orchestrator.build_entity_fv("4HHB_1").await.unwrap();
    assert_eq!(view.row_config[1].track_id, "annotationTrack_CATH");
    assert_eq!(view.row_config[2].display_type, DisplayType::Composite);
}

#[tokio::test]
async fn instance_view_resolves_entity() {
    let service = entity_service()
        .with_alignment(
            AlignmentRequest::new("4HHB.A", SequenceReference::PdbInstance, SequenceReference::PdbEntity),
            AlignmentResponse {
                query_sequence: "ACDEFGHIKL".to_string(),
                target_alignment: vec![TargetAlignment {
                    target_id: "4HHB_1".to_string(),
                    target_sequence: Some("ACDEFGHIKL".to_string()),
                    aligned_regions: vec![region(1, 10, 1, 10)],
                }],
            },
        )
        .with_annotations(
            "4HHB.A",
            SequenceReference::PdbInstance,
            vec![
                annotation_group(Source::PdbInstance, "SHEET", vec![(2, Some(6))]),
                annotation_group(Source::PdbEntity, "CATH", vec![(1, Some(10))]),
            ],
        );
    let orchestrator = ViewOrchestrator::new(service, ViewOptions::default());
    let view = orchestrator.build_instance_fv("4HHB.A").await.unwrap();

    assert_eq!(view.row_config[0].track_id, "mainSequenceTrack_4HHB_1");
    let ids: Vec<&str> = view.row_config.iter().skip(2).map(|r| r.track_id.as_str()).collect();
    assert_eq!(ids, vec!["annotationTrack_SHEET", "annotationTrack_CATH"]);
}

#[tokio::test]
async fn instance_without_entity_is_no_data() {
    let service = FixtureService::new().with_alignment(
        AlignmentRequest::new("9XYZ.B", SequenceReference::PdbInstance, SequenceReference::PdbEntity),
        AlignmentResponse { query_sequence: "MK".to_string(), target_alignment: Vec::new() },
    );
    let orchestrator = ViewOrchestrator::new(service, ViewOptions::default());
    let err = orchestrator.build_instance_fv("9XYZ.B").await.unwrap_err();
    assert!(err.is_no_data());
    assert!(orchestrator.targets().wait().await.is_none());
}

#[tokio::test]
async fn empty_query_sequence_is_no_data() {
    let service = FixtureService::new().with_alignment(
        AlignmentRequest::new("1ABC_1", SequenceReference::PdbEntity, SequenceReference::Uniprot),
        AlignmentResponse::default(),
    );
    let orchestrator = ViewOrchestrator::new(service, ViewOptions::default());
    let err = orchestrator.build_entity_fv("1ABC_1").await.unwrap_err();
    assert!(err.is_no_data());
}

#[tokio::test]
async fn fetch_failure_aborts_build() {
    // alignments recorded, annotations missing
    let service = FixtureService::new().with_alignment(
        AlignmentRequest::new("1ABC_1", SequenceReference::PdbEntity, SequenceReference::Uniprot),
        AlignmentResponse { query_sequence: "MKV".to_string(), target_alignment: Vec::new() },
    );
    let orchestrator = ViewOrchestrator::new(service, ViewOptions::default());
    let err = orchestrator.build_entity_fv("1ABC_1").await.unwrap_err();
    assert!(matches!(err, FvError::Fetch { .. }));

    let missing = ViewOrchestrator::new(FixtureService::new(), ViewOptions::default());
    let err = missing.build_uniprot_fv("P00000").await.unwrap_err();
    assert!(matches!(err, FvError::Fetch { .. }));
    assert!(missing.targets().wait().await.is_none());
}

#[tokio::test]
async fn target_filter_limits_rows() {
    let service = FixtureService::new()
        .with_alignment(
            AlignmentRequest::new("P69905", SequenceReference::Uniprot, SequenceReference::PdbEntity),
            AlignmentResponse {
                query_sequence: "MVLS".to_string(),
                target_alignment: vec![
                    TargetAlignment {
                        target_id: "4HHB_1".to_string(),
                        target_sequence: Some("MVLS".to_string()),
                        aligned_regions: vec![region(1, 4, 1, 4)],
                    },
                    TargetAlignment {
                        target_id: "1A3N_1".to_string(),
                        target_sequence: Some("MVLS".to_string()),
                        aligned_regions: vec![region(1, 4, 1, 4)],
                    },
                ],
            },
        )
        .with_annotations("P69905", SequenceReference::Uniprot, Vec::new());
    let options = ViewOptions { filter_by_target_contains: Some("4HHB".to_string()), ..Default::default() };
    let orchestrator = ViewOrchestrator::new(service, options);
    let view = orchestrator.build_uniprot_fv("P69905").await.unwrap();
    assert_eq!(view.row_config.len(), 2);
    assert_eq!(view.row_config[1].row_title, "PDB ENTITY 4HHB_1");
}

#[tokio::test]
async fn chromosome_view_shows_exons() {
    let service = FixtureService::new().with_alignment(
        AlignmentRequest::new("NC_000001", SequenceReference::NcbiGenome, SequenceReference::PdbEntity),
        AlignmentResponse {
            query_sequence: String::new(),
            target_alignment: vec![TargetAlignment {
                target_id: "1ABC_1".to_string(),
                target_sequence: None,
                aligned_regions: vec![region(1000, 1090, 1, 91), region(2000, 2060, 92, 152)],
            }],
        },
    );
    let orchestrator = ViewOrchestrator::new(service, ViewOptions::default());
    let view = orchestrator.build_chromosome_fv("NC_000001").await.unwrap();

    assert_eq!(view.board_config.length, CHROMOSOME_BOARD_LENGTH);
    assert_eq!(view.row_config.len(), 2);
    assert!(view.row_config[0].update_data_on_move);
    assert!(view.row_config[0].track_data.is_none());
    assert_eq!(view.row_config[1].row_title, "EXONS");
    assert_eq!(view.row_config[1].track_data.as_ref().unwrap().len(), 2);
}

#[tokio::test]
async fn chromosome_without_entities_is_no_data() {
    let service = FixtureService::new().with_alignment(
        AlignmentRequest::new("NC_X", SequenceReference::NcbiGenome, SequenceReference::PdbEntity),
        AlignmentResponse::default(),
    );
    let orchestrator = ViewOrchestrator::new(service, ViewOptions::default());
    let err = orchestrator.build_chromosome_fv("NC_X").await.unwrap_err();
    assert!(err.is_no_data());
    assert!(orchestrator.targets().wait().await.is_none());
}
