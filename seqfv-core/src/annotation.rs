//! Annotation classification
//!
//! Groups positioned features by type and decides, per type, whether the
//! row shows pins, blocks, bonds or a composite of two of them.

use crate::annotation_map::AnnotationMap;
use crate::track::*;
use crate::types::*;
use log::warn;
use std::collections::HashMap;

pub const ANNOTATION_TRACK_PREFIX: &str = "annotationTrack_";

/// Verdict of a full scan over a type's entries
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shape {
    Empty,
    Points,
    Spans,
    Mixed,
}

pub fn classify(entries: &[TrackElement]) -> Shape {
    let points = entries.iter().filter(|e| e.is_point()).count();
    match (points, entries.len() - points) {
        (0, 0) => Shape::Empty,
        (_, 0) => Shape::Points,
        (0, _) => Shape::Spans,
        _ => Shape::Mixed,
    }
}

/// Features grouped by key, in first-encounter order
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AnnotationGroups {
    order: Vec<String>,
    groups: HashMap<String, Vec<TrackElement>>,
}

impl AnnotationGroups {
    pub fn push(&mut self, key: &str, element: TrackElement) {
        self.entry(key).push(element);
    }

    fn entry(&mut self, key: &str) -> &mut Vec<TrackElement> {
        if !self.groups.contains_key(key) {
            self.order.push(key.to_string());
        }
        self.groups.entry(key.to_string()).or_default()
    }

    pub fn get(&self, key: &str) -> Option<&Vec<TrackElement>> {
        self.groups.get(key)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.groups.contains_key(key)
    }

    /// Keys in the order they were first seen
    pub fn keys(&self) -> &[String] {
        &self.order
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }
}

fn position_element(feature: &Feature, position: &FeaturePosition, key: &str) -> TrackElement {
    TrackElement {
        begin: position.beg_seq_id,
        end: position.end_seq_id,
        description: feature.description.clone(),
        feature_id: feature.feature_id.clone(),
        element_type: Some(key.to_string()),
        value: position.value.map(ElementValue::from),
        g_value: feature.value,
        gaps: position
            .gaps
            .as_ref()
            .map(|gaps| gaps.iter().map(|g| Gap { begin: g.begin, end: g.end }).collect()),
        open_begin: position.open_begin,
        open_end: position.open_end,
        ..Default::default()
    }
}

pub struct AnnotationClassifier {
    map: AnnotationMap,
    palette: TrackPalette,
}

impl AnnotationClassifier {
    pub fn new(map: AnnotationMap, palette: TrackPalette) -> Self {
        Self { map, palette }
    }

    pub fn map(&self) -> &AnnotationMap {
        &self.map
    }

    /// Flatten every feature position into per-type element lists
    pub fn group(&self, data: &[AnnotationFeatures]) -> AnnotationGroups {
        let mut groups = AnnotationGroups::default();
        for annotations in data {
            for feature in &annotations.features {
                let key = self.map.key_for(feature);
                let list = groups.entry(&key);
                list.extend(
                    feature
                        .feature_positions
                        .iter()
                        .map(|p| position_element(feature, p, &key)),
                );
            }
        }
        groups
    }

    /// Rows in priority order, then unrecognized types as encountered.
    /// Types with no positioned entries produce no row.
    pub fn build_rows(&self, data: &[AnnotationFeatures]) -> Vec<TrackRow> {
        let groups = self.group(data);
        let known = self.map.all_types();
        let mut emitted: Vec<&str> = Vec::new();
        let mut rows = Vec::new();

        let ordered = self
            .map
            .ordered_types()
            .map(|t| t.as_str())
            .chain(groups.keys().iter().map(|k| k.as_str()).filter(|k| !known.contains(k)));

        for annotation_type in ordered {
            if emitted.contains(&annotation_type) {
                continue;
            }
            if let Some(entries) = groups.get(annotation_type) {
                emitted.push(annotation_type);
                if let Some(row) = self.build_track(annotation_type, entries.clone()) {
                    rows.push(row);
                }
            }
        }
        rows
    }

    /// Row for one annotation type
    pub fn build_track(&self, annotation_type: &str, data: Vec<TrackElement>) -> Option<TrackRow> {
        let shape = classify(&data);
        if shape == Shape::Empty {
            return None;
        }

        let (display, title, color) = match self.map.get_config(annotation_type) {
            Some(config) => (config.display, config.title.clone(), config.color.clone()),
            None => {
                warn!("Annotation config type {} not found. Using generated config", annotation_type);
                let display = if shape == Shape::Points { DisplayType::Pin } else { DisplayType::Block };
                (display, annotation_type.to_string(), self.map.fallback_color(annotation_type))
            }
        };
        let track_id = format!("{}{}", ANNOTATION_TRACK_PREFIX, annotation_type);

        let display = match display {
            DisplayType::Composite | DisplayType::Bond => {
                let span_kind = if display == DisplayType::Bond { DisplayType::Bond } else { DisplayType::Block };
                let (points, mut spans): (Vec<_>, Vec<_>) = data.into_iter().partition(|e| e.is_point());
                if span_kind == DisplayType::Bond {
                    for bond in spans.iter_mut() {
                        bond.is_empty = Some(true);
                    }
                }
                match (points.is_empty(), spans.is_empty()) {
                    (false, false) => {
                        let layers = vec![
                            DisplayConfig {
                                display_type: span_kind,
                                display_color: color.clone(),
                                display_data: spans,
                                dynamic_display: false,
                            },
                            DisplayConfig {
                                display_type: DisplayType::Pin,
                                display_color: color,
                                display_data: points,
                                dynamic_display: false,
                            },
                        ];
                        return Some(TrackRow::composite(
                            track_id,
                            title,
                            self.palette.track_color.clone(),
                            layers,
                        ));
                    }
                    (false, true) => {
                        return Some(self.simple_row(track_id, DisplayType::Pin, title, color, points));
                    }
                    _ => {
                        return Some(self.simple_row(track_id, span_kind, title, color, spans));
                    }
                }
            }
            other => other,
        };

        Some(self.simple_row(track_id, display, title, color, data))
    }

    fn simple_row(
        &self,
        track_id: String,
        display: DisplayType,
        title: String,
        color: String,
        data: Vec<TrackElement>,
    ) -> TrackRow {
        TrackRow::simple(track_id, display, title, self.palette.track_color.clone(), color, data)
    }
}
