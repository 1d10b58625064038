//! Alignment and annotation query service
//!
//! The transport is external; the orchestrator only needs this trait.
//! `FixtureService` answers from recorded responses and backs the CLI and tests.

use crate::error::{FvError, Result};
use crate::types::*;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;

#[async_trait]
pub trait AlignmentService: Send + Sync {
    async fn request_alignment(&self, request: &AlignmentRequest) -> Result<AlignmentResponse>;

    async fn request_annotations(&self, request: &AnnotationRequest) -> Result<Vec<AnnotationFeatures>>;
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AlignmentFixture {
    pub request: AlignmentRequest,
    pub response: AlignmentResponse,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnnotationFixture {
    pub query_id: String,
    pub reference: SequenceReference,
    pub response: Vec<AnnotationFeatures>,
}

/// On-disk layout of a fixture bundle
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FixtureBundle {
    #[serde(default)]
    pub alignments: Vec<AlignmentFixture>,
    #[serde(default)]
    pub annotations: Vec<AnnotationFixture>,
}

#[derive(Debug, Clone, Default)]
pub struct FixtureService {
    alignments: HashMap<AlignmentRequest, AlignmentResponse>,
    annotations: HashMap<(String, SequenceReference), Vec<AnnotationFeatures>>,
}

impl FixtureService {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_alignment(mut self, request: AlignmentRequest, response: AlignmentResponse) -> Self {
        self.alignments.insert(request, response);
        self
    }

    pub fn with_annotations(
        mut self,
        query_id: impl Into<String>,
        reference: SequenceReference,
        response: Vec<AnnotationFeatures>,
    ) -> Self {
        self.annotations.insert((query_id.into(), reference), response);
        self
    }

    pub fn from_bundle(bundle: FixtureBundle) -> Self {
        let mut service = Self::new();
        for fixture in bundle.alignments {
            service.alignments.insert(fixture.request, fixture.response);
        }
        for fixture in bundle.annotations {
            service
                .annotations
                .insert((fixture.query_id, fixture.reference), fixture.response);
        }
        service
    }

    pub fn load_from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let bundle: FixtureBundle = serde_json::from_str(&content)?;
        Ok(Self::from_bundle(bundle))
    }
}

#[async_trait]
impl AlignmentService for FixtureService {
    async fn request_alignment(&self, request: &AlignmentRequest) -> Result<AlignmentResponse> {
        self.alignments.get(request).cloned().ok_or_else(|| {
            FvError::fetch(
                request.query_id.clone(),
                format!("no alignment recorded from {} to {}", request.from, request.to),
            )
        })
    }

    async fn request_annotations(&self, request: &AnnotationRequest) -> Result<Vec<AnnotationFeatures>> {
        let key = (request.query_id.clone(), request.reference);
        let recorded = self.annotations.get(&key).ok_or_else(|| {
            FvError::fetch(
                request.query_id.clone(),
                format!("no annotations recorded for reference {}", request.reference),
            )
        })?;
        // Unsourced groups always pass; sourced ones must be requested
        Ok(recorded
            .iter()
            .filter(|a| a.source.map_or(true, |s| request.sources.contains(&s)))
            .cloned()
            .collect())
    }
}
