use std::sync::Arc;
use std::time::Instant;

use tokio::sync::watch;
use tracing::{debug, info, warn};

use crate::error::{AppError, CaptureError};
use crate::pipeline::metrics::StageMetrics;
use crate::pipeline::services::{Classifier, Enricher};
use crate::pipeline::state::{ErrorKind, PipelineState, Stage};
use crate::pipeline::types::ImageArtifact;

/// Owns the session state machine and sequences the two network calls.
///
/// Client failures are recorded in `Failed(kind, stage)` and never bubble
/// out of here; the only errors the controller returns are caller mistakes,
/// i.e. an operation requested in a state that does not allow it. Every
/// transition is published through the watch channel so the shell can render
/// the current affordances.
pub struct PipelineController {
    classifier: Arc<dyn Classifier>,
    enricher: Arc<dyn Enricher>,
    artifact: Option<ImageArtifact>,
    state: PipelineState,
    state_tx: watch::Sender<PipelineState>,
    metrics: StageMetrics,
}

impl PipelineController {
    pub fn new(classifier: Arc<dyn Classifier>, enricher: Arc<dyn Enricher>) -> Self {
        let (state_tx, _) = watch::channel(PipelineState::Idle);
        Self {
            classifier,
            enricher,
            artifact: None,
            state: PipelineState::Idle,
            state_tx,
            metrics: StageMetrics::new(),
        }
    }

    pub fn state(&self) -> &PipelineState {
        &self.state
    }

    pub fn subscribe(&self) -> watch::Receiver<PipelineState> {
        self.state_tx.subscribe()
    }

    pub fn metrics(&self) -> &StageMetrics {
        &self.metrics
    }

    fn transition(&mut self, next: PipelineState) {
        debug!(from = self.state.name(), to = next.name(), "pipeline transition");
        self.state = next;
        // Snapshots are best-effort; nobody listening is fine.
        let _ = self.state_tx.send(self.state.clone());
    }

    /// A completed capture replaces the artifact and resets the session,
    /// whatever state preceded it. Any prior label or nutrient set is gone.
    pub fn accept_capture(&mut self, artifact: ImageArtifact) {
        info!(artifact = %artifact.id(), "new photo captured, resetting pipeline");
        self.artifact = Some(artifact);
        self.transition(PipelineState::Idle);
    }

    /// A failed capture leaves the stored artifact alone so a previous photo
    /// can still be classified.
    pub fn record_capture_failure(&mut self, error: &CaptureError) {
        warn!(%error, "capture failed");
        self.transition(PipelineState::Failed {
            kind: ErrorKind::from(error),
            stage: Stage::Capture,
            label: None,
        });
    }

    pub async fn run_classification(&mut self) -> Result<(), AppError> {
        if self.state.is_in_flight() {
            return Err(AppError::Precondition(
                "a request is already in flight".to_string(),
            ));
        }
        let artifact = self
            .artifact
            .clone()
            .ok_or_else(|| AppError::Precondition("no captured photo to classify".to_string()))?;

        self.transition(PipelineState::AwaitingClassification);
        let started = Instant::now();
        match self.classifier.classify(&artifact).await {
            Ok(label) => {
                self.metrics.record_classification_duration(started.elapsed());
                info!(%label, "classification succeeded");
                self.transition(PipelineState::Classified(label));
            }
            Err(error) => {
                warn!(%error, "classification failed");
                self.transition(PipelineState::Failed {
                    kind: ErrorKind::from(&error),
                    stage: Stage::Classify,
                    label: None,
                });
            }
        }
        Ok(())
    }

    pub async fn run_enrichment(&mut self) -> Result<(), AppError> {
        if self.state.is_in_flight() {
            return Err(AppError::Precondition(
                "a request is already in flight".to_string(),
            ));
        }
        // Valid from any state that still holds a label: a fresh
        // classification, a completed enrichment being refreshed, or a
        // failed enrichment being retried.
        let label = self
            .state
            .label()
            .cloned()
            .ok_or_else(|| AppError::Precondition("no classified label to enrich".to_string()))?;

        self.transition(PipelineState::AwaitingEnrichment(label.clone()));
        let started = Instant::now();
        match self.enricher.enrich(&label).await {
            Ok(nutrients) => {
                self.metrics.record_enrichment_duration(started.elapsed());
                info!(%label, nutrients = nutrients.len(), "enrichment succeeded");
                self.transition(PipelineState::Enriched(label, nutrients));
            }
            Err(error) => {
                warn!(%label, %error, "enrichment failed");
                self.transition(PipelineState::Failed {
                    kind: ErrorKind::from(&error),
                    stage: Stage::Enrich,
                    label: Some(label),
                });
            }
        }
        Ok(())
    }
}
