use std::sync::Arc;

use tokio::sync::mpsc::{self, Sender};
use tokio::sync::watch;
use tokio_util::sync::CancellationToken;
use tracing::error;

use crate::app::{AppController, UiCommand};
use crate::capture::{CaptureSource, FileCaptureSource};
use crate::config::Settings;
use crate::error::{AppError, ConfigurationError};
use crate::pipeline::services::{HttpClassifier, HttpEnricher, NutritionCredentials};
use crate::pipeline::{PipelineController, PipelineState};

/// Owns the running app-controller task. Dropping the coordinator shuts it
/// down.
pub struct Coordinator {
    controller_task: tokio::task::JoinHandle<()>,
    cancel_token: CancellationToken,
    command_tx: Sender<UiCommand>,
    state_rx: watch::Receiver<PipelineState>,
}

impl Coordinator {
    fn new(mut controller: AppController, command_tx: Sender<UiCommand>) -> Self {
        let cancel_token = CancellationToken::new();
        let state_rx = controller.subscribe();
        let task_token = cancel_token.clone();
        let controller_task = tokio::spawn(async move {
            tokio::select! {
                _ = task_token.cancelled() => {}
                result = controller.run() => {
                    if let Err(e) = result {
                        error!("App controller error: {}", e);
                    }
                }
            }
        });
        Self {
            controller_task,
            cancel_token,
            command_tx,
            state_rx,
        }
    }

    pub fn commands(&self) -> Sender<UiCommand> {
        self.command_tx.clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<PipelineState> {
        self.state_rx.clone()
    }

    pub fn stop(&self) {
        self.cancel_token.cancel();
        self.controller_task.abort();
    }
}

impl Drop for Coordinator {
    fn drop(&mut self) {
        self.stop();
    }
}

pub struct CoordinatorBuilder {
    settings: Settings,
    capture_source: Option<Arc<dyn CaptureSource>>,
    classifier: Option<Arc<dyn crate::pipeline::services::Classifier>>,
    enricher: Option<Arc<dyn crate::pipeline::services::Enricher>>,
}

impl CoordinatorBuilder {
    pub fn new(settings: Settings) -> Self {
        Self {
            settings,
            capture_source: None,
            classifier: None,
            enricher: None,
        }
    }

    // Swaps the file-backed capture source for another implementation.
    pub fn capture_source(mut self, capture_source: Arc<dyn CaptureSource>) -> Self {
        self.capture_source = Some(capture_source);
        self
    }

    // Swaps the HTTP classifier for another implementation.
    pub fn classifier(
        mut self,
        classifier: Arc<dyn crate::pipeline::services::Classifier>,
    ) -> Self {
        self.classifier = Some(classifier);
        self
    }

    // Swaps the HTTP enricher for another implementation.
    pub fn enricher(mut self, enricher: Arc<dyn crate::pipeline::services::Enricher>) -> Self {
        self.enricher = Some(enricher);
        self
    }

    pub fn build(self) -> Result<Coordinator, AppError> {
        let classifier = match self.classifier {
            Some(classifier) => classifier,
            None => Arc::new(HttpClassifier::new(&self.settings.classification.base_url)?),
        };
        let enricher = match self.enricher {
            Some(enricher) => enricher,
            None => {
                // Credentials stay optional here; enrichment reports the
                // missing configuration if and when it is requested.
                let credentials = match (
                    self.settings.nutrition.app_id.clone(),
                    self.settings.nutrition.app_key.clone(),
                ) {
                    (Some(app_id), Some(app_key)) => {
                        Some(NutritionCredentials { app_id, app_key })
                    }
                    _ => None,
                };
                Arc::new(HttpEnricher::new(
                    &self.settings.nutrition.base_url,
                    credentials,
                )?)
            }
        };
        let capture_source = match self.capture_source {
            Some(capture_source) => capture_source,
            None => {
                let path = self
                    .settings
                    .capture
                    .photo_path
                    .clone()
                    .ok_or(ConfigurationError::Missing("capture.photo_path"))
                    .map_err(AppError::Configuration)?;
                Arc::new(FileCaptureSource::new(path))
            }
        };

        let (command_tx, command_rx) = mpsc::channel(self.settings.command_buffer_size);
        let pipeline = PipelineController::new(classifier, enricher);
        let controller = AppController::new(pipeline, capture_source, command_rx);
        Ok(Coordinator::new(controller, command_tx))
    }
}
