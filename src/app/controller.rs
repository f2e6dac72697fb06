use std::sync::Arc;

use tokio::sync::mpsc::Receiver;
use tokio::sync::watch;
use tracing::warn;

use crate::capture::CaptureSource;
use crate::error::AppError;
use crate::pipeline::{PipelineController, PipelineState};

/// Actions the presentation shell can request. The shell never touches the
/// pipeline directly; it sends one of these and watches the snapshots.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UiCommand {
    Capture,
    Classify,
    Enrich,
}

/// Drains shell commands into the pipeline, one at a time. Serializing here
/// keeps at most one network call outstanding; a command sent while another
/// is running waits in the channel and is then validated against whatever
/// state the pipeline landed in.
pub struct AppController {
    pipeline: PipelineController,
    capture_source: Arc<dyn CaptureSource>,
    command_rx: Receiver<UiCommand>,
}

impl AppController {
    pub fn new(
        pipeline: PipelineController,
        capture_source: Arc<dyn CaptureSource>,
        command_rx: Receiver<UiCommand>,
    ) -> Self {
        Self {
            pipeline,
            capture_source,
            command_rx,
        }
    }

    pub fn subscribe(&self) -> watch::Receiver<PipelineState> {
        self.pipeline.subscribe()
    }

    pub async fn run(&mut self) -> Result<(), AppError> {
        while let Some(command) = self.command_rx.recv().await {
            if let Err(error) = self.handle(command).await {
                // Wrong-state requests are rejected, not fatal; the pipeline
                // state is untouched and the shell keeps its snapshot.
                warn!(?command, %error, "command rejected");
            }
        }
        Ok(())
    }

    async fn handle(&mut self, command: UiCommand) -> Result<(), AppError> {
        match command {
            UiCommand::Capture => match self.capture_source.capture().await {
                Ok(artifact) => self.pipeline.accept_capture(artifact),
                Err(error) => self.pipeline.record_capture_failure(&error),
            },
            UiCommand::Classify => self.pipeline.run_classification().await?,
            UiCommand::Enrich => self.pipeline.run_enrichment().await?,
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use async_trait::async_trait;
    use tokio::sync::mpsc;

    use super::*;
    use crate::error::{CaptureError, ClientError};
    use crate::pipeline::services::{Classifier, Enricher};
    use crate::pipeline::types::{ImageArtifact, Label, NutrientSet};
    use crate::pipeline::PipelineState;

    struct StubCapture {
        fail: bool,
    }

    #[async_trait]
    impl CaptureSource for StubCapture {
        async fn capture(&self) -> Result<ImageArtifact, CaptureError> {
            if self.fail {
                Err(CaptureError::Aborted)
            } else {
                Ok(ImageArtifact::jpeg(PathBuf::from("/tmp/fruit.jpg")))
            }
        }
    }

    struct StubClassifier;

    #[async_trait]
    impl Classifier for StubClassifier {
        async fn classify(&self, _artifact: &ImageArtifact) -> Result<Label, ClientError> {
            Ok(Label::parse("apple").unwrap())
        }
    }

    struct StubEnricher;

    #[async_trait]
    impl Enricher for StubEnricher {
        async fn enrich(&self, _label: &Label) -> Result<NutrientSet, ClientError> {
            Ok(NutrientSet::new())
        }
    }

    #[tokio::test]
    async fn commands_drive_the_pipeline_in_order() {
        let (command_tx, command_rx) = mpsc::channel(8);
        let pipeline =
            PipelineController::new(Arc::new(StubClassifier), Arc::new(StubEnricher));
        let mut controller =
            AppController::new(pipeline, Arc::new(StubCapture { fail: false }), command_rx);
        let mut snapshots = controller.subscribe();

        command_tx.send(UiCommand::Capture).await.unwrap();
        command_tx.send(UiCommand::Classify).await.unwrap();
        command_tx.send(UiCommand::Enrich).await.unwrap();
        drop(command_tx);

        controller.run().await.unwrap();

        snapshots.changed().await.unwrap();
        assert!(matches!(
            *snapshots.borrow_and_update(),
            PipelineState::Enriched(_, _)
        ));
    }

    #[tokio::test]
    async fn rejected_command_does_not_stop_the_loop() {
        let (command_tx, command_rx) = mpsc::channel(8);
        let pipeline =
            PipelineController::new(Arc::new(StubClassifier), Arc::new(StubEnricher));
        let mut controller =
            AppController::new(pipeline, Arc::new(StubCapture { fail: false }), command_rx);
        let mut snapshots = controller.subscribe();

        // Enrich before anything is classified: rejected, then the rest runs.
        command_tx.send(UiCommand::Enrich).await.unwrap();
        command_tx.send(UiCommand::Capture).await.unwrap();
        command_tx.send(UiCommand::Classify).await.unwrap();
        drop(command_tx);

        controller.run().await.unwrap();

        snapshots.changed().await.unwrap();
        assert!(matches!(
            *snapshots.borrow_and_update(),
            PipelineState::Classified(_)
        ));
    }

    #[tokio::test]
    async fn failed_capture_is_recorded() {
        let (command_tx, command_rx) = mpsc::channel(8);
        let pipeline =
            PipelineController::new(Arc::new(StubClassifier), Arc::new(StubEnricher));
        let mut controller =
            AppController::new(pipeline, Arc::new(StubCapture { fail: true }), command_rx);
        let mut snapshots = controller.subscribe();

        command_tx.send(UiCommand::Capture).await.unwrap();
        drop(command_tx);

        controller.run().await.unwrap();

        snapshots.changed().await.unwrap();
        assert!(matches!(
            *snapshots.borrow_and_update(),
            PipelineState::Failed { .. }
        ));
    }
}
