use std::fmt;

use crate::error::{CaptureError, ClientError};
use crate::pipeline::types::{Label, NutrientSet};

/// Which pipeline phase an error occurred in. Retained inside `Failed` so
/// the shell can word its message and target the retry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Capture,
    Classify,
    Enrich,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::Capture => "capture",
            Stage::Classify => "classify",
            Stage::Enrich => "enrich",
        };
        f.write_str(name)
    }
}

/// Display-oriented mirror of the error taxonomy. The shell only needs to
/// distinguish these kinds; the source error stays with the log line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ErrorKind {
    Capture,
    Network,
    Service(u16),
    MalformedResponse,
    Configuration,
    Precondition,
}

impl From<&ClientError> for ErrorKind {
    fn from(error: &ClientError) -> Self {
        match error {
            ClientError::Precondition(_) => ErrorKind::Precondition,
            ClientError::Configuration(_) => ErrorKind::Configuration,
            ClientError::Network(_) => ErrorKind::Network,
            ClientError::Service(status) => ErrorKind::Service(*status),
            ClientError::MalformedResponse(_) => ErrorKind::MalformedResponse,
        }
    }
}

impl From<&CaptureError> for ErrorKind {
    fn from(_: &CaptureError) -> Self {
        ErrorKind::Capture
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ErrorKind::Capture => f.write_str("capture failed"),
            ErrorKind::Network => f.write_str("network unreachable"),
            ErrorKind::Service(status) => write!(f, "service error ({status})"),
            ErrorKind::MalformedResponse => f.write_str("unusable response"),
            ErrorKind::Configuration => f.write_str("missing configuration"),
            ErrorKind::Precondition => f.write_str("invalid request"),
        }
    }
}

/// The single live state of the capture -> classify -> enrich pipeline.
/// Mutated only by the controller; everyone else sees cloned snapshots.
#[derive(Debug, Clone, PartialEq)]
pub enum PipelineState {
    Idle,
    AwaitingClassification,
    Classified(Label),
    AwaitingEnrichment(Label),
    Enriched(Label, NutrientSet),
    Failed {
        kind: ErrorKind,
        stage: Stage,
        // Kept when classification already succeeded so an enrichment
        // failure does not force the user to recapture.
        label: Option<Label>,
    },
}

impl PipelineState {
    pub fn name(&self) -> &'static str {
        match self {
            PipelineState::Idle => "Idle",
            PipelineState::AwaitingClassification => "AwaitingClassification",
            PipelineState::Classified(_) => "Classified",
            PipelineState::AwaitingEnrichment(_) => "AwaitingEnrichment",
            PipelineState::Enriched(_, _) => "Enriched",
            PipelineState::Failed { .. } => "Failed",
        }
    }

    /// The label currently in hand, whatever state carries it.
    pub fn label(&self) -> Option<&Label> {
        match self {
            PipelineState::Classified(label)
            | PipelineState::AwaitingEnrichment(label)
            | PipelineState::Enriched(label, _) => Some(label),
            PipelineState::Failed { label, .. } => label.as_ref(),
            _ => None,
        }
    }

    pub fn is_in_flight(&self) -> bool {
        matches!(
            self,
            PipelineState::AwaitingClassification | PipelineState::AwaitingEnrichment(_)
        )
    }
}
