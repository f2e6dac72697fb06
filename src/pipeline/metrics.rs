use std::time::Duration;

/// Timings collected while the pipeline runs a session
pub struct StageMetrics {
    classification_duration: Option<Duration>,
    enrichment_duration: Option<Duration>,
}

impl StageMetrics {
    pub fn new() -> Self {
        Self {
            classification_duration: None,
            enrichment_duration: None,
        }
    }

    pub fn record_classification_duration(&mut self, duration: Duration) {
        self.classification_duration = Some(duration);
    }

    pub fn record_enrichment_duration(&mut self, duration: Duration) {
        self.enrichment_duration = Some(duration);
    }

    pub fn classification_duration(&self) -> Option<Duration> {
        self.classification_duration
    }

    pub fn enrichment_duration(&self) -> Option<Duration> {
        self.enrichment_duration
    }
}

impl Default for StageMetrics {
    fn default() -> Self {
        Self::new()
    }
}
