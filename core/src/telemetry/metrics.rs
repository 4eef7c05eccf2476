use serde::{Deserialize, Serialize};

/// Counters describing what a scan session did with its detections.
#[derive(Debug, Default)]
pub struct MetricsRecorder {
    inner: MetricsSnapshot,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetricsSnapshot {
    pub detections: usize,
    pub accepted: usize,
    pub rejected_low_confidence: usize,
    pub rejected_duplicate: usize,
    pub playback_failures: usize,
    pub errors: usize,
}

impl MetricsRecorder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_detection(&mut self) {
        self.inner.detections += 1;
    }

    pub fn record_accepted(&mut self) {
        self.inner.accepted += 1;
    }

    /// Attributes a rejection to the stage that produced it.
    pub fn record_rejected(&mut self, stage: &str) {
        match stage {
            "confidence" => self.inner.rejected_low_confidence += 1,
            "debounce" => self.inner.rejected_duplicate += 1,
            _ => {}
        }
    }

    pub fn record_playback_failure(&mut self) {
        self.inner.playback_failures += 1;
    }

    pub fn record_error(&mut self) {
        self.inner.errors += 1;
    }

    pub fn snapshot(&self) -> MetricsSnapshot {
        self.inner
    }
}
