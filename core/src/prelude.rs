use serde::{Deserialize, Serialize};

use crate::detection::{DetectionEvent, Symbology};

/// Shared configuration for a scan session.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    pub workers: usize,
    pub error_threshold: f64,
    pub cooldown_ms: u64,
    pub readers: Vec<Symbology>,
    pub hint_display_ms: u64,
    pub hint_transition_ms: u64,
    pub copied_hint: String,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            workers: 2,
            error_threshold: 0.2,
            cooldown_ms: 2000,
            readers: vec![Symbology::Upc, Symbology::Ean],
            hint_display_ms: 2000,
            hint_transition_ms: 300,
            copied_hint: "Copied!".into(),
        }
    }
}

impl SessionConfig {
    pub fn validate(&self) -> ScanResult<()> {
        if self.workers == 0 {
            return Err(ScanError::Config("workers must be at least 1".into()));
        }
        if self.error_threshold.is_nan() || self.error_threshold <= 0.0 {
            return Err(ScanError::Config(format!(
                "error threshold must be positive, got {}",
                self.error_threshold
            )));
        }
        if self.readers.is_empty() {
            return Err(ScanError::Config("no decoder readers configured".into()));
        }
        Ok(())
    }
}

/// Error taxonomy for a scan session.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum ScanError {
    #[error("detector initialization failed: {0}")]
    Initialization(String),
    #[error("clipboard write failed: {0}")]
    Clipboard(String),
    #[error("confirmation playback failed: {0}")]
    Playback(String),
    #[error("invalid configuration: {0}")]
    Config(String),
}

pub type ScanResult<T> = Result<T, ScanError>;

/// One step of the detection filter pipeline.
///
/// Stages never fail: rejecting a detection is expressed as `None`.
pub trait FilterStage {
    fn filter(&mut self, event: DetectionEvent) -> Option<DetectionEvent>;

    fn name(&self) -> &'static str {
        "anonymous"
    }
}

impl<F> FilterStage for F
where
    F: FnMut(DetectionEvent) -> Option<DetectionEvent>,
{
    fn filter(&mut self, event: DetectionEvent) -> Option<DetectionEvent> {
        self(event)
    }
}
