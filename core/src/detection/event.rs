use serde::{Deserialize, Serialize};

/// One decode attempt for a single module of the symbol.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct DecodeAttempt {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end: Option<u32>,
}

impl DecodeAttempt {
    pub fn with_error(error: f64) -> Self {
        Self {
            error: Some(error),
            ..Default::default()
        }
    }

    pub fn unscored() -> Self {
        Self::default()
    }
}

/// Decode result emitted by the detector for a processed frame.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DetectionEvent {
    pub code: String,
    #[serde(default)]
    pub decoded_codes: Vec<DecodeAttempt>,
}

impl DetectionEvent {
    pub fn new(code: impl Into<String>, decoded_codes: Vec<DecodeAttempt>) -> Self {
        Self {
            code: code.into(),
            decoded_codes,
        }
    }

    /// Largest error estimate across all attempts, if any attempt was scored.
    pub fn worst_error(&self) -> Option<f64> {
        self.decoded_codes
            .iter()
            .filter_map(|attempt| attempt.error)
            .fold(None, |worst, error| match worst {
                Some(current) if current >= error => Some(current),
                _ => Some(error),
            })
    }
}
