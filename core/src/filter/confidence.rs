use crate::detection::DetectionEvent;
use crate::prelude::FilterStage;

pub const DEFAULT_ERROR_THRESHOLD: f64 = 0.2;

/// Drops detections where any module decoded with too high an error estimate.
/// Attempts without an estimate count as acceptable.
#[derive(Debug, Clone, Copy)]
pub struct ConfidenceStage {
    threshold: f64,
}

impl ConfidenceStage {
    pub fn new(threshold: f64) -> Self {
        Self { threshold }
    }

    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    pub fn accepts(&self, event: &DetectionEvent) -> bool {
        event
            .decoded_codes
            .iter()
            .all(|attempt| attempt.error.map_or(true, |error| error < self.threshold))
    }
}

impl Default for ConfidenceStage {
    fn default() -> Self {
        Self::new(DEFAULT_ERROR_THRESHOLD)
    }
}

impl FilterStage for ConfidenceStage {
    fn filter(&mut self, event: DetectionEvent) -> Option<DetectionEvent> {
        if self.accepts(&event) {
            Some(event)
        } else {
            None
        }
    }

    fn name(&self) -> &'static str {
        "confidence"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::detection::DecodeAttempt;

    #[test]
    fn confident_event_passes_unchanged() {
        let event = DetectionEvent::new(
            "042100005264",
            vec![
                DecodeAttempt::with_error(0.0),
                DecodeAttempt::unscored(),
                DecodeAttempt::with_error(0.199),
            ],
        );
        let mut stage = ConfidenceStage::default();
        assert_eq!(stage.filter(event.clone()), Some(event));
    }

    #[test]
    fn threshold_is_exclusive() {
        let event = DetectionEvent::new(
            "042100005264",
            vec![DecodeAttempt::with_error(0.01), DecodeAttempt::with_error(0.2)],
        );
        assert_eq!(ConfidenceStage::default().filter(event), None);
    }

    #[test]
    fn event_without_attempts_is_accepted() {
        let event = DetectionEvent::new("042100005264", Vec::new());
        assert!(ConfidenceStage::default().accepts(&event));
    }
}
