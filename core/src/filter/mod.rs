//! Detection filter pipeline and its stages.

pub mod clock;
pub mod confidence;
pub mod debounce;

pub use clock::{Clock, ManualClock, SystemClock};
pub use confidence::{ConfidenceStage, DEFAULT_ERROR_THRESHOLD};
pub use debounce::{DebounceStage, DEFAULT_COOLDOWN};

use crate::detection::DetectionEvent;
use crate::prelude::FilterStage;

/// Result of running a detection through the pipeline.
#[derive(Debug, Clone, PartialEq)]
pub enum FilterOutcome {
    Accepted(DetectionEvent),
    Rejected { stage: &'static str },
}

impl FilterOutcome {
    pub fn accepted(self) -> Option<DetectionEvent> {
        match self {
            Self::Accepted(event) => Some(event),
            Self::Rejected { .. } => None,
        }
    }
}

pub struct FilterPipeline;

impl FilterPipeline {
    /// Runs `event` through `stages` left to right, stopping at the first
    /// stage that rejects it.
    pub fn run(event: DetectionEvent, stages: &mut [&mut dyn FilterStage]) -> FilterOutcome {
        let mut candidate = event;
        for stage in stages.iter_mut() {
            match stage.filter(candidate) {
                Some(next) => candidate = next,
                None => return FilterOutcome::Rejected { stage: stage.name() },
            }
        }
        FilterOutcome::Accepted(candidate)
    }

    pub fn apply(
        event: DetectionEvent,
        stages: &mut [&mut dyn FilterStage],
    ) -> Option<DetectionEvent> {
        Self::run(event, stages).accepted()
    }
}
