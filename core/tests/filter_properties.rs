//! Integration tests for the detection filter pipeline and tally export.

use std::time::Duration;

use scancore::detection::{DecodeAttempt, DetectionEvent};
use scancore::filter::{ConfidenceStage, DebounceStage, FilterPipeline, ManualClock};
use scancore::{FilterStage, TallyStore};

fn attempts(errors: &[Option<f64>]) -> Vec<DecodeAttempt> {
    errors
        .iter()
        .map(|error| match error {
            Some(value) => DecodeAttempt::with_error(*value),
            None => DecodeAttempt::unscored(),
        })
        .collect()
}

#[test]
fn confident_events_pass_untouched() {
    let cases = [
        vec![None, None],
        vec![Some(0.0), Some(0.19)],
        vec![Some(0.1999), None, Some(0.05)],
        vec![],
    ];

    let mut stage = ConfidenceStage::default();
    for errors in cases {
        let event = DetectionEvent::new("5901234123457", attempts(&errors));
        assert_eq!(stage.filter(event.clone()), Some(event));
    }
}

#[test]
fn one_weak_module_rejects_the_event() {
    let cases = [
        vec![Some(0.2)],
        vec![Some(0.01), Some(0.35)],
        vec![None, Some(1.0), None],
    ];

    let mut stage = ConfidenceStage::default();
    for errors in cases {
        let event = DetectionEvent::new("5901234123457", attempts(&errors));
        assert_eq!(stage.filter(event), None);
    }
}

#[test]
fn scan_pipeline_debounces_by_wall_clock() {
    let clock = ManualClock::new();
    let mut confidence = ConfidenceStage::default();
    let mut debounce = DebounceStage::with_clock(Duration::from_millis(2000), clock.clone());
    let event = DetectionEvent::new("042100005264", attempts(&[Some(0.03)]));

    let mut pass = |event: DetectionEvent| {
        FilterPipeline::apply(
            event,
            &mut [&mut confidence as &mut dyn FilterStage, &mut debounce],
        )
    };

    assert!(pass(event.clone()).is_some());
    clock.advance(Duration::from_millis(600));
    assert!(pass(event.clone()).is_none());
    clock.advance(Duration::from_millis(1400));
    assert!(pass(event).is_some());
}

#[test]
fn tally_exports_counts_as_csv() {
    let mut tally = TallyStore::new();
    for code in ["A", "B", "A"] {
        tally.record(code);
    }

    assert_eq!(
        tally.export(),
        vec![("A".to_string(), 2), ("B".to_string(), 1)]
    );
    assert_eq!(tally.to_csv(), "A,2\nB,1");
}
