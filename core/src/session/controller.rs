use std::time::Duration;

use log::{debug, error, info};
use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;

use crate::detection::{DetectionEvent, DetectorConfig, Orientation};
use crate::filter::{
    Clock, ConfidenceStage, DebounceStage, FilterOutcome, FilterPipeline, SystemClock,
};
use crate::prelude::{FilterStage, ScanError, ScanResult, SessionConfig};
use crate::session::boundary::{Clipboard, ConfirmationSound, Detector, Presenter};
use crate::tally::TallyStore;
use crate::telemetry::{LogManager, MetricsRecorder, MetricsSnapshot};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SessionState {
    Uninitialized,
    Scanning,
    Failed,
}

/// Bridges the detector stream to the filter pipeline, tally and presenter.
///
/// The session owns its suppression state and tally outright, so every
/// detection is handled to completion before the next one is looked at.
pub struct ScanSession<D, P, S, C = SystemClock>
where
    C: Clock,
{
    config: SessionConfig,
    detector: D,
    presenter: P,
    sound: S,
    confidence: ConfidenceStage,
    debounce: DebounceStage<C>,
    tally: TallyStore,
    metrics: MetricsRecorder,
    logger: LogManager,
    state: SessionState,
}

impl<D, P, S> ScanSession<D, P, S, SystemClock>
where
    D: Detector,
    P: Presenter,
    S: ConfirmationSound,
{
    pub fn new(config: SessionConfig, detector: D, presenter: P, sound: S) -> ScanResult<Self> {
        Self::with_clock(config, detector, presenter, sound, SystemClock)
    }
}

impl<D, P, S, C> ScanSession<D, P, S, C>
where
    D: Detector,
    P: Presenter,
    S: ConfirmationSound,
    C: Clock,
{
    pub fn with_clock(
        config: SessionConfig,
        detector: D,
        presenter: P,
        sound: S,
        clock: C,
    ) -> ScanResult<Self> {
        config.validate()?;
        let confidence = ConfidenceStage::new(config.error_threshold);
        let debounce = DebounceStage::with_clock(Duration::from_millis(config.cooldown_ms), clock);

        Ok(Self {
            config,
            detector,
            presenter,
            sound,
            confidence,
            debounce,
            tally: TallyStore::new(),
            metrics: MetricsRecorder::new(),
            logger: LogManager::default(),
            state: SessionState::Uninitialized,
        })
    }

    /// Configures and starts the detector against `target`.
    ///
    /// `orientation` picks the camera profile once; later rotations are not
    /// observed. A failed start leaves the session in `Failed` and is not
    /// retried.
    pub fn initialize(
        &mut self,
        target: &str,
        orientation: Orientation,
    ) -> ScanResult<mpsc::Receiver<DetectionEvent>> {
        self.debounce.clear();
        self.logger.set_target(target);

        let detector_config = DetectorConfig::live(
            target,
            orientation,
            self.config.workers,
            self.config.readers.clone(),
        );

        if let Err(err) = self.detector.initialize(&detector_config) {
            let err = if matches!(err, ScanError::Initialization(_)) {
                err
            } else {
                ScanError::Initialization(err.to_string())
            };
            error!("scanner initialization failed: {}", err);
            self.state = SessionState::Failed;
            self.metrics.record_error();
            self.presenter.report_error(&err);
            return Err(err);
        }

        self.presenter.hide_debug_overlay();
        let events = self.detector.start();
        self.state = SessionState::Scanning;
        self.logger.record(&format!(
            "scanning {}x{} with {} workers",
            detector_config.input_stream.constraints.width,
            detector_config.input_stream.constraints.height,
            detector_config.num_of_workers
        ));
        Ok(events)
    }

    /// Filters one detection and, when accepted, confirms, tallies and
    /// presents it. Returns the code's new count for accepted detections.
    pub fn handle_detection(&mut self, event: DetectionEvent) -> Option<u64> {
        if self.state != SessionState::Scanning {
            debug!("ignoring detection {} while {:?}", event.code, self.state);
            return None;
        }
        self.metrics.record_detection();

        let outcome = FilterPipeline::run(
            event,
            &mut [
                &mut self.confidence as &mut dyn FilterStage,
                &mut self.debounce,
            ],
        );
        let accepted = match outcome {
            FilterOutcome::Accepted(event) => event,
            FilterOutcome::Rejected { stage } => {
                self.metrics.record_rejected(stage);
                return None;
            }
        };

        if let Err(err) = self.sound.play() {
            self.metrics.record_playback_failure();
            self.logger.warn(&err.to_string());
        }

        let count = self.tally.record(&accepted.code);
        self.metrics.record_accepted();
        self.presenter.append_result(&accepted.code);
        info!("accepted {} (seen {} times)", accepted.code, count);
        Some(count)
    }

    /// Handles every detection from `events` in arrival order until the
    /// stream closes. Returns how many detections were accepted.
    pub async fn run(&mut self, mut events: mpsc::Receiver<DetectionEvent>) -> usize {
        let mut accepted = 0;
        while let Some(event) = events.recv().await {
            if self.handle_detection(event).is_some() {
                accepted += 1;
            }
        }
        accepted
    }

    /// Copies the tally as CSV. An empty tally is a no-op returning
    /// `Ok(false)`; a failed write is reported and leaves the tally intact.
    pub fn export_to<K: Clipboard>(&mut self, clipboard: &mut K) -> ScanResult<bool> {
        if self.tally.is_empty() {
            return Ok(false);
        }

        let csv = self.tally.to_csv();
        match clipboard.write_text(&csv) {
            Ok(()) => {
                self.presenter.show_transient_message(
                    &self.config.copied_hint,
                    self.config.hint_display_ms,
                    self.config.hint_transition_ms,
                );
                self.logger
                    .record(&format!("exported {} codes", self.tally.len()));
                Ok(true)
            }
            Err(err) => {
                let err = if matches!(err, ScanError::Clipboard(_)) {
                    err
                } else {
                    ScanError::Clipboard(err.to_string())
                };
                error!("export failed: {}", err);
                self.metrics.record_error();
                self.presenter.report_error(&err);
                Err(err)
            }
        }
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    pub fn tally(&self) -> &TallyStore {
        &self.tally
    }

    pub fn metrics(&self) -> MetricsSnapshot {
        self.metrics.snapshot()
    }

    pub fn debounce(&self) -> &DebounceStage<C> {
        &self.debounce
    }

    pub fn detector(&self) -> &D {
        &self.detector
    }

    pub fn presenter(&self) -> &P {
        &self.presenter
    }

    pub fn presenter_mut(&mut self) -> &mut P {
        &mut self.presenter
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::detection::DecodeAttempt;
    use crate::filter::ManualClock;
    use crate::session::boundary::Silent;

    #[derive(Default)]
    struct StubDetector {
        fail: bool,
        config: Option<DetectorConfig>,
        started: bool,
    }

    impl Detector for StubDetector {
        fn initialize(&mut self, config: &DetectorConfig) -> ScanResult<()> {
            if self.fail {
                return Err(ScanError::Initialization("permission denied".into()));
            }
            self.config = Some(config.clone());
            Ok(())
        }

        fn start(&mut self) -> mpsc::Receiver<DetectionEvent> {
            self.started = true;
            mpsc::channel(1).1
        }
    }

    #[derive(Default)]
    struct RecordingPresenter {
        results: Vec<String>,
        messages: Vec<(String, u64, u64)>,
        errors: Vec<ScanError>,
        overlay_hidden: bool,
    }

    impl Presenter for RecordingPresenter {
        fn append_result(&mut self, code: &str) {
            self.results.push(code.to_string());
        }

        fn show_transient_message(&mut self, text: &str, display_ms: u64, transition_ms: u64) {
            self.messages
                .push((text.to_string(), display_ms, transition_ms));
        }

        fn report_error(&mut self, error: &ScanError) {
            self.errors.push(error.clone());
        }

        fn hide_debug_overlay(&mut self) {
            self.overlay_hidden = true;
        }
    }

    struct BrokenSpeaker;

    impl ConfirmationSound for BrokenSpeaker {
        fn play(&mut self) -> ScanResult<()> {
            Err(ScanError::Playback("no audio device".into()))
        }
    }

    struct BrokenClipboard;

    impl Clipboard for BrokenClipboard {
        fn write_text(&mut self, _text: &str) -> ScanResult<()> {
            Err(ScanError::Clipboard("not allowed".into()))
        }
    }

    #[derive(Default)]
    struct MemoryClipboard {
        text: Option<String>,
    }

    impl Clipboard for MemoryClipboard {
        fn write_text(&mut self, text: &str) -> ScanResult<()> {
            self.text = Some(text.to_string());
            Ok(())
        }
    }

    fn clean(code: &str) -> DetectionEvent {
        DetectionEvent::new(code, vec![DecodeAttempt::with_error(0.05)])
    }

    #[test]
    fn initialize_failure_reports_and_marks_failed() {
        let detector = StubDetector {
            fail: true,
            ..Default::default()
        };
        let mut session = ScanSession::new(
            SessionConfig::default(),
            detector,
            RecordingPresenter::default(),
            Silent,
        )
        .unwrap();

        let err = session
            .initialize("#barcode-scanner", Orientation::PortraitPrimary)
            .unwrap_err();
        assert!(matches!(err, ScanError::Initialization(_)));
        assert_eq!(session.state(), SessionState::Failed);
        assert_eq!(session.presenter().errors.len(), 1);
        assert!(!session.presenter().overlay_hidden);
        assert!(!session.detector().started);
        assert_eq!(session.handle_detection(clean("A")), None);
    }

    #[test]
    fn initialize_configures_detector_and_starts() {
        let mut session = ScanSession::new(
            SessionConfig::default(),
            StubDetector::default(),
            RecordingPresenter::default(),
            Silent,
        )
        .unwrap();

        session
            .initialize("#barcode-scanner", Orientation::LandscapePrimary)
            .unwrap();
        assert_eq!(session.state(), SessionState::Scanning);
        assert!(session.presenter().overlay_hidden);

        let config = session.detector().config.clone().unwrap();
        assert_eq!(config.num_of_workers, 2);
        assert_eq!(config.input_stream.target, "#barcode-scanner");
        assert_eq!(config.input_stream.constraints.width, 640);
    }

    #[test]
    fn playback_failure_does_not_block_tally() {
        let clock = ManualClock::new();
        let mut session = ScanSession::with_clock(
            SessionConfig::default(),
            StubDetector::default(),
            RecordingPresenter::default(),
            BrokenSpeaker,
            clock.clone(),
        )
        .unwrap();
        session
            .initialize("#scanner", Orientation::PortraitPrimary)
            .unwrap();

        assert_eq!(session.handle_detection(clean("A")), Some(1));
        assert_eq!(session.presenter().results, vec!["A".to_string()]);
        assert_eq!(session.metrics().playback_failures, 1);
        assert_eq!(session.metrics().errors, 0);
    }

    #[test]
    fn duplicates_and_noise_are_counted_separately() {
        let clock = ManualClock::new();
        let mut session = ScanSession::with_clock(
            SessionConfig::default(),
            StubDetector::default(),
            RecordingPresenter::default(),
            Silent,
            clock.clone(),
        )
        .unwrap();
        session
            .initialize("#scanner", Orientation::PortraitPrimary)
            .unwrap();

        assert_eq!(session.handle_detection(clean("A")), Some(1));
        assert_eq!(session.handle_detection(clean("A")), None);
        let noisy = DetectionEvent::new("B", vec![DecodeAttempt::with_error(0.3)]);
        assert_eq!(session.handle_detection(noisy), None);
        clock.advance(Duration::from_millis(2000));
        assert_eq!(session.handle_detection(clean("A")), Some(2));

        let metrics = session.metrics();
        assert_eq!(metrics.detections, 4);
        assert_eq!(metrics.accepted, 2);
        assert_eq!(metrics.rejected_duplicate, 1);
        assert_eq!(metrics.rejected_low_confidence, 1);
    }

    #[test]
    fn export_skips_empty_tally_and_copies_csv() {
        let mut session = ScanSession::new(
            SessionConfig::default(),
            StubDetector::default(),
            RecordingPresenter::default(),
            Silent,
        )
        .unwrap();
        session
            .initialize("#scanner", Orientation::PortraitPrimary)
            .unwrap();

        let mut clipboard = MemoryClipboard::default();
        assert!(!session.export_to(&mut clipboard).unwrap());
        assert!(clipboard.text.is_none());

        session.handle_detection(clean("A"));
        session.handle_detection(clean("B"));
        assert!(session.export_to(&mut clipboard).unwrap());
        assert_eq!(clipboard.text.as_deref(), Some("A,1\nB,1"));
        assert_eq!(
            session.presenter().messages,
            vec![("Copied!".to_string(), 2000, 300)]
        );
    }

    #[test]
    fn export_failure_is_reported_and_tally_kept() {
        let mut session = ScanSession::new(
            SessionConfig::default(),
            StubDetector::default(),
            RecordingPresenter::default(),
            Silent,
        )
        .unwrap();
        session
            .initialize("#scanner", Orientation::PortraitPrimary)
            .unwrap();
        session.handle_detection(clean("A"));

        let err = session.export_to(&mut BrokenClipboard).unwrap_err();
        assert!(matches!(err, ScanError::Clipboard(_)));
        assert_eq!(session.presenter().errors, vec![err]);
        assert_eq!(session.tally().count("A"), 1);
        assert!(session.presenter().messages.is_empty());
    }

    #[test]
    fn reinitialize_clears_pending_cooldowns() {
        let clock = ManualClock::new();
        let mut session = ScanSession::with_clock(
            SessionConfig::default(),
            StubDetector::default(),
            RecordingPresenter::default(),
            Silent,
            clock,
        )
        .unwrap();
        session
            .initialize("#scanner", Orientation::PortraitPrimary)
            .unwrap();
        session.handle_detection(clean("A"));
        assert!(session.debounce().is_suppressed("A"));

        session
            .initialize("#scanner", Orientation::PortraitPrimary)
            .unwrap();
        assert!(!session.debounce().is_suppressed("A"));
        assert_eq!(session.handle_detection(clean("A")), Some(2));
    }

    #[tokio::test]
    async fn run_drains_stream_in_order() {
        let mut session = ScanSession::new(
            SessionConfig::default(),
            StubDetector::default(),
            RecordingPresenter::default(),
            Silent,
        )
        .unwrap();
        session
            .initialize("#scanner", Orientation::PortraitPrimary)
            .unwrap();

        let (tx, rx) = mpsc::channel(8);
        for code in ["C", "A", "C", "B"] {
            tx.send(clean(code)).await.unwrap();
        }
        drop(tx);

        assert_eq!(session.run(rx).await, 3);
        assert_eq!(
            session.presenter().results,
            vec!["C".to_string(), "A".to_string(), "B".to_string()]
        );
    }
}
