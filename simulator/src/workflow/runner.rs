use crate::generator::profile::build_detection_stream;
use crate::workflow::config::WorkflowConfig;
use crate::workflow::devices::{
    BellSound, ConsolePresenter, FileClipboard, ReplayDetector, TokioClock,
};
use anyhow::Context;
use scancore::session::{ScanSession, SessionState};
use scancore::tally::TallyRow;
use scancore::telemetry::MetricsSnapshot;
use std::time::Duration;

pub struct WorkflowResult {
    pub state: SessionState,
    pub accepted: usize,
    pub results: Vec<String>,
    pub hints: Vec<String>,
    pub errors: Vec<String>,
    pub rows: Vec<TallyRow>,
    pub csv: String,
    pub exported: bool,
    pub metrics: MetricsSnapshot,
}

#[derive(Clone)]
pub struct Runner {
    config: WorkflowConfig,
    quiet: bool,
}

impl Runner {
    pub fn new(config: WorkflowConfig) -> Self {
        Self {
            config,
            quiet: false,
        }
    }

    pub fn quiet(mut self) -> Self {
        self.quiet = true;
        self
    }

    /// Replays a synthetic camera session end to end and exports the tally
    /// when a CSV path is configured.
    pub async fn execute(&self) -> anyhow::Result<WorkflowResult> {
        let events =
            build_detection_stream(&self.config.generator).context("generating detections")?;
        let detector =
            ReplayDetector::new(events, Duration::from_millis(self.config.frame_interval_ms))
                .deny_camera(self.config.deny_camera);
        let presenter = if self.quiet {
            ConsolePresenter::quiet()
        } else {
            ConsolePresenter::default()
        };

        let mut session = ScanSession::with_clock(
            self.config.to_session_config(),
            detector,
            presenter,
            BellSound::new(self.config.mute),
            TokioClock,
        )
        .context("building scan session")?;

        let stream = session
            .initialize(&self.config.target, self.config.orientation())
            .context("initializing scanner")?;
        let accepted = session.run(stream).await;

        let exported = match self.config.csv_path.as_ref() {
            Some(path) => session
                .export_to(&mut FileClipboard::new(path))
                .with_context(|| format!("exporting tally to {}", path.display()))?,
            None => false,
        };

        Ok(WorkflowResult {
            state: session.state(),
            accepted,
            results: session.presenter().results().to_vec(),
            hints: session.presenter().messages().to_vec(),
            errors: session.presenter().errors().to_vec(),
            rows: session.tally().rows().to_vec(),
            csv: session.tally().to_csv(),
            exported,
            metrics: session.metrics(),
        })
    }
}
